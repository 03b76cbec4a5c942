//! Token authentication.
//!
//! Tokens are hex SHA-512 digests. A regular user's token binds the account
//! and login to a shared salt; an administrator's token binds the current
//! clock hour to the admin salt, so it stays valid for that whole hour.

use chrono::NaiveDateTime;
use scoring_domain::AuthIdentity;
use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;

/// Clock-hour layout mixed into admin tokens
const ADMIN_HOUR_FORMAT: &str = "%Y%m%d%H";

/// Checks request tokens against the identity they claim
#[derive(Debug, Clone)]
pub struct Authenticator {
    salt: String,
    admin_salt: String,
}

impl Authenticator {
    /// Create an authenticator with the given secrets
    pub fn new(salt: impl Into<String>, admin_salt: impl Into<String>) -> Self {
        Self {
            salt: salt.into(),
            admin_salt: admin_salt.into(),
        }
    }

    /// Token a regular user must present
    pub fn user_token(&self, account: &str, login: &str) -> String {
        sha512_hex(&[account, login, self.salt.as_str()])
    }

    /// Token an administrator must present during the hour containing `now`
    pub fn admin_token(&self, now: NaiveDateTime) -> String {
        let hour = now.format(ADMIN_HOUR_FORMAT).to_string();
        sha512_hex(&[hour.as_str(), self.admin_salt.as_str()])
    }

    /// Token expected from `identity` at `now`
    pub fn expected_token(&self, identity: &AuthIdentity, now: NaiveDateTime) -> String {
        if identity.is_admin {
            self.admin_token(now)
        } else {
            self.user_token(&identity.account, &identity.login)
        }
    }

    /// Whether `identity` presented the expected token
    ///
    /// The comparison runs in constant time.
    pub fn check(&self, identity: &AuthIdentity, now: NaiveDateTime) -> bool {
        let expected = self.expected_token(identity, now);
        bool::from(expected.as_bytes().ct_eq(identity.token.as_bytes()))
    }
}

fn sha512_hex(parts: &[&str]) -> String {
    let mut hasher = Sha512::new();
    for part in parts {
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}
