//! Caller identity as claimed by a request envelope

/// Login reserved for administrators unless configured otherwise
pub const DEFAULT_ADMIN_LOGIN: &str = "admin";

/// The account/login/token triple a request claims, plus the derived admin flag
///
/// Created per request and dropped once the response is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthIdentity {
    /// Partner account (may be empty)
    pub account: String,

    /// Login within the account
    pub login: String,

    /// Hex digest supplied by the caller
    pub token: String,

    /// `login` equals the reserved admin login
    pub is_admin: bool,
}

impl AuthIdentity {
    /// Build an identity, deriving `is_admin` from `admin_login`
    ///
    /// # Examples
    ///
    /// ```
    /// use scoring_domain::AuthIdentity;
    ///
    /// let identity = AuthIdentity::new("", "admin", "t0k3n", "admin");
    /// assert!(identity.is_admin);
    /// ```
    pub fn new(
        account: impl Into<String>,
        login: impl Into<String>,
        token: impl Into<String>,
        admin_login: &str,
    ) -> Self {
        let login = login.into();
        let is_admin = login == admin_login;
        Self {
            account: account.into(),
            login,
            token: token.into(),
            is_admin,
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: the admin flag depends on the login alone
        #[test]
        fn test_admin_flag_tracks_login(account in ".*", login in "[a-z]{0,8}", token in "[0-9a-f]{0,16}") {
            let identity = AuthIdentity::new(account, login.clone(), token, DEFAULT_ADMIN_LOGIN);
            prop_assert_eq!(identity.is_admin, login == DEFAULT_ADMIN_LOGIN);
        }
    }
}
