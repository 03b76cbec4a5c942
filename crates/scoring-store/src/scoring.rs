//! Score formula and interest lookup on top of [`SqliteStore`]

use crate::{SqliteStore, StoreError};
use scoring_domain::ScoreQuery;
use sha2::{Digest, Sha256};
use tracing::warn;

/// Key prefix of cached scores
pub const SCORE_PREFIX: &str = "uid:";

/// Key prefix of client interests
pub const INTERESTS_PREFIX: &str = "i:";

/// Store key holding a client's interests
pub fn interests_key(client_id: i64) -> String {
    format!("{}{}", INTERESTS_PREFIX, client_id)
}

/// Cache key of a score query
///
/// Every identity field takes part in the key, each length-prefixed so
/// adjacent fields cannot run into each other.
pub fn score_key(query: &ScoreQuery) -> String {
    let birthday = query.birthday.map(|date| date.format("%Y%m%d").to_string());
    let gender = query.gender.map(|gender| gender.code().to_string());
    let parts = [
        query.first_name.as_deref(),
        query.last_name.as_deref(),
        query.phone.as_deref(),
        query.email.as_deref(),
        birthday.as_deref(),
        gender.as_deref(),
    ];

    let mut hasher = Sha256::new();
    for part in parts {
        let part = part.unwrap_or_default();
        hasher.update((part.len() as u64).to_be_bytes());
        hasher.update(part.as_bytes());
    }
    format!("{}{}", SCORE_PREFIX, hex::encode(hasher.finalize()))
}

/// Score of a query from the supplied fields alone
///
/// - phone: 1.5
/// - email: 1.5
/// - birthday together with a disclosed gender: 1.5
/// - first and last name: 0.5
pub fn compute_score(query: &ScoreQuery) -> f64 {
    let present = |field: &Option<String>| field.as_deref().is_some_and(|value| !value.is_empty());

    let mut score = 0.0;
    if present(&query.phone) {
        score += 1.5;
    }
    if present(&query.email) {
        score += 1.5;
    }
    if query.birthday.is_some() && query.gender.is_some_and(|gender| gender.is_known()) {
        score += 1.5;
    }
    if present(&query.first_name) && present(&query.last_name) {
        score += 0.5;
    }
    score
}

/// Cached score of a query
///
/// A positive cached value wins; otherwise the score is computed and cached
/// for `ttl_secs`. Cache errors are logged and the computed score returned.
pub fn get_score(store: &SqliteStore, query: &ScoreQuery, ttl_secs: u64) -> f64 {
    let key = score_key(query);

    match store.cache_get(&key) {
        Ok(Some(cached)) => match cached.parse::<f64>() {
            Ok(score) if score > 0.0 => return score,
            Ok(_) => {}
            Err(e) => warn!(key = %key, error = %e, "ignoring malformed cached score"),
        },
        Ok(None) => {}
        Err(e) => warn!(key = %key, error = %e, "score cache read failed"),
    }

    let score = compute_score(query);
    if let Err(e) = store.cache_set(&key, &score.to_string(), ttl_secs) {
        warn!(key = %key, error = %e, "score cache write failed");
    }
    score
}

/// Interests of a client; unknown clients have none
pub fn get_interests(store: &SqliteStore, client_id: i64) -> Result<Vec<String>, StoreError> {
    match store.get(&interests_key(client_id))? {
        Some(raw) => {
            let value: serde_json::Value = serde_json::from_str(&raw)?;
            let items = value.as_array().ok_or_else(|| {
                StoreError::InvalidData(format!("interests of client {} are not a list", client_id))
            })?;
            items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        StoreError::InvalidData(format!(
                            "interests of client {} contain a non-string",
                            client_id
                        ))
                    })
                })
                .collect()
        }
        None => Ok(Vec::new()),
    }
}
