//! Trait definitions for external interactions
//!
//! These traits define the boundary between request handling and storage.
//! Implementations live in other crates (scoring-store).

use crate::Gender;
use chrono::NaiveDate;

/// Trait for the key-value store backing scores and interests
///
/// Implemented by the infrastructure layer (scoring-store). Implementations
/// must tolerate concurrent calls from many requests and own their
/// consistency; callers never retry.
pub trait ScoreStore {
    /// Error type for store operations
    type Error;

    /// Compute (or fetch a cached) score for the supplied identity fields
    ///
    /// Must be deterministic for identical queries.
    fn score(&self, query: &ScoreQuery) -> Result<f64, Self::Error>;

    /// Interests recorded for a client; unknown ids yield an empty list
    fn interests(&self, client_id: i64) -> Result<Vec<String>, Self::Error>;
}

/// Identity fields used to compute a score
///
/// Absent fields are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreQuery {
    /// Normalized 11-digit phone
    pub phone: Option<String>,

    /// Email address
    pub email: Option<String>,

    /// Date of birth
    pub birthday: Option<NaiveDate>,

    /// Gender code
    pub gender: Option<Gender>,

    /// Given name
    pub first_name: Option<String>,

    /// Family name
    pub last_name: Option<String>,
}

impl<S: ScoreStore + ?Sized> ScoreStore for &S {
    type Error = S::Error;

    fn score(&self, query: &ScoreQuery) -> Result<f64, Self::Error> {
        (**self).score(query)
    }

    fn interests(&self, client_id: i64) -> Result<Vec<String>, Self::Error> {
        (**self).interests(client_id)
    }
}

impl<S: ScoreStore + ?Sized> ScoreStore for std::sync::Arc<S> {
    type Error = S::Error;

    fn score(&self, query: &ScoreQuery) -> Result<f64, Self::Error> {
        (**self).score(query)
    }

    fn interests(&self, client_id: i64) -> Result<Vec<String>, Self::Error> {
        (**self).interests(client_id)
    }
}
