//! Scoring Storage Layer
//!
//! Implements the ScoreStore trait on top of a SQLite key-value table.
//!
//! # Architecture
//!
//! - One `kv` table holds both persistent entries (client interests) and
//!   cache entries with an expiry (computed scores)
//! - The connection sits behind a mutex, so one store is shared by every
//!   request handler
//! - Cache failures never fail a score computation; they are logged
//!
//! # Examples
//!
//! ```no_run
//! use scoring_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! store.set_interests(1, &["books", "travel"]).unwrap();
//! ```

#![warn(missing_docs)]

pub mod scoring;

use rusqlite::{params, Connection, OptionalExtension};
use scoring_domain::traits::{ScoreQuery, ScoreStore};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A thread panicked while holding the connection
    #[error("Store connection lock poisoned")]
    Poisoned,

    /// Stored value has an unexpected shape
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Stored value is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tuning knobs for [`SqliteStore`]
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// How long SQLite waits on a locked database before failing
    pub busy_timeout: Duration,

    /// Lifetime of cached scores, in seconds
    pub cache_ttl_secs: u64,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_millis(5000),
            cache_ttl_secs: 60 * 60,
        }
    }
}

/// SQLite-based implementation of ScoreStore
///
/// # Thread Safety
///
/// The connection is guarded by a mutex; the store is `Sync` and meant to be
/// shared behind an `Arc`.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    options: StoreOptions,
}

impl SqliteStore {
    /// Create a new SqliteStore with default options
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::with_options(path, StoreOptions::default())
    }

    /// Create a new SqliteStore with the given options
    pub fn with_options<P: AsRef<Path>>(path: P, options: StoreOptions) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(options.busy_timeout)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self {
            conn: Mutex::new(conn),
            options,
        })
    }

    /// Options in effect
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Read a persistent entry
    ///
    /// Cache entries are visible too as long as they have not expired.
    pub fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1 AND (expires_at IS NULL OR expires_at > ?2)",
                params![key, now_secs()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Write a persistent entry, replacing any previous value
    pub fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO kv (key, value, expires_at) VALUES (?1, ?2, NULL)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, expires_at = NULL",
            params![key, value],
        )?;
        Ok(())
    }

    /// Read a cache entry; expired entries read as absent
    pub fn cache_get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.get(key)
    }

    /// Write a cache entry that expires after `ttl_secs`
    ///
    /// Entries that have already expired are swept first, so the cache never
    /// outgrows the set of live keys plus the entry just written.
    pub fn cache_set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), StoreError> {
        let now = now_secs();
        let expires_at = now.saturating_add(i64::try_from(ttl_secs).unwrap_or(i64::MAX));
        let conn = self.conn()?;
        delete_expired(&conn, now)?;
        conn.execute(
            "INSERT INTO kv (key, value, expires_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, expires_at = excluded.expires_at",
            params![key, value, expires_at],
        )?;
        Ok(())
    }

    /// Delete expired cache entries, returning how many were removed
    pub fn purge_expired(&self) -> Result<usize, StoreError> {
        let conn = self.conn()?;
        delete_expired(&conn, now_secs())
    }

    /// Record the interests of a client
    pub fn set_interests<I: AsRef<str>>(&self, client_id: i64, interests: &[I]) -> Result<(), StoreError> {
        let list: Vec<&str> = interests.iter().map(|interest| interest.as_ref()).collect();
        let encoded = serde_json::to_string(&list)?;
        self.set(&scoring::interests_key(client_id), &encoded)
    }
}

impl ScoreStore for SqliteStore {
    type Error = StoreError;

    fn score(&self, query: &ScoreQuery) -> Result<f64, Self::Error> {
        Ok(scoring::get_score(self, query, self.options.cache_ttl_secs))
    }

    fn interests(&self, client_id: i64) -> Result<Vec<String>, Self::Error> {
        scoring::get_interests(self, client_id)
    }
}

fn delete_expired(conn: &Connection, now: i64) -> Result<usize, StoreError> {
    let removed = conn.execute(
        "DELETE FROM kv WHERE expires_at IS NOT NULL AND expires_at <= ?1",
        params![now],
    )?;
    Ok(removed)
}

/// Seconds since the Unix epoch
fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
