use crate::news::Article;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Database-specific errors with user-friendly messages
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Another instance of the application has locked the database
    #[error("Another instance of headlines appears to be running. Please close it and try again.")]
    InstanceLocked,

    /// Migration failed
    #[error("Database migration failed: {0}")]
    Migration(String),

    /// Generic database error
    #[error("Database error: {0}")]
    Other(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Check if a sqlx error indicates database locking
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        if is_lock_message(&err.to_string()) {
            return DatabaseError::InstanceLocked;
        }
        DatabaseError::Other(err)
    }
}

/// SQLITE_BUSY, SQLITE_LOCKED and SQLITE_CANTOPEN all surface as one of these.
pub(crate) fn is_lock_message(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("database is locked")
        || message.contains("database table is locked")
        || message.contains("sqlite_busy")
        || message.contains("sqlite_locked")
        || message.contains("unable to open database file")
}

// ============================================================================
// Key/Value Rows
// ============================================================================

/// Which kind of value a `kv_store` row holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Preference,
    Cache,
}

impl ValueKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Preference => "preference",
            Self::Cache => "cache",
        }
    }
}

// ============================================================================
// Cache Entry
// ============================================================================

/// Expiration window for cached responses (1 hour).
pub const CACHE_TTL_MS: i64 = 3_600_000;

/// A stored page of articles, stamped with the time it was fetched.
///
/// Serialized as `{"articles": [...], "totalResults": n, "timestamp": ms}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub articles: Vec<Article>,
    #[serde(default)]
    pub total_results: Option<u64>,
    /// Unix epoch milliseconds at which the response was received.
    pub timestamp: i64,
}

impl CacheEntry {
    pub fn new(articles: Vec<Article>, total_results: Option<u64>, timestamp: i64) -> Self {
        Self {
            articles,
            total_results,
            timestamp,
        }
    }

    /// An entry is honored only while `now - timestamp < CACHE_TTL_MS`.
    pub fn is_fresh(&self, now_ms: i64) -> bool {
        now_ms.saturating_sub(self.timestamp) < CACHE_TTL_MS
    }
}
