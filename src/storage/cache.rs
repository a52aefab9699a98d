//! Response cache keyed by filter combination.
//!
//! The pipeline depends only on [`CacheStore`]; the SQLite-backed
//! [`Database`] is used at runtime and [`MemoryCache`] in tests or when no
//! durable storage is wanted. Expired entries are dropped lazily by `get`,
//! nothing sweeps the store.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use super::schema::Database;
use super::types::{CacheEntry, ValueKind};
use crate::filters::FilterState;

/// Derive the cache key for `filters`.
///
/// The page number is deliberately not part of the key: every page of one
/// filter combination shares a single slot.
pub fn cache_key(filters: &FilterState) -> String {
    format!(
        "{}-{}-{}",
        filters.category, filters.search_query, filters.country
    )
}

/// Typed key → [`CacheEntry`] mapping with time-based expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Return the entry for `key` if one exists and is younger than the
    /// expiration window at `now_ms`. A stale entry is removed first.
    async fn get(&self, key: &str, now_ms: i64) -> Result<Option<CacheEntry>>;

    /// Store `entry` under `key`, replacing whatever was there.
    async fn put(&self, key: &str, entry: &CacheEntry) -> Result<()>;

    /// Drop the entry for `key` if present.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Drop every entry. Returns how many were removed.
    async fn clear(&self) -> Result<u64>;
}

#[async_trait]
impl CacheStore for Database {
    async fn get(&self, key: &str, now_ms: i64) -> Result<Option<CacheEntry>> {
        let Some(raw) = self.get_value(key).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<CacheEntry>(&raw) {
            Ok(entry) if entry.is_fresh(now_ms) => Ok(Some(entry)),
            Ok(entry) => {
                tracing::debug!(
                    key = %key,
                    age_ms = now_ms - entry.timestamp,
                    "Cache entry expired, removing"
                );
                self.remove_value(key).await?;
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Unreadable cache entry, removing");
                self.remove_value(key).await?;
                Ok(None)
            }
        }
    }

    async fn put(&self, key: &str, entry: &CacheEntry) -> Result<()> {
        let json = serde_json::to_string(entry)?;
        self.set_value(key, ValueKind::Cache, &json).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.remove_value(key).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<u64> {
        self.remove_kind(ValueKind::Cache).await
    }
}

/// Process-local cache with the same expiry semantics as the database.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, fresh or not.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Raw lookup that ignores expiry.
    pub async fn peek(&self, key: &str) -> Option<CacheEntry> {
        self.entries.lock().await.get(key).cloned()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str, now_ms: i64) -> Result<Option<CacheEntry>> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if entry.is_fresh(now_ms) => Ok(Some(entry.clone())),
            Some(_) => {
                tracing::debug!(key = %key, "Cache entry expired, removing");
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, entry: &CacheEntry) -> Result<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), entry.clone());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<u64> {
        let mut entries = self.entries.lock().await;
        let count = entries.len() as u64;
        entries.clear();
        Ok(count)
    }
}
