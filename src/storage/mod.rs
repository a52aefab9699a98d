//! SQLite storage.
//!
//! Everything lives in one `kv_store` table. Cached responses are stored as
//! JSON under their [`cache_key`] and expire an hour after they were fetched.
//! The theme preference shares the table under [`THEME_KEY`].

mod cache;
mod kv;
mod preferences;
mod schema;
mod types;

pub use cache::{cache_key, CacheStore, MemoryCache};
pub use preferences::THEME_KEY;
pub use schema::Database;
pub use types::{CacheEntry, DatabaseError, ValueKind, CACHE_TTL_MS};
