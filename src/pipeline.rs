//! Fetch/display pipeline: cache lookup, single fetch attempt, render.

use crate::filters::FilterState;
use crate::news::NewsClient;
use crate::render::{render_articles, show_error, DisplaySurface, FETCH_FAILED_MESSAGE};
use crate::storage::{cache_key, CacheEntry, CacheStore};
use chrono::Utc;
use std::sync::Arc;

/// Source of "now" in Unix epoch milliseconds.
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// What a pipeline run ended up showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Served from a fresh cache entry; no request was made.
    Cached { articles: usize },
    /// Fetched from the API and written to the cache.
    Fetched { articles: usize },
    /// The fallback error message was shown; the cache is untouched.
    Failed,
}

pub struct Pipeline<C> {
    client: NewsClient,
    cache: C,
    clock: Clock,
}

impl<C: CacheStore> Pipeline<C> {
    pub fn new(client: NewsClient, cache: C) -> Self {
        Self {
            client,
            cache,
            clock: Arc::new(|| Utc::now().timestamp_millis()),
        }
    }

    /// Replace the wall clock used for stamping and expiry checks.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn client(&self) -> &NewsClient {
        &self.client
    }

    /// Show the articles for `filters` on `surface`.
    ///
    /// A fresh cache entry is rendered without touching the network. On a miss
    /// the page is fetched once; success is stamped, cached and rendered, any
    /// failure shows [`FETCH_FAILED_MESSAGE`] and leaves the cache as it was.
    pub async fn fetch_and_display<S>(&self, filters: &FilterState, surface: &mut S) -> Outcome
    where
        S: DisplaySurface + Send + ?Sized,
    {
        let key = cache_key(filters);
        let now = (self.clock)();

        match self.cache.get(&key, now).await {
            Ok(Some(entry)) => {
                tracing::debug!(
                    key = %key,
                    page = filters.page,
                    articles = entry.articles.len(),
                    "Serving headlines from cache"
                );
                render_articles(&entry.articles, surface);
                return Outcome::Cached {
                    articles: entry.articles.len(),
                };
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache read failed, fetching instead");
            }
        }

        match self.client.fetch_headlines(filters).await {
            Ok(headlines) => {
                let entry = CacheEntry::new(headlines.articles, headlines.total_results, now);
                if let Err(e) = self.cache.put(&key, &entry).await {
                    tracing::warn!(key = %key, error = %e, "Failed to cache headlines");
                }
                tracing::info!(
                    key = %key,
                    page = filters.page,
                    articles = entry.articles.len(),
                    "Fetched headlines"
                );
                render_articles(&entry.articles, surface);
                Outcome::Fetched {
                    articles: entry.articles.len(),
                }
            }
            Err(e) => {
                tracing::error!(
                    key = %key,
                    page = filters.page,
                    error = %e,
                    "Failed to fetch headlines"
                );
                show_error(surface, FETCH_FAILED_MESSAGE);
                Outcome::Failed
            }
        }
    }
}
