//! Client for the NewsAPI top-headlines endpoint.

mod client;
mod types;
mod url;

pub use client::{build_http_client, NewsClient, NewsError};
pub use types::{ApiResponse, Article, Headlines, Source, REMOVED_TITLE};
pub use self::url::{build_url, redact_api_key, DEFAULT_BASE_URL};
