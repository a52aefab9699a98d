use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Title NewsAPI substitutes for articles that were taken down upstream.
pub const REMOVED_TITLE: &str = "[Removed]";

/// Publisher of an article as reported by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A single headline from the `articles` array.
///
/// `url` and `publishedAt` are required. A null or missing `title` or
/// `source` reads as empty; everything else defaults to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: Source,
    #[serde(default)]
    pub author: Option<String>,
    pub published_at: DateTime<Utc>,
}

impl Article {
    /// True if the upstream marked this article as removed.
    pub fn is_removed(&self) -> bool {
        self.title == REMOVED_TITLE
    }
}

/// Raw top-headlines response body.
///
/// Success and failure share one shape: `status` is `"ok"` with `articles`, or
/// `"error"` with `code` and `message`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status: String,
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default, deserialize_with = "skip_bad_articles")]
    pub articles: Option<Vec<Article>>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Keep the articles that parse; drop the rest instead of failing the page.
fn skip_bad_articles<'de, D>(deserializer: D) -> Result<Option<Vec<Article>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(items) = Option::<Vec<serde_json::Value>>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let total = items.len();
    let articles: Vec<Article> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Article>(item) {
            Ok(article) => Some(article),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping malformed article");
                None
            }
        })
        .collect();
    if articles.len() < total {
        tracing::warn!(
            skipped = total - articles.len(),
            kept = articles.len(),
            "Dropped malformed articles from response"
        );
    }
    Ok(Some(articles))
}

impl ApiResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Articles from a successful response.
#[derive(Debug, Clone, PartialEq)]
pub struct Headlines {
    pub articles: Vec<Article>,
    pub total_results: Option<u64>,
}
