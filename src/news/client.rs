//! HTTP client for the top-headlines endpoint.
//!
//! One call is one GET. Bodies are streamed with a size cap and parsed into
//! [`Headlines`]; every way a call can go wrong maps to a [`NewsError`]
//! variant. The API key only appears in logs in redacted form.

use crate::filters::FilterState;
use futures::StreamExt;
use reqwest::redirect::Policy;
use secrecy::SecretString;
use std::time::Duration;
use thiserror::Error;

use super::types::{ApiResponse, Headlines};
use super::url::{build_url, redact_api_key, DEFAULT_BASE_URL};

const MAX_RESPONSE_SIZE: usize = 5 * 1024 * 1024; // 5MB
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Malformed response: {0}")]
    Parse(String),
    #[error("API error ({code}): {message}")]
    Api { code: String, message: String },
    #[error("Insecure base URL: HTTPS required (except localhost for testing)")]
    InsecureBaseUrl,
}

/// Create the shared HTTP client.
///
/// NewsAPI rejects requests without a User-Agent, and the endpoint never
/// redirects more than once.
pub fn build_http_client() -> Result<reqwest::Client, NewsError> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("headlines/", env!("CARGO_PKG_VERSION")))
        .redirect(Policy::limited(3))
        .pool_max_idle_per_host(2)
        .pool_idle_timeout(Duration::from_secs(30))
        .tcp_keepalive(Duration::from_secs(60))
        .build()?;
    Ok(client)
}

/// Client for the top-headlines endpoint.
#[derive(Clone)]
pub struct NewsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    timeout: Duration,
}

impl std::fmt::Debug for NewsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl NewsClient {
    /// Create a client for `base_url` (defaults to the NewsAPI endpoint).
    ///
    /// The API key travels in the query string, so plain HTTP is refused
    /// unless the host is localhost.
    pub fn new(
        http: reqwest::Client,
        base_url: Option<&str>,
        api_key: SecretString,
    ) -> Result<Self, NewsError> {
        let base = base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('?');

        if !base.starts_with("https://") {
            let is_localhost =
                base.starts_with("http://127.0.0.1") || base.starts_with("http://localhost");
            if !is_localhost {
                tracing::error!(base_url = %base, "Rejecting non-HTTPS base URL");
                return Err(NewsError::InsecureBaseUrl);
            }
            tracing::warn!(base_url = %base, "Using non-HTTPS news base URL (localhost only)");
        }

        Ok(Self {
            http,
            base_url: base.to_string(),
            api_key,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request URL for `filters`, including the API key.
    pub fn url_for(&self, filters: &FilterState) -> String {
        build_url(&self.base_url, filters, &self.api_key)
    }

    /// Fetch one page of headlines. Single attempt, no retries.
    ///
    /// The body is parsed as JSON whatever the HTTP status, since NewsAPI
    /// reports failures as `{"status":"error",...}` on 4xx responses.
    pub async fn fetch_headlines(&self, filters: &FilterState) -> Result<Headlines, NewsError> {
        let url = self.url_for(filters);
        tracing::debug!(url = %redact_api_key(&url), "Fetching headlines");

        let response = tokio::time::timeout(self.timeout, self.http.get(&url).send())
            .await
            .map_err(|_| NewsError::Timeout(self.timeout.as_secs()))?
            .map_err(NewsError::Network)?;

        let status = response.status();
        let body = read_limited_body(response, MAX_RESPONSE_SIZE).await?;

        let parsed: ApiResponse = match serde_json::from_slice(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => return Err(NewsError::HttpStatus(status.as_u16())),
            Err(e) => return Err(NewsError::Parse(e.to_string())),
        };

        if !parsed.is_ok() {
            return Err(NewsError::Api {
                code: parsed.code.unwrap_or_else(|| parsed.status.clone()),
                message: parsed
                    .message
                    .unwrap_or_else(|| "no message in response".to_string()),
            });
        }

        let articles = parsed
            .articles
            .ok_or_else(|| NewsError::Parse("missing articles array".to_string()))?;

        tracing::debug!(
            count = articles.len(),
            total = ?parsed.total_results,
            page = filters.page,
            "Headlines received"
        );

        Ok(Headlines {
            articles,
            total_results: parsed.total_results,
        })
    }
}

async fn read_limited_body(response: reqwest::Response, limit: usize) -> Result<Vec<u8>, NewsError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(NewsError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(NewsError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(NewsError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> NewsClient {
        let base = format!("{}/v2/top-headlines", server.uri());
        NewsClient::new(
            reqwest::Client::new(),
            Some(&base),
            SecretString::from("test-key"),
        )
        .unwrap()
    }

    const OK_BODY: &str = r#"{
        "status": "ok",
        "totalResults": 2,
        "articles": [
            {"source": {"name": "A"}, "title": "First", "url": "https://a.example/1",
             "description": "one", "publishedAt": "2024-03-01T10:00:00Z"},
            {"source": {"name": "B"}, "title": "Second", "url": "https://b.example/2",
             "description": null, "publishedAt": "2024-03-01T11:00:00Z"}
        ]
    }"#;

    #[tokio::test]
    async fn test_fetch_headlines_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/top-headlines"))
            .and(query_param("country", "us"))
            .and(query_param("apiKey", "test-key"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(OK_BODY))
            .expect(1)
            .mount(&server)
            .await;

        let headlines = client_for(&server)
            .fetch_headlines(&FilterState::default())
            .await
            .unwrap();

        assert_eq!(headlines.articles.len(), 2);
        assert_eq!(headlines.total_results, Some(2));
        assert_eq!(headlines.articles[0].title, "First");
    }

    #[tokio::test]
    async fn test_api_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string(
                r#"{"status":"error","code":"apiKeyInvalid","message":"Your API key is invalid"}"#,
            ))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_headlines(&FilterState::default())
            .await
            .unwrap_err();

        match err {
            NewsError::Api { code, message } => {
                assert_eq!(code, "apiKeyInvalid");
                assert!(message.contains("invalid"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_is_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_headlines(&FilterState::default())
            .await
            .unwrap_err();
        assert!(matches!(err, NewsError::HttpStatus(502)));
    }

    #[tokio::test]
    async fn test_malformed_json_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"status\": \"ok\", "))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_headlines(&FilterState::default())
            .await
            .unwrap_err();
        assert!(matches!(err, NewsError::Parse(_)));
    }

    #[tokio::test]
    async fn test_ok_without_articles_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":"ok"}"#))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_headlines(&FilterState::default())
            .await
            .unwrap_err();
        assert!(matches!(err, NewsError::Parse(_)));
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(OK_BODY)
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .with_timeout(Duration::from_millis(50))
            .fetch_headlines(&FilterState::default())
            .await
            .unwrap_err();
        assert!(matches!(err, NewsError::Timeout(_)));
    }

    #[test]
    fn test_insecure_base_rejected() {
        let result = NewsClient::new(
            reqwest::Client::new(),
            Some("http://news.example.com/v2/top-headlines"),
            SecretString::from("k"),
        );
        assert!(matches!(result, Err(NewsError::InsecureBaseUrl)));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = NewsClient::new(
            reqwest::Client::new(),
            None,
            SecretString::from("super-secret"),
        )
        .unwrap();
        let out = format!("{:?}", client);
        assert!(!out.contains("super-secret"));
        assert!(out.contains("[REDACTED]"));
    }
}
