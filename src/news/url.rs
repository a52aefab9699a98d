use crate::filters::FilterState;
use secrecy::{ExposeSecret, SecretString};

/// Production top-headlines endpoint.
pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2/top-headlines";

/// Build the request URL for `filters`.
///
/// `country`, `apiKey` and `page` are always present, in that order.
/// `category` is added only when it is not the default and `q` only when the
/// search text is non-empty. Every value is percent-encoded.
pub fn build_url(base_url: &str, filters: &FilterState, api_key: &SecretString) -> String {
    let mut params: Vec<(&str, String)> = vec![
        ("country", filters.country.clone()),
        ("apiKey", api_key.expose_secret().to_string()),
        ("page", filters.page.to_string()),
    ];

    if !filters.is_default_category() {
        params.push(("category", filters.category.clone()));
    }

    if !filters.search_query.is_empty() {
        params.push(("q", filters.search_query.clone()));
    }

    let query = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", base_url, query)
}

/// Replace the `apiKey` value so the URL can be logged.
pub fn redact_api_key(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };

    let query = query
        .split('&')
        .map(|pair| {
            if pair.starts_with("apiKey=") {
                "apiKey=[REDACTED]"
            } else {
                pair
            }
        })
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", base, query)
}
