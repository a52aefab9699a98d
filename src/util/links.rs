use thiserror::Error;
use url::Url;

/// Reasons an article link is not handed to the system browser.
#[derive(Error, Debug)]
pub enum LinkError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    #[error("URL has no host")]
    MissingHost,
}

/// Validates an article link before opening it in the browser.
///
/// Only `http` and `https` links with a host are accepted; `file://`,
/// `javascript:` and friends from a hostile feed are refused.
///
/// # Examples
///
/// ```
/// use headlines::util::validate_link;
///
/// assert!(validate_link("https://example.com/story").is_ok());
/// assert!(validate_link("file:///etc/passwd").is_err());
/// ```
pub fn validate_link(link: &str) -> Result<Url, LinkError> {
    let url = Url::parse(link.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(LinkError::UnsupportedScheme(scheme.to_owned())),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(LinkError::MissingHost);
    }

    Ok(url)
}
