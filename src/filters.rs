//! Filter state driving what the pipeline fetches.
//!
//! A `FilterState` is owned by the app and mutated only through
//! [`crate::bindings::Bindings`]; every pipeline run receives its own snapshot.

use serde::{Deserialize, Serialize};

pub const DEFAULT_CATEGORY: &str = "general";
pub const DEFAULT_COUNTRY: &str = "us";

/// Categories accepted by the top-headlines endpoint.
pub const CATEGORIES: &[&str] = &[
    "general",
    "business",
    "entertainment",
    "health",
    "science",
    "sports",
    "technology",
];

/// Countries offered by the country selector.
pub const COUNTRIES: &[&str] = &[
    "us", "gb", "ca", "au", "in", "ie", "nz", "za", "de", "fr", "it", "jp",
];

/// Current category, search text, country and page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterState {
    pub category: String,
    pub search_query: String,
    pub country: String,
    /// 1-based page number; never 0.
    pub page: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            category: DEFAULT_CATEGORY.to_string(),
            search_query: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
            page: 1,
        }
    }
}

impl FilterState {
    pub fn new(
        category: impl Into<String>,
        search_query: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            search_query: search_query.into().trim().to_string(),
            country: country.into(),
            page: 1,
        }
    }

    pub fn is_default_category(&self) -> bool {
        self.category == DEFAULT_CATEGORY
    }
}

/// Step through `options` from `current`, wrapping at both ends.
///
/// Unknown values start from the first option.
pub fn cycle<'a>(options: &[&'a str], current: &str, forward: bool) -> &'a str {
    let Some(pos) = options.iter().position(|o| *o == current) else {
        return options.first().copied().unwrap_or_default();
    };
    let len = options.len();
    let next = if forward {
        (pos + 1) % len
    } else {
        (pos + len - 1) % len
    };
    options[next]
}

/// Lowercased category if the endpoint accepts it.
pub fn parse_category(s: &str) -> Option<String> {
    let lower = s.trim().to_ascii_lowercase();
    CATEGORIES.contains(&lower.as_str()).then_some(lower)
}

/// Lowercased two-letter country code.
///
/// Any ISO 3166 alpha-2 shape is accepted; the selector list is only what
/// `n`/`N` cycles through.
pub fn parse_country(s: &str) -> Option<String> {
    let lower = s.trim().to_ascii_lowercase();
    (lower.len() == 2 && lower.bytes().all(|b| b.is_ascii_lowercase())).then_some(lower)
}
