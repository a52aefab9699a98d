//! Terminal reader for the NewsAPI top-headlines endpoint.
//!
//! Responses are cached in a local SQLite file for an hour per
//! category/search/country combination.

pub mod app;
pub mod bindings;
pub mod config;
pub mod filters;
pub mod news;
pub mod pipeline;
pub mod render;
pub mod storage;
pub mod theme;
pub mod ui;
pub mod util;
