//! Event bindings: turn control changes and scrolling into pipeline requests.
//!
//! `Bindings::handle` is the only place the page number moves. Each call that
//! returns `Some` corresponds to exactly one pipeline run with the returned
//! snapshot. There is no debounce and no in-flight lock.

use crate::filters::{FilterState, DEFAULT_CATEGORY};

/// Distance from the bottom, in scroll units, at which the next page loads.
pub const DEFAULT_SCROLL_THRESHOLD: u32 = 200;

/// Scroll geometry of the article list, all in the same unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollPosition {
    /// Distance scrolled from the top.
    pub offset: u32,
    /// Visible height.
    pub viewport: u32,
    /// Total height of the content.
    pub content: u32,
}

impl ScrollPosition {
    pub fn new(offset: u32, viewport: u32, content: u32) -> Self {
        Self {
            offset,
            viewport,
            content,
        }
    }

    /// True once the bottom edge of the viewport is within `threshold` of
    /// the end of the content.
    pub fn is_near_bottom(&self, threshold: u32) -> bool {
        self.offset.saturating_add(self.viewport) >= self.content.saturating_sub(threshold)
    }
}

/// A user action that may change the filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
    CategoryChanged(String),
    CountryChanged(String),
    /// Raw contents of the search box; trimmed before use.
    SearchChanged(String),
    Scrolled(ScrollPosition),
    /// Re-run the pipeline with the filters as they are.
    Reload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bindings {
    scroll_threshold: u32,
}

impl Default for Bindings {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_THRESHOLD)
    }
}

impl Bindings {
    pub fn new(scroll_threshold: u32) -> Self {
        Self { scroll_threshold }
    }

    pub fn scroll_threshold(&self) -> u32 {
        self.scroll_threshold
    }

    /// Apply `event` to `state` and return the filters to fetch, if any.
    ///
    /// Every change other than scrolling resets the page to 1. Clearing the
    /// search fetches the default category without changing the selected
    /// one, so later pages go back to the selected category.
    pub fn handle(&self, state: &mut FilterState, event: FilterEvent) -> Option<FilterState> {
        match event {
            FilterEvent::CategoryChanged(category) => {
                state.category = category;
                state.page = 1;
                Some(state.clone())
            }
            FilterEvent::CountryChanged(country) => {
                state.country = country;
                state.page = 1;
                Some(state.clone())
            }
            FilterEvent::SearchChanged(text) => {
                state.search_query = text.trim().to_string();
                state.page = 1;
                if state.search_query.is_empty() {
                    Some(FilterState {
                        category: DEFAULT_CATEGORY.to_string(),
                        search_query: String::new(),
                        country: state.country.clone(),
                        page: 1,
                    })
                } else {
                    Some(state.clone())
                }
            }
            FilterEvent::Scrolled(position) => {
                if !position.is_near_bottom(self.scroll_threshold) {
                    return None;
                }
                state.page = state.page.saturating_add(1);
                tracing::debug!(page = state.page, "Near bottom, loading next page");
                Some(state.clone())
            }
            FilterEvent::Reload => Some(state.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_near_bottom_boundary() {
        // 1000 tall content, 300 viewport: bottom threshold starts at offset 500
        assert!(!ScrollPosition::new(499, 300, 1000).is_near_bottom(200));
        assert!(ScrollPosition::new(500, 300, 1000).is_near_bottom(200));
        assert!(ScrollPosition::new(700, 300, 1000).is_near_bottom(200));
    }

    #[test]
    fn test_short_content_is_always_near_bottom() {
        assert!(ScrollPosition::new(0, 300, 150).is_near_bottom(200));
    }

    #[test]
    fn test_category_change_resets_page() {
        let mut state = FilterState::default();
        state.page = 4;
        let req = Bindings::default()
            .handle(&mut state, FilterEvent::CategoryChanged("science".into()))
            .unwrap();

        assert_eq!(req.category, "science");
        assert_eq!(req.page, 1);
        assert_eq!(state, req);
    }

    #[test]
    fn test_country_change_resets_page() {
        let mut state = FilterState::new("sports", "cup", "us");
        state.page = 2;
        let req = Bindings::default()
            .handle(&mut state, FilterEvent::CountryChanged("gb".into()))
            .unwrap();

        assert_eq!(req, FilterState::new("sports", "cup", "gb"));
    }

    #[test]
    fn test_search_keeps_category() {
        let mut state = FilterState::new("technology", "", "us");
        state.page = 3;
        let req = Bindings::default()
            .handle(&mut state, FilterEvent::SearchChanged("  rust ".into()))
            .unwrap();

        assert_eq!(req, FilterState::new("technology", "rust", "us"));
    }

    #[test]
    fn test_empty_search_fetches_default_category() {
        let mut state = FilterState::new("technology", "rust", "de");
        state.page = 5;
        let req = Bindings::default()
            .handle(&mut state, FilterEvent::SearchChanged("   ".into()))
            .unwrap();

        assert_eq!(req, FilterState::new("general", "", "de"));
        // The selected category itself is untouched
        assert_eq!(state.category, "technology");
        assert_eq!(state.search_query, "");
        assert_eq!(state.page, 1);
    }

    #[test]
    fn test_scroll_near_bottom_advances_one_page() {
        let bindings = Bindings::default();
        let mut state = FilterState::new("business", "", "us");

        let req = bindings
            .handle(
                &mut state,
                FilterEvent::Scrolled(ScrollPosition::new(900, 400, 1400)),
            )
            .unwrap();

        assert_eq!(req.page, 2);
        assert_eq!(req.category, "business");
        assert_eq!(state.page, 2);
    }

    #[test]
    fn test_scroll_far_from_bottom_does_nothing() {
        let bindings = Bindings::default();
        let mut state = FilterState::default();

        let req = bindings.handle(
            &mut state,
            FilterEvent::Scrolled(ScrollPosition::new(0, 400, 5000)),
        );

        assert!(req.is_none());
        assert_eq!(state.page, 1);
    }

    #[test]
    fn test_each_qualifying_scroll_fetches() {
        let bindings = Bindings::new(3);
        let mut state = FilterState::default();
        let pos = FilterEvent::Scrolled(ScrollPosition::new(10, 10, 20));

        let pages: Vec<u32> = (0..3)
            .filter_map(|_| bindings.handle(&mut state, pos.clone()))
            .map(|f| f.page)
            .collect();
        assert_eq!(pages, vec![2, 3, 4]);
    }

    #[test]
    fn test_scroll_after_cleared_search_uses_selected_category() {
        let bindings = Bindings::default();
        let mut state = FilterState::new("health", "flu", "us");
        bindings.handle(&mut state, FilterEvent::SearchChanged(String::new()));

        let req = bindings
            .handle(
                &mut state,
                FilterEvent::Scrolled(ScrollPosition::new(0, 100, 100)),
            )
            .unwrap();
        assert_eq!(req.category, "health");
        assert_eq!(req.page, 2);
    }

    #[test]
    fn test_reload_keeps_page() {
        let mut state = FilterState::default();
        state.page = 3;
        let req = Bindings::default()
            .handle(&mut state, FilterEvent::Reload)
            .unwrap();
        assert_eq!(req.page, 3);
    }
}
