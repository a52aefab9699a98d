//! Application state for the TUI.
//!
//! [`App`] owns what is on screen: the filters the controls show, the last
//! rendered feed, the selected article, the theme and the status line. It
//! also spawns pipeline runs. Each run renders into its own [`FeedView`] and
//! reports back through an [`AppEvent`] on the UI loop's channel.
//!
//! Selection and scrolling are separate. `selected` is an article index;
//! `scroll_offset` is the first visible row and only moves as far as needed
//! to keep the selected article on screen.

use crate::bindings::{Bindings, FilterEvent, ScrollPosition};
use crate::filters::FilterState;
use crate::pipeline::{Outcome, Pipeline};
use crate::render::{ArticleBlock, FeedView};
use crate::storage::Database;
use crate::theme::{ColorPalette, ThemeVariant};
use crate::util::catch_task_panic;
use std::borrow::Cow;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Rows taken by one article: title, description, source, date, spacer.
pub const BLOCK_HEIGHT: usize = 5;

/// Seconds a status message stays visible.
const STATUS_TTL_SECS: u64 = 3;

// ============================================================================
// Event Types
// ============================================================================

/// Results delivered to the UI loop from background tasks.
#[derive(Debug)]
pub enum AppEvent {
    /// A pipeline run finished and rendered into `view`.
    Displayed {
        filters: FilterState,
        view: FeedView,
        outcome: Outcome,
    },
    /// A background task panicked before reporting back.
    TaskPanicked { task: &'static str, error: String },
}

// ============================================================================
// App State
// ============================================================================

pub struct App {
    pub db: Database,
    pub pipeline: Arc<Pipeline<Database>>,
    pub bindings: Bindings,

    /// Filters as the controls currently show them.
    pub filters: FilterState,
    /// Filters of the run that produced `feed`.
    pub shown_filters: Option<FilterState>,
    pub feed: FeedView,

    /// Index of the highlighted article.
    pub selected: usize,
    /// First visible row of the article list.
    pub scroll_offset: usize,
    /// Rows available to the article list at the last draw.
    pub viewport_height: usize,

    pub search_mode: bool,
    pub search_input: String,

    pub theme_variant: ThemeVariant,
    pub palette: ColorPalette,

    pub status_message: Option<(Cow<'static, str>, Instant)>,
    /// Pipeline runs spawned but not yet delivered.
    pub in_flight: usize,
    pub needs_redraw: bool,
}

impl App {
    pub fn new(
        db: Database,
        pipeline: Arc<Pipeline<Database>>,
        bindings: Bindings,
        filters: FilterState,
        theme: ThemeVariant,
    ) -> Self {
        let search_input = filters.search_query.clone();
        Self {
            db,
            pipeline,
            bindings,
            filters,
            shown_filters: None,
            feed: FeedView::loading(),
            selected: 0,
            scroll_offset: 0,
            viewport_height: 0,
            search_mode: false,
            search_input,
            theme_variant: theme,
            palette: theme.palette(),
            status_message: None,
            in_flight: 0,
            needs_redraw: true,
        }
    }

    // ========================================================================
    // Pipeline Dispatch
    // ========================================================================

    /// Feed `event` through the bindings and spawn a pipeline run if one is due.
    ///
    /// Returns true if a run was spawned. Runs are never cancelled; whichever
    /// finishes last decides what is on screen.
    pub fn dispatch(&mut self, event: FilterEvent, event_tx: &mpsc::Sender<AppEvent>) -> bool {
        let Some(request) = self.bindings.handle(&mut self.filters, event) else {
            return false;
        };
        self.spawn_fetch(request, event_tx);
        true
    }

    /// Run the pipeline for `request` in the background.
    pub fn spawn_fetch(&mut self, request: FilterState, event_tx: &mpsc::Sender<AppEvent>) {
        self.in_flight += 1;
        self.needs_redraw = true;

        let pipeline = Arc::clone(&self.pipeline);
        let tx = event_tx.clone();

        tracing::debug!(
            category = %request.category,
            query = %request.search_query,
            country = %request.country,
            page = request.page,
            "Spawning pipeline run"
        );

        tokio::spawn(async move {
            let run = catch_task_panic(async {
                let mut view = FeedView::default();
                let outcome = pipeline.fetch_and_display(&request, &mut view).await;
                (view, outcome)
            })
            .await;

            let event = match run {
                Ok((view, outcome)) => AppEvent::Displayed {
                    filters: request,
                    view,
                    outcome,
                },
                Err(error) => {
                    tracing::error!(error = %error, "Pipeline task panicked");
                    AppEvent::TaskPanicked {
                        task: "fetch",
                        error,
                    }
                }
            };
            if let Err(e) = tx.send(event).await {
                tracing::warn!(error = %e, "Failed to deliver headlines (receiver dropped)");
            }
        });
    }

    /// Replace the feed with a finished run's output.
    pub fn show_feed(&mut self, filters: FilterState, view: FeedView) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.feed = view;
        self.shown_filters = Some(filters);
        self.selected = 0;
        self.scroll_offset = 0;
        self.needs_redraw = true;
    }

    /// True while a pipeline run is outstanding.
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    // ========================================================================
    // Selection and Scrolling
    // ========================================================================

    /// Total rows of the rendered article list.
    pub fn content_rows(&self) -> usize {
        self.feed.articles.len() * BLOCK_HEIGHT
    }

    fn max_scroll(&self) -> usize {
        self.content_rows().saturating_sub(self.viewport_height.max(1))
    }

    fn last_index(&self) -> usize {
        self.feed.articles.len().saturating_sub(1)
    }

    /// Move the selection `steps` articles down. Returns true if it moved.
    pub fn select_next(&mut self, steps: usize) -> bool {
        let before = self.selected;
        self.selected = self.selected.saturating_add(steps).min(self.last_index());
        self.keep_selection_visible();
        self.selected != before
    }

    /// Move the selection `steps` articles up. Returns true if it moved.
    pub fn select_prev(&mut self, steps: usize) -> bool {
        let before = self.selected;
        self.selected = self.selected.saturating_sub(steps);
        self.keep_selection_visible();
        self.selected != before
    }

    pub fn is_on_last_article(&self) -> bool {
        !self.feed.articles.is_empty() && self.selected >= self.last_index()
    }

    /// Scroll the least amount that puts the whole selected block on screen.
    ///
    /// Blocks taller than the viewport are pinned at their first row.
    pub fn keep_selection_visible(&mut self) {
        self.selected = self.selected.min(self.last_index());
        let top = self.selected * BLOCK_HEIGHT;
        let bottom = top + BLOCK_HEIGHT;
        let viewport = self.viewport_height.max(1);

        if top < self.scroll_offset {
            self.scroll_offset = top;
        } else if bottom > self.scroll_offset + viewport {
            self.scroll_offset = (bottom - viewport).min(top);
        }
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    /// Current geometry, in rows, for the pagination binding.
    pub fn scroll_position(&self) -> ScrollPosition {
        let clamp = |v: usize| u32::try_from(v).unwrap_or(u32::MAX);
        ScrollPosition::new(
            clamp(self.scroll_offset),
            clamp(self.viewport_height),
            clamp(self.content_rows()),
        )
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_article(&self) -> Option<&ArticleBlock> {
        self.feed.articles.get(self.selected)
    }

    /// Select article `index`, clamped to the list.
    pub fn select_article(&mut self, index: usize) {
        self.selected = index.min(self.last_index());
        self.keep_selection_visible();
    }

    // ========================================================================
    // Theme and Status
    // ========================================================================

    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.palette = variant.palette();
        self.needs_redraw = true;
    }

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Clear status message if expired. Returns true if one was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::news::NewsClient;
    use crate::render::{DisplaySurface, MessageKind};
    use secrecy::SecretString;

    pub(crate) async fn test_app() -> App {
        let db = Database::open(":memory:").await.unwrap();
        let client = NewsClient::new(
            reqwest::Client::new(),
            Some("http://127.0.0.1:9/v2/top-headlines"),
            SecretString::from("k"),
        )
        .unwrap();
        let pipeline = Arc::new(Pipeline::new(client, db.clone()));
        App::new(
            db,
            pipeline,
            Bindings::new(3),
            FilterState::default(),
            ThemeVariant::Dark,
        )
    }

    fn view_with(count: usize) -> FeedView {
        let mut view = FeedView::default();
        for i in 0..count {
            view.push_article(ArticleBlock {
                title: format!("Article {i}"),
                url: format!("https://example.com/{i}"),
                description: String::new(),
                source: "Source: X".to_string(),
                published: "Published at: now".to_string(),
            });
        }
        view
    }

    #[tokio::test]
    async fn test_show_feed_resets_selection_and_counter() {
        let mut app = test_app().await;
        app.in_flight = 2;
        app.viewport_height = 10;
        app.show_feed(FilterState::default(), view_with(10));
        app.select_article(6);
        assert!(app.scroll_offset > 0);

        app.show_feed(FilterState::default(), view_with(3));
        assert_eq!(app.selected, 0);
        assert_eq!(app.scroll_offset, 0);
        assert_eq!(app.in_flight, 0);
        assert!(!app.is_loading());
    }

    #[tokio::test]
    async fn test_selection_moves_before_viewport() {
        let mut app = test_app().await;
        app.viewport_height = 10; // two blocks
        app.show_feed(FilterState::default(), view_with(4));

        assert!(app.select_next(1));
        assert_eq!(app.selected, 1);
        assert_eq!(app.scroll_offset, 0);

        assert!(app.select_next(1));
        assert_eq!(app.selected, 2);
        assert_eq!(app.scroll_offset, 5);

        assert!(app.select_prev(2));
        assert_eq!(app.scroll_offset, 0);
        assert!(!app.select_prev(1));
    }

    #[tokio::test]
    async fn test_every_article_on_a_full_page_is_selectable() {
        let mut app = test_app().await;
        app.viewport_height = 30;
        app.show_feed(FilterState::default(), view_with(20));

        for _ in 0..19 {
            assert!(app.select_next(1));
        }
        assert_eq!(app.selected_index(), 19);
        assert_eq!(app.selected_article().unwrap().title, "Article 19");
        assert!(app.is_on_last_article());
        assert_eq!(app.scroll_offset, 70);
        assert!(!app.select_next(1));
    }

    #[tokio::test]
    async fn test_select_article_clamps_and_scrolls() {
        let mut app = test_app().await;
        app.viewport_height = 5;
        app.show_feed(FilterState::default(), view_with(6));

        app.select_article(2);
        assert_eq!(app.selected_article().unwrap().title, "Article 2");
        assert_eq!(app.scroll_offset, 10);

        app.select_article(50);
        assert_eq!(app.selected_index(), 5);
        assert_eq!(app.scroll_offset, 25);
    }

    #[tokio::test]
    async fn test_shrunk_viewport_keeps_selection_visible() {
        let mut app = test_app().await;
        app.viewport_height = 50;
        app.show_feed(FilterState::default(), view_with(10));
        app.select_article(9);
        assert_eq!(app.scroll_offset, 0);

        app.viewport_height = 10;
        app.keep_selection_visible();
        assert_eq!(app.scroll_offset, 40);
    }

    #[tokio::test]
    async fn test_scroll_position_reports_rows() {
        let mut app = test_app().await;
        app.viewport_height = 8;
        app.show_feed(FilterState::default(), view_with(4));
        app.select_article(1);

        assert_eq!(app.scroll_position(), ScrollPosition::new(2, 8, 20));
    }

    #[tokio::test]
    async fn test_dispatch_far_from_bottom_spawns_nothing() {
        let mut app = test_app().await;
        let (tx, _rx) = mpsc::channel(4);
        app.viewport_height = 5;
        app.show_feed(FilterState::default(), view_with(20));

        let spawned = app.dispatch(FilterEvent::Scrolled(app.scroll_position()), &tx);
        assert!(!spawned);
        assert_eq!(app.in_flight, 0);
        assert_eq!(app.filters.page, 1);
    }

    #[tokio::test]
    async fn test_dispatch_near_bottom_delivers_next_page() {
        let mut app = test_app().await;
        let (tx, mut rx) = mpsc::channel(4);
        app.viewport_height = 5;
        app.show_feed(FilterState::default(), view_with(1));

        let spawned = app.dispatch(FilterEvent::Scrolled(app.scroll_position()), &tx);
        assert!(spawned);
        assert_eq!(app.in_flight, 1);

        // Nothing listens on the port, so the run fails and reports back
        match rx.recv().await.unwrap() {
            AppEvent::Displayed {
                filters,
                view,
                outcome,
            } => {
                assert_eq!(filters.page, 2);
                assert_eq!(outcome, Outcome::Failed);
                assert!(matches!(view.message, Some((_, MessageKind::Error))));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_set_theme_swaps_palette() {
        let mut app = test_app().await;
        app.set_theme(ThemeVariant::Light);
        assert_eq!(app.palette, ThemeVariant::Light.palette());
    }
}
