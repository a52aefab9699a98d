//! Article rendering.
//!
//! The renderer writes to a [`DisplaySurface`] it is handed rather than to
//! any particular widget. The terminal UI draws a [`FeedView`]; `--once`
//! writes through [`PlainText`].

use crate::news::Article;
use crate::util::{single_line, strip_control_chars};
use chrono::{DateTime, Local, TimeZone, Utc};
use std::io::Write;

/// Shown when a successful response carries no articles.
pub const NO_ARTICLES_MESSAGE: &str = "No articles found.";

/// Shown for every fetch failure, whatever the cause.
pub const FETCH_FAILED_MESSAGE: &str = "Sorry, we can't find any articles at the moment.";

/// Long-form date and time with the local offset from UTC, e.g.
/// `March 1, 2024 at 7:05:09 PM UTC+09:00`.
///
/// chrono has no zone names for `Local`, so the offset stands in for one.
const PUBLISHED_FORMAT: &str = "%B %-d, %Y at %-I:%M:%S %p UTC%:z";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

/// One rendered article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleBlock {
    pub title: String,
    /// Link target opened in the system browser.
    pub url: String,
    pub description: String,
    /// `Source: <name>`
    pub source: String,
    /// `Published at: <timestamp>`
    pub published: String,
}

/// Anything the renderer can draw into.
pub trait DisplaySurface {
    /// Remove everything currently shown.
    fn clear(&mut self);

    /// Show a single message in place of the article list.
    fn show_message(&mut self, message: &str, kind: MessageKind);

    /// Append one article below those already shown.
    fn push_article(&mut self, block: ArticleBlock);
}

/// Replace the surface contents with `articles`.
///
/// An empty slice shows [`NO_ARTICLES_MESSAGE`]. Removed articles are
/// skipped; the rest keep their input order.
pub fn render_articles<S: DisplaySurface + ?Sized>(articles: &[Article], surface: &mut S) {
    surface.clear();

    if articles.is_empty() {
        surface.show_message(NO_ARTICLES_MESSAGE, MessageKind::Info);
        return;
    }

    for article in articles.iter().filter(|a| !a.is_removed()) {
        surface.push_article(article_block(article));
    }
}

/// Replace the surface contents with an error message.
pub fn show_error<S: DisplaySurface + ?Sized>(surface: &mut S, message: &str) {
    surface.clear();
    surface.show_message(message, MessageKind::Error);
}

pub fn article_block(article: &Article) -> ArticleBlock {
    let source_name = article
        .source
        .name
        .as_deref()
        .map(strip_control_chars)
        .unwrap_or_else(|| "Unknown".into());

    ArticleBlock {
        title: strip_control_chars(&article.title).into_owned(),
        url: article.url.clone(),
        description: article
            .description
            .as_deref()
            .map(|d| single_line(&strip_control_chars(d)))
            .unwrap_or_default(),
        source: format!("Source: {}", source_name),
        published: format!("Published at: {}", format_published(&article.published_at)),
    }
}

/// Format a publication instant in the local time zone.
pub fn format_published(published_at: &DateTime<Utc>) -> String {
    format_published_in(published_at, &Local)
}

pub fn format_published_in<Tz>(published_at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    published_at
        .with_timezone(tz)
        .format(PUBLISHED_FORMAT)
        .to_string()
}

// ============================================================================
// Surfaces
// ============================================================================

/// In-memory surface drawn by the terminal UI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedView {
    pub message: Option<(String, MessageKind)>,
    pub articles: Vec<ArticleBlock>,
}

impl FeedView {
    /// View shown before the first pipeline run completes.
    pub fn loading() -> Self {
        Self {
            message: Some(("Loading headlines...".to_string(), MessageKind::Info)),
            articles: Vec::new(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.message, Some((_, MessageKind::Error)))
    }
}

impl DisplaySurface for FeedView {
    fn clear(&mut self) {
        self.message = None;
        self.articles.clear();
    }

    fn show_message(&mut self, message: &str, kind: MessageKind) {
        self.message = Some((message.to_string(), kind));
    }

    fn push_article(&mut self, block: ArticleBlock) {
        self.articles.push(block);
    }
}

/// Writes blocks as plain text, one paragraph per article.
///
/// Write errors are logged rather than returned; a closed pipe simply ends
/// the output.
pub struct PlainText<W: Write> {
    out: W,
}

impl<W: Write> PlainText<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()) {
            tracing::debug!(error = %e, "Failed to write output");
        }
    }
}

impl<W: Write> DisplaySurface for PlainText<W> {
    fn clear(&mut self) {}

    fn show_message(&mut self, message: &str, _kind: MessageKind) {
        self.write(&format!("{}\n", message));
    }

    fn push_article(&mut self, block: ArticleBlock) {
        let mut text = format!("{}\n  {}\n", block.title, block.url);
        if !block.description.is_empty() {
            text.push_str(&format!("  {}\n", block.description));
        }
        text.push_str(&format!("  {}\n  {}\n\n", block.source, block.published));
        self.write(&text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::Source;
    use chrono::FixedOffset;
    use pretty_assertions::assert_eq;

    fn article(title: &str) -> Article {
        Article {
            title: title.to_string(),
            description: Some(format!("About {title}")),
            url: format!("https://example.com/{}", title.replace(' ', "-")),
            source: Source {
                id: None,
                name: Some("Example News".to_string()),
            },
            author: None,
            published_at: "2024-03-01T10:05:09Z".parse().unwrap(),
        }
    }

    #[test]
    fn test_removed_articles_skipped() {
        let articles = vec![article("One"), article("[Removed]"), article("Two")];
        let mut view = FeedView::default();
        render_articles(&articles, &mut view);

        assert_eq!(view.articles.len(), 2);
        assert_eq!(view.articles[0].title, "One");
        assert_eq!(view.articles[1].title, "Two");
        assert!(view.message.is_none());
    }

    #[test]
    fn test_empty_shows_no_articles_message() {
        let mut view = FeedView::default();
        render_articles(&[], &mut view);

        assert!(view.articles.is_empty());
        assert_eq!(
            view.message,
            Some((NO_ARTICLES_MESSAGE.to_string(), MessageKind::Info))
        );
    }

    #[test]
    fn test_only_removed_articles_shows_nothing() {
        let mut view = FeedView::default();
        render_articles(&[article("[Removed]")], &mut view);
        assert!(view.articles.is_empty());
        assert!(view.message.is_none());
    }

    #[test]
    fn test_render_clears_previous_contents() {
        let mut view = FeedView::default();
        show_error(&mut view, FETCH_FAILED_MESSAGE);
        render_articles(&[article("Fresh")], &mut view);

        assert!(view.message.is_none());
        assert_eq!(view.articles.len(), 1);
    }

    #[test]
    fn test_show_error_replaces_articles() {
        let mut view = FeedView::default();
        render_articles(&[article("Old")], &mut view);
        show_error(&mut view, FETCH_FAILED_MESSAGE);

        assert!(view.articles.is_empty());
        assert!(view.is_error());
    }

    #[test]
    fn test_block_lines() {
        let block = article_block(&article("Big Story"));
        assert_eq!(block.url, "https://example.com/Big-Story");
        assert_eq!(block.description, "About Big Story");
        assert_eq!(block.source, "Source: Example News");
        assert!(block.published.starts_with("Published at: "));
    }

    #[test]
    fn test_missing_fields_in_block() {
        let mut a = article("Bare");
        a.description = None;
        a.source = Source::default();
        let block = article_block(&a);
        assert_eq!(block.description, "");
        assert_eq!(block.source, "Source: Unknown");
    }

    #[test]
    fn test_control_chars_stripped_from_title() {
        let block = article_block(&article("Evil\x1b[2Jtitle"));
        assert!(!block.title.contains('\x1b'));
    }

    #[test]
    fn test_format_published_utc() {
        let dt: DateTime<Utc> = "2024-03-01T10:05:09Z".parse().unwrap();
        assert_eq!(
            format_published_in(&dt, &Utc),
            "March 1, 2024 at 10:05:09 AM UTC+00:00"
        );
    }

    #[test]
    fn test_format_published_afternoon() {
        let dt: DateTime<Utc> = "2023-12-25T23:00:00Z".parse().unwrap();
        assert_eq!(
            format_published_in(&dt, &Utc),
            "December 25, 2023 at 11:00:00 PM UTC+00:00"
        );
    }

    #[test]
    fn test_format_published_labels_offset_zone() {
        let dt: DateTime<Utc> = "2024-03-01T10:05:09Z".parse().unwrap();
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(
            format_published_in(&dt, &tokyo),
            "March 1, 2024 at 7:05:09 PM UTC+09:00"
        );

        let new_york = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(
            format_published_in(&dt, &new_york),
            "March 1, 2024 at 5:05:09 AM UTC-05:00"
        );
    }

    #[test]
    fn test_plain_text_output() {
        let mut out = PlainText::new(Vec::new());
        render_articles(&[article("Headline")], &mut out);
        let text = String::from_utf8(out.into_inner()).unwrap();

        assert!(text.starts_with("Headline\n  https://example.com/Headline\n"));
        assert!(text.contains("  Source: Example News\n"));
        assert!(text.contains("Published at: "));
    }
}
