use crate::app::{App, BLOCK_HEIGHT};
use crate::render::{ArticleBlock, MessageKind};
use crate::theme::ColorPalette;
use crate::util::truncate_to_width;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the article list panel.
///
/// Records the inner height on `app.viewport_height` for scroll geometry.
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.palette.panel_border)
        .title(" Top headlines ");
    let inner = block.inner(area);
    app.viewport_height = inner.height as usize;
    app.keep_selection_visible();

    if let Some((message, kind)) = &app.feed.message {
        let style = match kind {
            MessageKind::Info => app.palette.message,
            MessageKind::Error => app.palette.error_message,
        };
        let paragraph = Paragraph::new(message.as_str())
            .style(style)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let width = inner.width as usize;
    let selected = app.selected_index();
    let lines: Vec<Line> = app
        .feed
        .articles
        .iter()
        .enumerate()
        .flat_map(|(i, article)| block_lines(article, width, i == selected, &app.palette))
        .collect();

    let offset = u16::try_from(app.scroll_offset).unwrap_or(u16::MAX);
    let paragraph = Paragraph::new(lines).block(block).scroll((offset, 0));
    f.render_widget(paragraph, area);
}

/// Lines for one article; always [`BLOCK_HEIGHT`] long.
fn block_lines<'a>(
    article: &'a ArticleBlock,
    width: usize,
    selected: bool,
    p: &ColorPalette,
) -> [Line<'a>; BLOCK_HEIGHT] {
    let title_style = if selected {
        p.article_selected
    } else {
        p.article_title
    };

    [
        Line::from(Span::styled(
            truncate_to_width(&article.title, width),
            title_style,
        )),
        Line::from(Span::styled(
            truncate_to_width(&article.description, width),
            p.article_description,
        )),
        Line::from(Span::styled(
            truncate_to_width(&article.source, width),
            p.article_source,
        )),
        Line::from(Span::styled(
            truncate_to_width(&article.published, width),
            p.article_date,
        )),
        Line::default(),
    ]
}
