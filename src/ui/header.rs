use crate::app::App;
use crate::util::truncate_to_width;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render the filter summary line.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let p = &app.palette;
    let query_style = if app.search_mode {
        p.search_active
    } else {
        p.header_value
    };
    let query = if app.search_mode {
        format!("{}_", app.search_input)
    } else if app.filters.search_query.is_empty() {
        "-".to_string()
    } else {
        app.filters.search_query.clone()
    };

    let mut spans = vec![
        Span::styled(" headlines ", p.header),
        Span::styled(" category ", p.header),
        Span::styled(app.filters.category.clone(), p.header_value),
        Span::styled("  country ", p.header),
        Span::styled(app.filters.country.clone(), p.header_value),
        Span::styled("  page ", p.header),
        Span::styled(app.filters.page.to_string(), p.header_value),
        Span::styled("  search ", p.header),
    ];

    let used: usize = spans.iter().map(|s| s.width()).sum();
    let room = (area.width as usize).saturating_sub(used + 12);
    spans.push(Span::styled(
        truncate_to_width(&query, room).into_owned(),
        query_style,
    ));

    if app.is_loading() {
        spans.push(Span::styled("  loading...", p.header));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).style(p.header), area);
}
