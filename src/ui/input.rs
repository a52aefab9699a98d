//! Input handling for the TUI.
//!
//! Key presses move the selection, become filter events for the bindings, or
//! trigger app actions like opening a link or toggling the theme.

use crate::app::{App, AppEvent, BLOCK_HEIGHT};
use crate::bindings::FilterEvent;
use crate::filters::{cycle, CATEGORIES, COUNTRIES};
use crate::util::validate_link;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::Action;

/// Longest search text accepted from the keyboard.
const MAX_SEARCH_LENGTH: usize = 256;

/// Main input dispatch function.
pub(super) async fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    if app.search_mode {
        handle_search_input(app, code, event_tx);
        return Action::Continue;
    }
    handle_browse_input(app, code, modifiers, event_tx).await
}

async fn handle_browse_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    let page = (app.viewport_height / BLOCK_HEIGHT).max(1);
    let half_page = (page / 2).max(1);

    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Action::Quit,
        KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
            move_down(app, half_page, event_tx);
        }
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.select_prev(half_page);
        }
        KeyCode::Char('j') | KeyCode::Down => move_down(app, 1, event_tx),
        KeyCode::Char('k') | KeyCode::Up => {
            app.select_prev(1);
        }
        KeyCode::PageDown => move_down(app, page, event_tx),
        KeyCode::PageUp => {
            app.select_prev(page);
        }
        KeyCode::Char('c') => {
            let next = cycle(CATEGORIES, &app.filters.category, true).to_string();
            app.dispatch(FilterEvent::CategoryChanged(next), event_tx);
        }
        KeyCode::Char('C') => {
            let prev = cycle(CATEGORIES, &app.filters.category, false).to_string();
            app.dispatch(FilterEvent::CategoryChanged(prev), event_tx);
        }
        KeyCode::Char('n') => {
            let next = cycle(COUNTRIES, &app.filters.country, true).to_string();
            app.dispatch(FilterEvent::CountryChanged(next), event_tx);
        }
        KeyCode::Char('N') => {
            let prev = cycle(COUNTRIES, &app.filters.country, false).to_string();
            app.dispatch(FilterEvent::CountryChanged(prev), event_tx);
        }
        KeyCode::Char('/') => {
            app.search_mode = true;
            app.search_input = app.filters.search_query.clone();
        }
        KeyCode::Char('r') => {
            app.dispatch(FilterEvent::Reload, event_tx);
            app.set_status("Reloading...");
        }
        KeyCode::Char('o') | KeyCode::Enter => open_selected(app),
        KeyCode::Char('t') => toggle_theme(app).await,
        _ => {}
    }
    Action::Continue
}

/// Every edit is a search change; Enter and Esc only leave the input.
fn handle_search_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) {
    match code {
        KeyCode::Enter | KeyCode::Esc => {
            app.search_mode = false;
        }
        KeyCode::Backspace => {
            if app.search_input.pop().is_some() {
                let text = app.search_input.clone();
                app.dispatch(FilterEvent::SearchChanged(text), event_tx);
            }
        }
        KeyCode::Char(c) if !c.is_control() => {
            if app.search_input.chars().count() >= MAX_SEARCH_LENGTH {
                app.set_status(format!(
                    "Search query too long (max {} chars)",
                    MAX_SEARCH_LENGTH
                ));
                return;
            }
            app.search_input.push(c);
            let text = app.search_input.clone();
            app.dispatch(FilterEvent::SearchChanged(text), event_tx);
        }
        _ => {}
    }
}

/// Move the selection down; a press on the last article asks for the next page.
fn move_down(app: &mut App, steps: usize, event_tx: &mpsc::Sender<AppEvent>) {
    if !app.is_on_last_article() {
        app.select_next(steps);
        return;
    }
    let position = app.scroll_position();
    if app.dispatch(FilterEvent::Scrolled(position), event_tx) {
        app.set_status(format!("Loading page {}...", app.filters.page));
    }
}

fn open_selected(app: &mut App) {
    let Some(article) = app.selected_article() else {
        app.set_status("No article selected");
        return;
    };
    let link = article.url.clone();

    match validate_link(&link) {
        Err(e) => app.set_status(e.to_string()),
        Ok(url) => {
            if let Err(e) = open::that(url.as_str()) {
                app.set_status(format!("Failed to open browser: {}", e));
            } else {
                app.set_status("Opening in browser...");
            }
        }
    }
}

/// Flip and persist the theme.
///
/// Awaited inline so a second press starts only after the first is stored.
async fn toggle_theme(app: &mut App) {
    match app.db.toggle_theme(app.theme_variant).await {
        Ok(variant) => {
            app.set_theme(variant);
            app.set_status(format!("Theme: {}", variant.name()));
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to save theme");
            app.set_status(format!("Failed to save theme: {}", e));
        }
    }
}
