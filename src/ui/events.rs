//! Application event handling.
//!
//! Applies results delivered by background tasks to the app state.

use crate::app::{App, AppEvent};
use crate::pipeline::Outcome;

/// Handle an event from a background task.
///
/// Pipeline results are applied in arrival order; a slow run that finishes
/// after a newer one replaces it on screen.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    app.needs_redraw = true;

    match event {
        AppEvent::Displayed {
            filters,
            view,
            outcome,
        } => {
            tracing::debug!(
                page = filters.page,
                ?outcome,
                blocks = view.articles.len(),
                "Applying pipeline result"
            );
            if filters.page > 1 {
                if let Outcome::Cached { .. } = outcome {
                    app.set_status(format!("Page {} (cached)", filters.page));
                } else if let Outcome::Fetched { .. } = outcome {
                    app.set_status(format!("Page {}", filters.page));
                }
            }
            app.show_feed(filters, view);
        }
        AppEvent::TaskPanicked { task, error } => {
            if task == "fetch" {
                app.in_flight = app.in_flight.saturating_sub(1);
            }
            app.set_status(format!("Internal error in {} task: {}", task, error));
        }
    }
}
