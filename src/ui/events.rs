//! Application event handling.
//!
//! Processes completion events from background fetch tasks. The articles
//! themselves arrive through the store's watch channel; these events only
//! drive the status bar.

use crate::app::{App, AppEvent, FetchTrigger};
use crate::feed::PageOutcome;

pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::FetchFinished { trigger, result } => {
            handle_fetch_finished(app, trigger, result);
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error, "Background task panicked");
            app.set_status(format!("Internal error in {} task", task));
        }
    }
}

fn handle_fetch_finished(
    app: &mut App,
    trigger: FetchTrigger,
    result: Result<PageOutcome, String>,
) {
    match result {
        Ok(PageOutcome::Skipped) => {
            if trigger == FetchTrigger::Manual {
                app.set_status("Already loading...");
            }
        }
        Ok(PageOutcome::Appended {
            page,
            added,
            dropped,
        }) => {
            tracing::debug!(
                trigger = trigger.as_str(),
                page,
                added,
                dropped,
                "Fetch finished"
            );
            if trigger == FetchTrigger::Manual || added == 0 {
                let msg = match added {
                    0 => "No new articles on this page".to_string(),
                    1 => "Loaded 1 article".to_string(),
                    n => format!("Loaded {} articles", n),
                };
                app.set_status(msg);
            }
        }
        Err(error) => {
            // Already logged by the store; keep the UI quiet but informative
            app.set_status(format!("Couldn't load news: {}", error));
        }
    }
}
