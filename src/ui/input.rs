//! Input handling for the TUI.
//!
//! Maps key presses to viewer moves and actions. Any move reports the new
//! position to the feed store so it can prefetch.

use crate::app::{App, AppEvent, FetchTrigger};
use crate::feed::FeedStore;
use crate::news::NewsSource;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::{spawn_fetch, spawn_position_changed};
use super::Action;

/// Main input dispatch function.
pub(super) fn handle_input<S: NewsSource>(
    app: &mut App,
    store: &FeedStore<S>,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    // Raw mode swallows SIGINT, so Ctrl+C arrives as a key
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Action::Quit;
    }

    if app.show_help {
        handle_help_input(app, code);
        return Action::Continue;
    }

    let moved = match code {
        KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
        KeyCode::Char('j') | KeyCode::Char(' ') | KeyCode::Down | KeyCode::PageDown => {
            let moved = app.advance();
            if moved.is_none() && !app.feed.is_empty() {
                if app.feed.fetch_in_flight {
                    app.set_status("Loading more...");
                } else {
                    app.set_status("End of loaded news, press r to load more");
                }
            }
            moved
        }
        KeyCode::Char('k') | KeyCode::Up | KeyCode::PageUp => app.back(),
        KeyCode::Char('g') | KeyCode::Home => app.jump_first(),
        KeyCode::Char('G') | KeyCode::End => app.jump_last(),
        KeyCode::Char('o') | KeyCode::Enter => {
            app.open_current();
            None
        }
        KeyCode::Char('r') => {
            spawn_fetch(store, FetchTrigger::Manual, event_tx);
            None
        }
        KeyCode::Char('?') => {
            app.show_help = true;
            None
        }
        _ => None,
    };

    if let Some(index) = moved {
        spawn_position_changed(store, index, event_tx);
    }

    Action::Continue
}

/// Any of Esc, `q` or `?` closes the help overlay.
fn handle_help_input(app: &mut App, code: KeyCode) {
    if matches!(
        code,
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')
    ) {
        app.show_help = false;
    }
}
