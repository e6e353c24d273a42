//! Background task helpers shared by input handling and the event loop.

use crate::app::{AppEvent, FetchTrigger};
use crate::feed::FeedStore;
use crate::news::NewsSource;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

/// Run `future`, turning a panic into `Err(message)`.
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            }
        })
}

async fn send_event(tx: &mpsc::Sender<AppEvent>, event: AppEvent) {
    if let Err(e) = tx.send(event).await {
        tracing::warn!(error = %e, "Channel send failed (receiver dropped)");
    }
}

/// Spawn `fetch_next_page()` and report the outcome on `event_tx`.
///
/// The store's own in-flight flag decides whether anything is requested.
pub(super) fn spawn_fetch<S: NewsSource>(
    store: &FeedStore<S>,
    trigger: FetchTrigger,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    let store = store.clone();
    let tx = event_tx.clone();

    tracing::debug!(trigger = trigger.as_str(), "Spawning page fetch");

    tokio::spawn(async move {
        let event = match catch_task_panic(store.fetch_next_page()).await {
            Ok(result) => AppEvent::FetchFinished {
                trigger,
                result: result.map_err(|e| e.to_string()),
            },
            Err(error) => AppEvent::TaskPanicked {
                task: "fetch",
                error,
            },
        };
        send_event(&tx, event).await;
    });
}

/// Tell the store the viewer moved to `index`.
///
/// Only spawns a task when the store would actually prefetch, so ordinary
/// navigation costs nothing.
pub(super) fn spawn_position_changed<S: NewsSource>(
    store: &FeedStore<S>,
    index: usize,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    if !store.should_prefetch(index) {
        return;
    }

    let store = store.clone();
    let tx = event_tx.clone();

    tokio::spawn(async move {
        match catch_task_panic(store.on_viewer_position_changed(index)).await {
            Ok(None) => {}
            Ok(Some(result)) => {
                let event = AppEvent::FetchFinished {
                    trigger: FetchTrigger::Prefetch,
                    result: result.map_err(|e| e.to_string()),
                };
                send_event(&tx, event).await;
            }
            Err(error) => {
                send_event(
                    &tx,
                    AppEvent::TaskPanicked {
                        task: "prefetch",
                        error,
                    },
                )
                .await;
            }
        }
    });
}
