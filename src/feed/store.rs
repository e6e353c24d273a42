use crate::news::{collect_displayable, Article, FetchError, NewsSource};
use std::sync::Arc;
use tokio::sync::watch;

/// Page number requested first.
pub const FIRST_PAGE: u32 = 1;

/// Everything the viewer needs to know about the feed.
///
/// Snapshots are cheap to clone: `items` is shared until the next append.
#[derive(Debug, Clone)]
pub struct FeedState {
    /// Articles in arrival order. Append-only.
    pub items: Arc<Vec<Article>>,
    /// Page the next fetch will ask for.
    pub next_page: u32,
    /// True only while a page request is outstanding.
    pub fetch_in_flight: bool,
    /// Message from the most recent failed fetch, cleared by the next success.
    pub last_error: Option<String>,
}

impl FeedState {
    pub fn new() -> Self {
        Self {
            items: Arc::new(Vec::new()),
            next_page: FIRST_PAGE,
            fetch_in_flight: false,
            last_error: None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn pages_loaded(&self) -> u32 {
        self.next_page - FIRST_PAGE
    }

    /// Nothing to show and nothing coming: the "no news" state.
    pub fn is_empty_and_idle(&self) -> bool {
        self.items.is_empty() && !self.fetch_in_flight
    }
}

impl Default for FeedState {
    fn default() -> Self {
        Self::new()
    }
}

/// What a call to [`FeedStore::fetch_next_page`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// Another fetch was already in flight; nothing happened.
    Skipped,
    /// `page` arrived; `added` articles were appended and `dropped` filtered out.
    Appended {
        page: u32,
        added: usize,
        dropped: usize,
    },
}

/// Prefetch fires when the viewer lands on the second-to-last loaded item.
pub fn is_prefetch_position(index: usize, len: usize) -> bool {
    len >= 2 && index == len - 2
}

/// Owns the growing article list and the page cursor.
///
/// Cloning is cheap and every clone drives the same feed. State changes are
/// published through a `watch` channel; see [`FeedStore::subscribe`].
pub struct FeedStore<S> {
    inner: Arc<Inner<S>>,
}

struct Inner<S> {
    source: S,
    state: watch::Sender<FeedState>,
}

impl<S> Clone for FeedStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: NewsSource> FeedStore<S> {
    pub fn new(source: S) -> Self {
        let (state, _) = watch::channel(FeedState::new());
        Self {
            inner: Arc::new(Inner { source, state }),
        }
    }

    pub fn source(&self) -> &S {
        &self.inner.source
    }

    /// Receive every state change from now on.
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.inner.state.subscribe()
    }

    pub fn snapshot(&self) -> FeedState {
        self.inner.state.borrow().clone()
    }

    pub fn should_prefetch(&self, index: usize) -> bool {
        is_prefetch_position(index, self.inner.state.borrow().items.len())
    }

    /// Fetch the page under the cursor and append what survives the filter.
    ///
    /// Returns [`PageOutcome::Skipped`] without touching anything if a fetch
    /// is already in flight. On failure the cursor stays put, so the next
    /// call asks for the same page again.
    pub async fn fetch_next_page(&self) -> Result<PageOutcome, FetchError> {
        let Some(page) = self.claim() else {
            tracing::debug!("Fetch already in flight, skipping");
            return Ok(PageOutcome::Skipped);
        };

        let mut guard = InFlightGuard {
            state: &self.inner.state,
            page,
            armed: true,
        };
        let result = self.inner.source.fetch_page(page).await;
        guard.armed = false;

        match result {
            Ok(raw) => {
                let (articles, dropped) = collect_displayable(raw);
                let added = articles.len();

                self.inner.state.send_modify(|s| {
                    Arc::make_mut(&mut s.items).extend(articles);
                    s.next_page += 1;
                    s.fetch_in_flight = false;
                    s.last_error = None;
                });

                if dropped > 0 {
                    tracing::debug!(page, dropped, "Articles without content or image skipped");
                }
                tracing::info!(
                    page,
                    added,
                    total = self.inner.state.borrow().items.len(),
                    "Page appended"
                );

                Ok(PageOutcome::Appended {
                    page,
                    added,
                    dropped,
                })
            }
            Err(e) => {
                tracing::warn!(page, error = %e, "Page fetch failed");
                let message = e.to_string();
                self.inner.state.send_modify(|s| {
                    s.fetch_in_flight = false;
                    s.last_error = Some(message);
                });
                Err(e)
            }
        }
    }

    /// Viewer moved to `index`; fetch ahead if it is the prefetch position.
    ///
    /// Returns `None` when no fetch was attempted.
    pub async fn on_viewer_position_changed(
        &self,
        index: usize,
    ) -> Option<Result<PageOutcome, FetchError>> {
        if !self.should_prefetch(index) {
            return None;
        }
        tracing::debug!(index, "Viewer reached prefetch position");
        Some(self.fetch_next_page().await)
    }

    /// Atomically set the in-flight flag. Returns the page to fetch, or
    /// `None` if the flag was already set.
    fn claim(&self) -> Option<u32> {
        let mut claimed = None;
        self.inner.state.send_if_modified(|s| {
            if s.fetch_in_flight {
                return false;
            }
            s.fetch_in_flight = true;
            claimed = Some(s.next_page);
            true
        });
        claimed
    }
}

/// Clears the in-flight flag if the fetch future is dropped before completing.
struct InFlightGuard<'a> {
    state: &'a watch::Sender<FeedState>,
    page: u32,
    armed: bool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::debug!(page = self.page, "Fetch abandoned before completion");
            self.state.send_modify(|s| s.fetch_in_flight = false);
        }
    }
}
