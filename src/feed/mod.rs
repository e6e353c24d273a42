//! The paginated article feed.
//!
//! [`FeedStore`] owns the list of fetched articles and the page cursor. It
//! fetches one page at a time through a [`NewsSource`](crate::news::NewsSource),
//! never more than one in flight, and publishes every change as a
//! [`FeedState`] snapshot over a `watch` channel.
//!
//! # Example
//!
//! ```ignore
//! let store = FeedStore::new(client);
//! let mut updates = store.subscribe();
//!
//! store.fetch_next_page().await?;
//! // Viewer moved; fetch ahead when it's on the second-to-last card
//! store.on_viewer_position_changed(index).await;
//! ```

mod store;

pub use store::{is_prefetch_position, FeedState, FeedStore, PageOutcome, FIRST_PAGE};
