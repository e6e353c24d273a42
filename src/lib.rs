//! newsdeck: a terminal reader for paginated NewsAPI headlines.
//!
//! The binary wires these modules together; integration tests drive
//! [`feed::FeedStore`] directly against a mock server.

pub mod app;
pub mod config;
pub mod feed;
pub mod news;
pub mod opener;
pub mod ui;
pub mod util;
