//! Headline retrieval from a NewsAPI-compatible endpoint.
//!
//! - [`article`] - wire records, the [`Article`] card model and the keep/drop rule
//! - [`client`] - the [`NewsSource`] seam and its reqwest implementation

mod article;
mod client;

pub use article::{
    collect_displayable, Article, ArticlesResponse, RawArticle, RawSource, NO_CONTENT, NO_TITLE,
};
pub use client::{page_url, FetchError, NewsApiClient, NewsApiConfig, NewsSource};
