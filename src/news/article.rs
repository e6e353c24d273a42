use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Title shown when the upstream record has none.
pub const NO_TITLE: &str = "No Title";

/// Body shown when the upstream record has no `content` field.
pub const NO_CONTENT: &str = "No content available.";

/// Top-level body of a successful `top-headlines` response.
///
/// Only `articles` is required; `status` and `totalResults` are kept for logging.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlesResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub total_results: Option<u64>,
    pub articles: Vec<RawArticle>,
}

/// Error body returned by NewsAPI alongside a non-200 status.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSource {
    #[serde(default)]
    pub name: Option<String>,
}

/// One element of the `articles` array, exactly as the server sent it.
///
/// Every field is optional and `null` is treated the same as missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url_to_image: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub source: Option<RawSource>,
}

/// A single news card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    /// Never defaulted: a missing image keeps the article out of the feed.
    pub image_url: Option<String>,
    pub content: String,
    /// Empty when the record had no link; opening it is then a no-op.
    pub link_url: String,
    pub source_name: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

impl Article {
    pub fn from_raw(raw: RawArticle) -> Self {
        let title = raw
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| NO_TITLE.to_string());

        let published_at = raw.published_at.as_deref().and_then(|s| {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
        });

        Self {
            title,
            image_url: raw.url_to_image,
            content: raw.content.unwrap_or_else(|| NO_CONTENT.to_string()),
            link_url: raw.url.unwrap_or_default(),
            source_name: raw
                .source
                .and_then(|s| s.name)
                .filter(|n| !n.trim().is_empty()),
            published_at,
            description: raw.description.filter(|d| !d.trim().is_empty()),
        }
    }

    /// Whether the card has enough to render: some body text and an image.
    pub fn is_displayable(&self) -> bool {
        !self.content.is_empty() && self.image_url.is_some()
    }
}

/// Parse a page of raw records and drop the ones that can't be shown.
///
/// Returns the kept articles in arrival order plus the number dropped.
pub fn collect_displayable(raw: Vec<RawArticle>) -> (Vec<Article>, usize) {
    let total = raw.len();
    let kept: Vec<Article> = raw
        .into_iter()
        .map(Article::from_raw)
        .filter(Article::is_displayable)
        .collect();
    let dropped = total - kept.len();
    (kept, dropped)
}
