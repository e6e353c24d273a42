use crate::news::article::{ApiErrorBody, ArticlesResponse, RawArticle};
use futures::StreamExt;
use secrecy::{ExposeSecret, SecretString};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use url::Url;

const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Errors from fetching one page of headlines.
///
/// Every variant is treated the same way by the feed store: the page is
/// not consumed and the next trigger asks for it again.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, timeout)
    #[error("Request failed: {0}")]
    Network(reqwest::Error),
    /// Anything other than 200 OK, with no recognizable error body
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Non-200 response carrying a NewsAPI error body
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },
    /// Body was not the expected JSON shape
    #[error("Parse error: {0}")]
    Parse(String),
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Received fewer bytes than Content-Length announced
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
    /// Configured base URL could not be turned into a request URL
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

// The request URL carries the API key, so it is dropped from transport errors
// before they reach logs or the screen.
impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Network(e.without_url())
    }
}

/// Somewhere pages of raw articles come from.
///
/// The feed store only talks to this trait, so tests can hand it a fake.
pub trait NewsSource: Send + Sync + 'static {
    /// Fetch page `page` (1-based). One attempt, no retries.
    fn fetch_page(
        &self,
        page: u32,
    ) -> impl Future<Output = Result<Vec<RawArticle>, FetchError>> + Send;
}

/// Connection settings for a NewsAPI-compatible endpoint.
///
/// `Debug` is derived; `SecretString` prints as redacted.
#[derive(Debug, Clone)]
pub struct NewsApiConfig {
    pub base_url: String,
    pub source: String,
    pub api_key: SecretString,
    pub page_size: Option<u32>,
    pub timeout: Duration,
}

/// `NewsSource` backed by the `top-headlines` endpoint.
#[derive(Debug, Clone)]
pub struct NewsApiClient {
    client: reqwest::Client,
    config: NewsApiConfig,
}

impl NewsApiClient {
    pub fn new(config: NewsApiConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("newsdeck/", env!("CARGO_PKG_VERSION")))
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Duration::from_secs(30))
            .timeout(config.timeout)
            .build()?;

        // Fail at construction rather than on the first page
        page_url(&config, 1)?;

        Ok(Self { client, config })
    }

    async fn get_page(&self, page: u32) -> Result<Vec<RawArticle>, FetchError> {
        let url = page_url(&self.config, page)?;

        tracing::debug!(source = %self.config.source, page, "Requesting headlines page");

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status != reqwest::StatusCode::OK {
            // Best effort: NewsAPI explains most failures in the body
            let body = read_limited_bytes(response, MAX_RESPONSE_SIZE)
                .await
                .unwrap_or_default();
            return Err(status_error(status.as_u16(), &body));
        }

        let bytes = read_limited_bytes(response, MAX_RESPONSE_SIZE).await?;
        let decoded: ArticlesResponse =
            serde_json::from_slice(&bytes).map_err(|e| FetchError::Parse(e.to_string()))?;

        tracing::debug!(
            page,
            status = decoded.status.as_deref().unwrap_or("unknown"),
            total_results = ?decoded.total_results,
            received = decoded.articles.len(),
            "Decoded headlines page"
        );

        Ok(decoded.articles)
    }
}

impl NewsSource for NewsApiClient {
    fn fetch_page(
        &self,
        page: u32,
    ) -> impl Future<Output = Result<Vec<RawArticle>, FetchError>> + Send {
        self.get_page(page)
    }
}

/// Build `{base}/top-headlines?sources=..&page=..&apiKey=..`.
///
/// Query values are percent-encoded; a trailing slash on the base is tolerated.
pub fn page_url(config: &NewsApiConfig, page: u32) -> Result<Url, FetchError> {
    let base = config.base_url.trim_end_matches('/');
    let mut url = Url::parse(&format!("{}/top-headlines", base))?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("sources", &config.source);
        query.append_pair("page", &page.to_string());
        if let Some(size) = config.page_size {
            query.append_pair("pageSize", &size.to_string());
        }
        query.append_pair("apiKey", config.api_key.expose_secret());
    }
    Ok(url)
}

fn status_error(status: u16, body: &[u8]) -> FetchError {
    match serde_json::from_slice::<ApiErrorBody>(body) {
        Ok(ApiErrorBody {
            code,
            message: Some(message),
        }) => FetchError::Api {
            status,
            code,
            message,
        },
        _ => FetchError::HttpStatus(status),
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    let expected_length = response.content_length();

    if let Some(len) = expected_length {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(FetchError::IncompleteResponse {
                expected,
                received: bytes.len(),
            });
        }
    }

    Ok(bytes)
}
