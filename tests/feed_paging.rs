//! Integration tests for paging through headlines against a mock NewsAPI.
//!
//! Each test starts its own wiremock server and drives a real
//! `FeedStore<NewsApiClient>` over HTTP.

use newsdeck::feed::{FeedStore, PageOutcome};
use newsdeck::news::{FetchError, NewsApiClient, NewsApiConfig};
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(base_url: &str) -> NewsApiConfig {
    NewsApiConfig {
        base_url: base_url.to_string(),
        source: "bbc-news".to_string(),
        api_key: SecretString::from("test-key"),
        page_size: None,
        timeout: Duration::from_secs(5),
    }
}

fn store_for(server: &MockServer) -> FeedStore<NewsApiClient> {
    FeedStore::new(NewsApiClient::new(config(&server.uri())).unwrap())
}

fn displayable(title: &str) -> Value {
    json!({
        "source": { "id": "bbc-news", "name": "BBC News" },
        "title": title,
        "description": "desc",
        "url": format!("https://www.bbc.co.uk/news/{}", title),
        "urlToImage": format!("https://ichef.bbci.co.uk/{}.jpg", title),
        "publishedAt": "2024-03-10T09:30:00Z",
        "content": format!("{} body", title)
    })
}

fn page_body(articles: Vec<Value>) -> Value {
    json!({
        "status": "ok",
        "totalResults": 100,
        "articles": articles
    })
}

async fn mount_page(server: &MockServer, page: u32, articles: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(articles)))
        .expect(1)
        .mount(server)
        .await;
}

fn titles(store: &FeedStore<NewsApiClient>) -> Vec<String> {
    store
        .snapshot()
        .items
        .iter()
        .map(|a| a.title.clone())
        .collect()
}

// ============================================================================
// Paging
// ============================================================================

#[tokio::test]
async fn test_pages_append_in_order() {
    let server = MockServer::start().await;
    mount_page(&server, 1, vec![displayable("a"), displayable("b")]).await;
    mount_page(&server, 2, vec![displayable("c")]).await;

    let store = store_for(&server);

    let first = store.fetch_next_page().await.unwrap();
    assert_eq!(
        first,
        PageOutcome::Appended {
            page: 1,
            added: 2,
            dropped: 0
        }
    );
    store.fetch_next_page().await.unwrap();

    let state = store.snapshot();
    assert_eq!(titles(&store), vec!["a", "b", "c"]);
    assert_eq!(state.next_page, 3);
    assert!(!state.fetch_in_flight);
    assert_eq!(state.last_error, None);
}

#[tokio::test]
async fn test_request_carries_source_and_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .and(query_param("sources", "bbc-news"))
        .and(query_param("page", "1"))
        .and(query_param("apiKey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(vec![])))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.fetch_next_page().await.unwrap();

    assert_eq!(store.snapshot().next_page, 2);
}

#[tokio::test]
async fn test_prefetch_at_second_to_last_item() {
    let server = MockServer::start().await;
    mount_page(&server, 1, vec![displayable("a"), displayable("b"), displayable("c")]).await;
    mount_page(&server, 2, vec![displayable("d")]).await;

    let store = store_for(&server);
    store.fetch_next_page().await.unwrap();

    assert!(store.on_viewer_position_changed(0).await.is_none());
    assert!(matches!(
        store.on_viewer_position_changed(1).await,
        Some(Ok(PageOutcome::Appended { page: 2, .. }))
    ));

    assert_eq!(titles(&store), vec!["a", "b", "c", "d"]);
}

// ============================================================================
// Filtering
// ============================================================================

#[tokio::test]
async fn test_records_without_content_or_image_are_dropped() {
    let server = MockServer::start().await;
    let mut no_image = displayable("no-image");
    no_image["urlToImage"] = Value::Null;
    let mut no_content = displayable("no-content");
    no_content["content"] = Value::Null;

    mount_page(
        &server,
        1,
        vec![displayable("kept"), no_image, no_content, json!({})],
    )
    .await;

    let store = store_for(&server);
    let outcome = store.fetch_next_page().await.unwrap();

    assert_eq!(
        outcome,
        PageOutcome::Appended {
            page: 1,
            added: 1,
            dropped: 3
        }
    );
    assert_eq!(titles(&store), vec!["kept"]);
}

#[tokio::test]
async fn test_missing_title_gets_placeholder() {
    let server = MockServer::start().await;
    let mut untitled = displayable("x");
    untitled["title"] = Value::Null;
    mount_page(&server, 1, vec![untitled]).await;

    let store = store_for(&server);
    store.fetch_next_page().await.unwrap();

    assert_eq!(titles(&store), vec!["No Title"]);
}

// ============================================================================
// Overlap
// ============================================================================

#[tokio::test]
async fn test_overlapping_triggers_issue_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_body(vec![displayable("a")]))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let (first, second) = tokio::join!(store.fetch_next_page(), store.fetch_next_page());

    assert!(matches!(first, Ok(PageOutcome::Appended { page: 1, .. })));
    assert!(matches!(second, Ok(PageOutcome::Skipped)));
    assert_eq!(store.snapshot().len(), 1);
    assert_eq!(store.snapshot().next_page, 2);
}

// ============================================================================
// Failures leave the feed untouched
// ============================================================================

#[tokio::test]
async fn test_server_error_keeps_cursor_and_retries_same_page() {
    let server = MockServer::start().await;
    mount_page(&server, 1, vec![displayable("a")]).await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.fetch_next_page().await.unwrap();

    let err = store.fetch_next_page().await.unwrap_err();
    assert!(matches!(err, FetchError::HttpStatus(500)));

    let state = store.snapshot();
    assert_eq!(state.len(), 1);
    assert_eq!(state.next_page, 2);
    assert!(!state.fetch_in_flight);
    assert!(state.last_error.is_some());

    // Same page again, now succeeding
    mount_page(&server, 2, vec![displayable("b")]).await;
    store.fetch_next_page().await.unwrap();

    assert_eq!(titles(&store), vec!["a", "b"]);
    assert_eq!(store.snapshot().next_page, 3);
    assert_eq!(store.snapshot().last_error, None);
}

#[tokio::test]
async fn test_api_error_body_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": "error",
            "code": "apiKeyInvalid",
            "message": "Your API key is invalid or incorrect."
        })))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let err = store.fetch_next_page().await.unwrap_err();

    match err {
        FetchError::Api { status, code, .. } => {
            assert_eq!(status, 401);
            assert_eq!(code.as_deref(), Some("apiKeyInvalid"));
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
    assert_eq!(store.snapshot().next_page, 1);
}

#[tokio::test]
async fn test_malformed_json_keeps_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{ not json"))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let err = store.fetch_next_page().await.unwrap_err();

    assert!(matches!(err, FetchError::Parse(_)));
    let state = store.snapshot();
    assert!(state.is_empty());
    assert_eq!(state.next_page, 1);
    assert!(!state.fetch_in_flight);
}

#[tokio::test]
async fn test_unreachable_host_keeps_state() {
    // Nothing listens on port 1
    let client = NewsApiClient::new(NewsApiConfig {
        timeout: Duration::from_secs(2),
        ..config("http://127.0.0.1:1")
    })
    .unwrap();
    let store = FeedStore::new(client);

    let err = store.fetch_next_page().await.unwrap_err();

    assert!(matches!(err, FetchError::Network(_)));
    let state = store.snapshot();
    assert!(state.is_empty());
    assert_eq!(state.next_page, 1);
    assert!(!state.fetch_in_flight);
    assert!(state.is_empty_and_idle());
}

#[tokio::test]
async fn test_transport_error_does_not_expose_api_key() {
    let client = NewsApiClient::new(NewsApiConfig {
        api_key: SecretString::from("SUPERSECRET123"),
        timeout: Duration::from_secs(2),
        ..config("http://127.0.0.1:1")
    })
    .unwrap();
    let store = FeedStore::new(client);

    let err = store.fetch_next_page().await.unwrap_err();

    assert!(!err.to_string().contains("SUPERSECRET123"));
    assert!(!format!("{:?}", err).contains("SUPERSECRET123"));
    let last_error = store.snapshot().last_error.unwrap_or_default();
    assert!(!last_error.is_empty());
    assert!(!last_error.contains("SUPERSECRET123"));
}

#[tokio::test]
async fn test_timeout_does_not_expose_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_body(vec![]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = NewsApiClient::new(NewsApiConfig {
        timeout: Duration::from_millis(200),
        ..config(&server.uri())
    })
    .unwrap();
    let store = FeedStore::new(client);

    let err = store.fetch_next_page().await.unwrap_err();

    assert!(matches!(err, FetchError::Network(_)));
    assert!(!err.to_string().contains("test-key"));
    let last_error = store.snapshot().last_error.unwrap_or_default();
    assert!(!last_error.contains("test-key"));
}
