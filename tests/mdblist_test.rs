//! Integration tests for mdblist pagination and aggregation against a mock API.

use std::time::Duration;

use assert_matches::assert_matches;
use availarr::config::ListConfig;
use availarr::mdblist::{ListAggregator, MdblistClient, PAGE_SIZE};
use availarr_common::{Error, MediaType};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> MdblistClient {
    MdblistClient::with_options("test-key", &server.uri(), Duration::from_secs(5), true)
}

fn movies(range: std::ops::Range<i64>) -> Value {
    Value::Array(
        range
            .map(|id| json!({ "id": id, "title": format!("Movie {id}") }))
            .collect(),
    )
}

fn page(body: Value, has_more: bool) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("X-Has-More", if has_more { "true" } else { "false" })
        .set_body_json(body)
}

fn lists(urls: &[&str], max_items_per_list: usize) -> ListConfig {
    ListConfig {
        lists: urls.iter().map(|u| u.to_string()).collect(),
        max_items_per_list,
    }
}

#[tokio::test]
async fn follows_has_more_across_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lists/alice/favs/items/"))
        .and(query_param("apikey", "test-key"))
        .and(query_param("limit", "1000"))
        .and(query_param("offset", "0"))
        .respond_with(page(movies(0..1000), true))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/lists/alice/favs/items/"))
        .and(query_param("offset", "1000"))
        .respond_with(page(movies(1000..1001), false))
        .expect(1)
        .mount(&server)
        .await;

    let fetch = client_for(&server)
        .fetch_list_items("alice/favs", MediaType::Movie, 2000)
        .await;

    assert!(fetch.is_complete());
    assert_eq!(fetch.requests, 2);
    assert_eq!(fetch.items.len(), 1001);
    assert_eq!(fetch.items[1000]["id"], 1000);
}

#[tokio::test]
async fn truncates_to_the_per_list_cap() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lists/alice/favs/items/"))
        .and(query_param("offset", "0"))
        .respond_with(page(movies(0..PAGE_SIZE as i64), true))
        .expect(1)
        .mount(&server)
        .await;

    let fetch = client_for(&server)
        .fetch_list_items("alice/favs", MediaType::Movie, 500)
        .await;

    assert!(fetch.is_complete());
    assert_eq!(fetch.requests, 1);
    assert_eq!(fetch.items.len(), 500);
    assert_eq!(fetch.items[499]["id"], 499);
}

#[tokio::test]
async fn missing_header_ends_pagination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lists/alice/favs/items/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(movies(0..1000)))
        .expect(1)
        .mount(&server)
        .await;

    let fetch = client_for(&server)
        .fetch_list_items("alice/favs", MediaType::Movie, 5000)
        .await;

    assert_eq!(fetch.items.len(), 1000);
    assert_eq!(fetch.requests, 1);
}

#[tokio::test]
async fn empty_page_ends_pagination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lists/alice/favs/items/"))
        .respond_with(page(json!([]), true))
        .expect(1)
        .mount(&server)
        .await;

    let fetch = client_for(&server)
        .fetch_list_items("alice/favs", MediaType::Movie, 5000)
        .await;

    assert!(fetch.is_complete());
    assert!(fetch.items.is_empty());
}

#[tokio::test]
async fn grouped_body_uses_media_type_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lists/bob/tv/items/"))
        .respond_with(page(
            json!({
                "movies": [{ "id": 1 }],
                "shows": [{ "tvdb_id": 81189, "title": "Breaking Bad" }, { "ids": { "tvdb": 305288 } }]
            }),
            false,
        ))
        .mount(&server)
        .await;

    let fetch = client_for(&server)
        .fetch_list_items("bob/tv", MediaType::Show, 1000)
        .await;
    assert_eq!(fetch.items.len(), 2);

    let aggregator = ListAggregator::new(client_for(&server));
    let index = aggregator
        .collect(MediaType::Show, &lists(&["https://mdblist.com/lists/bob/tv"], 1000))
        .await;
    assert!(index.contains(81189));
    assert!(index.contains(305288));
    assert!(!index.contains(1));
}

#[tokio::test]
async fn rate_limit_keeps_items_gathered_so_far() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lists/alice/favs/items/"))
        .and(query_param("offset", "0"))
        .respond_with(page(movies(0..1000), true))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/lists/alice/favs/items/"))
        .and(query_param("offset", "1000"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let fetch = client_for(&server)
        .fetch_list_items("alice/favs", MediaType::Movie, 5000)
        .await;

    assert_eq!(fetch.items.len(), 1000);
    assert_eq!(fetch.requests, 2);
    assert_matches!(fetch.error, Some(Error::Http(_)));
}

#[tokio::test]
async fn http_errors_never_leak_the_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let fetch = client_for(&server)
        .fetch_list_items("alice/favs", MediaType::Movie, 1000)
        .await;

    let err = fetch.error.unwrap();
    assert!(fetch.items.is_empty());
    assert!(!err.to_string().contains("test-key"));
}

#[tokio::test]
async fn connection_failure_yields_empty_fetch() {
    let client =
        MdblistClient::with_options("test-key", "http://127.0.0.1:1", Duration::from_secs(2), true);

    let fetch = client
        .fetch_list_items("alice/favs", MediaType::Movie, 1000)
        .await;

    assert!(fetch.items.is_empty());
    assert_eq!(fetch.requests, 1);
    assert_matches!(fetch.error, Some(Error::Http(_)));
}

#[tokio::test]
async fn unexpected_shape_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lists/alice/favs/items/"))
        .respond_with(page(json!({ "movies": "nope" }), false))
        .mount(&server)
        .await;

    let fetch = client_for(&server)
        .fetch_list_items("alice/favs", MediaType::Movie, 1000)
        .await;

    assert!(fetch.items.is_empty());
    assert_matches!(fetch.error, Some(Error::UnexpectedShape(_)));
}

#[tokio::test]
async fn unexpected_shape_keeps_items_gathered_so_far() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lists/alice/favs/items/"))
        .and(query_param("offset", "0"))
        .respond_with(page(movies(0..1000), true))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/lists/alice/favs/items/"))
        .and(query_param("offset", "1000"))
        .respond_with(page(json!({ "movies": "nope" }), true))
        .expect(1)
        .mount(&server)
        .await;

    let fetch = client_for(&server)
        .fetch_list_items("alice/favs", MediaType::Movie, 5000)
        .await;

    assert_eq!(fetch.items.len(), 1000);
    assert_eq!(fetch.requests, 2);
    assert_matches!(fetch.error, Some(Error::UnexpectedShape(_)));
}

#[tokio::test]
async fn invalid_media_type_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(page(movies(0..1), false))
        .expect(0)
        .mount(&server)
        .await;

    let aggregator = ListAggregator::new(client_for(&server));
    let result = aggregator
        .collect_all("anime", &lists(&["https://mdblist.com/lists/alice/favs"], 1000))
        .await;

    assert_matches!(result, Err(Error::InvalidMediaType(ref t)) if t == "anime");
}

#[tokio::test]
async fn bad_urls_are_skipped_and_recorded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lists/alice/favs/items/"))
        .respond_with(page(movies(10..13), false))
        .expect(1)
        .mount(&server)
        .await;

    let aggregator = ListAggregator::new(client_for(&server));
    let index = aggregator
        .collect_all(
            "movie",
            &lists(
                &[
                    "https://example.com/lists/alice/favs",
                    "https://mdblist.com/lists/alice/favs",
                ],
                1000,
            ),
        )
        .await
        .unwrap();

    assert_eq!(index.len(), 3);
    assert!(!index.is_complete());
    assert_eq!(index.failures().len(), 1);
    assert_eq!(index.failures()[0].list_url, "https://example.com/lists/alice/favs");
    assert_matches!(index.failures()[0].error, Error::InvalidListUrl(_));
}

#[tokio::test]
async fn later_lists_win_on_shared_ids() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lists/alice/first/items/"))
        .respond_with(page(
            json!([{ "id": 77, "title": "First copy" }, { "id": 1, "title": "Only first" }]),
            false,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/lists/alice/second/items/"))
        .respond_with(page(
            json!([{ "ids": { "tmdb": "77" }, "title": "Second copy" }, { "title": "No id" }]),
            false,
        ))
        .mount(&server)
        .await;

    let first = "https://mdblist.com/lists/alice/first";
    let second = "https://mdblist.com/lists/alice/second/";
    let aggregator = ListAggregator::new(client_for(&server));
    let index = aggregator
        .collect(MediaType::Movie, &lists(&[first, second], 1000))
        .await;

    assert!(index.is_complete());
    assert_eq!(index.len(), 2);
    let entry = index.get(77).unwrap();
    assert_eq!(entry.list_url, second);
    assert_eq!(entry.payload["title"], "Second copy");
    assert_eq!(index.get(1).unwrap().list_url, first);
}
