//! Integration tests for `WalmartClient` against a local `wiremock` server.
//!
//! Intervals are zero throughout: the schedule itself is covered by the
//! batch crate, and these tests exercise request shapes, cursor following,
//! and how failures are reported or absorbed.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use arbscan_walmart::{ItemsQuery, SpecialFeed, WalmartClient, WalmartError};

fn test_client(server: &MockServer) -> WalmartClient {
    WalmartClient::with_base_url("test-key", 5, "arbscan-test/0.1", &server.uri())
        .expect("failed to build test WalmartClient")
}

fn item(id: i64, upc: &str) -> serde_json::Value {
    json!({
        "itemId": id,
        "name": format!("Item {id}"),
        "upc": upc,
        "salePrice": 9.99,
        "standardShipRate": 0.0,
        "availableOnline": true,
        "stock": "Available"
    })
}

// ---------------------------------------------------------------------------
// Taxonomy
// ---------------------------------------------------------------------------

#[tokio::test]
async fn taxonomy_is_fetched_with_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/taxonomy"))
        .and(query_param("apiKey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "categories": [
                {"id": "3944", "name": "Electronics", "path": "Electronics", "children": [
                    {"id": "3944_1060825", "name": "TV & Video", "path": "Electronics/TV & Video"}
                ]},
                {"id": "4171", "name": "Toys", "path": "Toys"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let taxonomy = test_client(&server).taxonomy().await.unwrap();
    let top_level: Vec<&str> = taxonomy.categories.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(top_level, vec!["3944", "4171"]);
    let leaves = taxonomy.leaf_categories();
    assert_eq!(leaves.len(), 2);
    assert_eq!(leaves[0].path, "Electronics/TV & Video");
}

// ---------------------------------------------------------------------------
// Feeds
// ---------------------------------------------------------------------------

#[tokio::test]
async fn feed_is_scoped_to_category_and_normalized_later() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/feeds/clearance"))
        .and(query_param("categoryId", "3944"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [item(1, "111111111111"), {"itemId": 2, "availableOnline": true}]
        })))
        .mount(&server)
        .await;

    let raw = test_client(&server)
        .feed(SpecialFeed::Clearance, Some("3944"))
        .await
        .unwrap();
    assert_eq!(raw.len(), 2, "feed returns raw items untouched");
    assert_eq!(arbscan_walmart::normalize_items(raw).len(), 1);
}

#[tokio::test]
async fn error_body_without_items_is_unusable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/trends"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{"code": 403, "message": "Account Inactive"}]
        })))
        .mount(&server)
        .await;

    let err = test_client(&server).trending().await.unwrap_err();
    match err {
        WalmartError::UnusablePayload { endpoint, reason } => {
            assert_eq!(endpoint, "/v1/trends");
            assert!(reason.contains("Account Inactive"), "reason: {reason}");
        }
        other => panic!("expected UnusablePayload, got {other:?}"),
    }
}

#[tokio::test]
async fn rate_limit_is_reported_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/feeds/bestsellers"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "12"))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server)
        .feed(SpecialFeed::BestSellers, None)
        .await
        .unwrap_err();
    assert!(
        matches!(err, WalmartError::RateLimited { retry_after_secs: 12, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn error_messages_never_contain_the_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/feeds/rollback"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .feed(SpecialFeed::Rollback, None)
        .await
        .unwrap_err();
    assert!(matches!(err, WalmartError::UnexpectedStatus { status: 403, .. }));
    assert!(!err.to_string().contains("test-key"), "leaked key: {err}");
}

// ---------------------------------------------------------------------------
// Paginated walks
// ---------------------------------------------------------------------------

/// Mounts a two-page clearance walk for category 3944. The cursor mock is
/// mounted first so it takes precedence over the broader first-page mock.
async fn mount_two_pages(server: &MockServer, second_page: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/v1/paginated/items"))
        .and(query_param("maxId", "2"))
        .respond_with(second_page)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/paginated/items"))
        .and(query_param("category", "3944"))
        .and(query_param("specialOffer", "clearance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [item(1, "111111111111"), item(2, "222222222222")],
            "nextPage": "/v1/paginated/items?category=3944&specialOffer=clearance&maxId=2&format=json"
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn query_walk_follows_next_page() {
    let server = MockServer::start().await;
    mount_two_pages(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"items": [item(3, "333333333333")]})),
    )
    .await;

    let query = ItemsQuery::category_feed("3944", SpecialFeed::Clearance);
    let products = test_client(&server)
        .fetch_query_pages(&query, 10, Duration::ZERO)
        .await
        .unwrap();
    let upcs: Vec<&str> = products.iter().map(|p| p.upc.as_str()).collect();
    assert_eq!(upcs, vec!["111111111111", "222222222222", "333333333333"]);
}

#[tokio::test]
async fn failed_later_page_keeps_earlier_pages() {
    let server = MockServer::start().await;
    mount_two_pages(&server, ResponseTemplate::new(503)).await;

    let query = ItemsQuery::category_feed("3944", SpecialFeed::Clearance);
    let products = test_client(&server)
        .fetch_query_pages(&query, 10, Duration::ZERO)
        .await
        .expect("later page failure must not fail the walk");
    assert_eq!(products.len(), 2);
}

#[tokio::test]
async fn page_limit_stops_the_walk() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/paginated/items"))
        .and(query_param("maxId", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/paginated/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [item(1, "111111111111")],
            "nextPage": "/v1/paginated/items?maxId=2"
        })))
        .mount(&server)
        .await;

    let products = test_client(&server)
        .fetch_query_pages(&ItemsQuery::default(), 1, Duration::ZERO)
        .await
        .unwrap();
    assert_eq!(products.len(), 1);
}

#[tokio::test]
async fn first_page_failure_is_returned() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/paginated/items"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .fetch_query_pages(&ItemsQuery::default(), 5, Duration::ZERO)
        .await
        .unwrap_err();
    assert!(matches!(err, WalmartError::Deserialize { .. }), "got {err:?}");
}

// ---------------------------------------------------------------------------
// Batched fetches
// ---------------------------------------------------------------------------

#[tokio::test]
async fn special_feeds_tolerate_a_failed_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/paginated/items"))
        .and(query_param("category", "3944"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [item(1, "111111111111")]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/paginated/items"))
        .and(query_param("category", "4171"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let categories = vec!["3944".to_string(), "4171".to_string()];
    let outcome = test_client(&server)
        .fetch_special_feeds(&categories, &[SpecialFeed::Clearance], None, 5, Duration::ZERO)
        .await
        .unwrap();

    assert_eq!(outcome.requested, 2);
    assert_eq!(outcome.fulfilled, 1);
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].upc, "111111111111");
}

#[tokio::test]
async fn special_feeds_issue_one_query_per_feed_and_category() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/paginated/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(6)
        .mount(&server)
        .await;

    let categories = vec!["1".to_string(), "2".to_string(), "3".to_string()];
    let outcome = test_client(&server)
        .fetch_special_feeds(
            &categories,
            &[SpecialFeed::Clearance, SpecialFeed::SpecialBuy],
            None,
            5,
            Duration::ZERO,
        )
        .await
        .unwrap();
    assert_eq!(outcome.requested, 6);
    assert_eq!(outcome.fulfilled, 6);
}

#[tokio::test]
async fn special_feeds_pass_the_brand_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/paginated/items"))
        .and(query_param("brand", "LEGO"))
        .and(query_param("specialOffer", "rollback"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [item(7, "777777777777")]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/paginated/items"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = test_client(&server)
        .fetch_special_feeds(
            &["4171".to_string()],
            &[SpecialFeed::Rollback],
            Some("LEGO"),
            1,
            Duration::ZERO,
        )
        .await
        .unwrap();
    assert_eq!(outcome.fulfilled, 1);
    assert_eq!(outcome.records[0].upc, "777777777777");
}

#[tokio::test]
async fn lookup_items_batches_by_twenty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [item(1, "111111111111")]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let ids: Vec<String> = (0..25).map(|i| i.to_string()).collect();
    let outcome = test_client(&server)
        .lookup_items(&ids, Duration::ZERO)
        .await
        .unwrap();
    assert_eq!(outcome.requested, 2);
    assert_eq!(outcome.records.len(), 2);
}
