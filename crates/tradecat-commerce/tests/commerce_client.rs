//! Integration tests for `CommerceClient` against a local `wiremock` server.

use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use tradecat_commerce::{CommerceClient, CommerceError};

const GRAPHQL_PATH: &str = "/admin/api/2024-10/graphql.json";

fn test_client(base: &str) -> CommerceClient {
    CommerceClient::new(base, "shpat_test", "2024-10", 5, "tradecat-test/0.1")
        .expect("failed to build test CommerceClient")
}

fn variants(pairs: &[(&str, &str)]) -> Value {
    let nodes: Vec<Value> = pairs
        .iter()
        .map(|(id, sku)| json!({ "id": id, "sku": sku }))
        .collect();
    json!({ "data": { "productVariants": { "nodes": nodes } } })
}

/// Answers each lookup with a variant for every SKU in the search string
/// that does not start with `MISSING`.
struct EchoCatalog;

impl Respond for EchoCatalog {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        let search = body["variables"]["query"].as_str().unwrap_or_default();
        let nodes: Vec<Value> = search
            .split(" OR ")
            .filter_map(|term| term.strip_prefix("sku:\"")?.strip_suffix('"'))
            .filter(|sku| !sku.starts_with("MISSING"))
            .map(|sku| json!({ "id": format!("gid://shopify/ProductVariant/{sku}"), "sku": sku }))
            .collect();
        ResponseTemplate::new(200)
            .set_body_json(json!({ "data": { "productVariants": { "nodes": nodes } } }))
    }
}

#[tokio::test]
async fn resolves_found_and_missing_skus() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(header("X-Shopify-Access-Token", "shpat_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(variants(&[(
            "gid://shopify/ProductVariant/1",
            "A1",
        )])))
        .expect(1)
        .mount(&server)
        .await;

    let map = test_client(&server.uri())
        .resolve_merchandise_ids(["A1", "A2", "A1", "  "])
        .await
        .unwrap();

    assert_eq!(map.len(), 2, "duplicates and blanks are dropped");
    assert_eq!(
        map.get("A1"),
        Some(&Some("gid://shopify/ProductVariant/1".to_owned()))
    );
    assert_eq!(map.get("A2"), Some(&None));
}

#[tokio::test]
async fn ignores_variants_for_skus_that_were_not_requested() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(variants(&[
            ("gid://shopify/ProductVariant/9", "A10"),
            ("gid://shopify/ProductVariant/1", "A1"),
            ("gid://shopify/ProductVariant/2", "A1"),
        ])))
        .mount(&server)
        .await;

    let map = test_client(&server.uri())
        .resolve_merchandise_ids(["A1"])
        .await
        .unwrap();

    assert_eq!(map.len(), 1);
    assert_eq!(
        map["A1"].as_deref(),
        Some("gid://shopify/ProductVariant/1"),
        "first variant wins on duplicate SKU"
    );
}

#[tokio::test]
async fn splits_large_requests_into_batches() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(EchoCatalog)
        .expect(3)
        .mount(&server)
        .await;

    let skus: Vec<String> = (0..25)
        .map(|i| {
            if i % 5 == 0 {
                format!("MISSING-{i:02}")
            } else {
                format!("SKU-{i:02}")
            }
        })
        .collect();

    let map = test_client(&server.uri())
        .with_batching(10, 2)
        .resolve_merchandise_ids(&skus)
        .await
        .unwrap();

    assert_eq!(map.len(), 25);
    for sku in &skus {
        let resolved = &map[sku];
        if sku.starts_with("MISSING") {
            assert!(resolved.is_none(), "{sku} should be unresolved");
        } else {
            assert_eq!(
                resolved.as_deref(),
                Some(format!("gid://shopify/ProductVariant/{sku}").as_str())
            );
        }
    }
}

#[tokio::test]
async fn failed_batch_fails_the_whole_resolution() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("BROKEN"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(EchoCatalog)
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .with_batching(1, 4)
        .resolve_merchandise_ids(["A1", "BROKEN", "C3"])
        .await
        .unwrap_err();

    assert!(
        matches!(err, CommerceError::UnexpectedStatus { status: 500 }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn retries_after_throttled_graphql_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "Throttled", "extensions": { "code": "THROTTLED" } }]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(variants(&[(
            "gid://shopify/ProductVariant/1",
            "A1",
        )])))
        .mount(&server)
        .await;

    let map = test_client(&server.uri())
        .with_retries(2, 0)
        .resolve_merchandise_ids(["A1"])
        .await
        .unwrap();
    assert!(map["A1"].is_some());
}

#[tokio::test]
async fn throttling_without_retries_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .resolve_merchandise_ids(["A1"])
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::Throttled), "got {err:?}");
}

#[tokio::test]
async fn graphql_errors_are_surfaced_with_messages() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [
                { "message": "Access denied for productVariants field." },
                { "message": "Requires read_products scope." }
            ]
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .with_retries(3, 0)
        .resolve_merchandise_ids(["A1"])
        .await
        .unwrap_err();
    match err {
        CommerceError::GraphQl(message) => {
            assert!(message.contains("Access denied"));
            assert!(message.contains("read_products"));
        }
        other => panic!("expected GraphQl error, got {other:?}"),
    }
}

#[tokio::test]
async fn search_string_escapes_quotes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains(r#"sku:\"PANEL \\\"XL\\\"\""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(variants(&[])))
        .expect(1)
        .mount(&server)
        .await;

    let map = test_client(&server.uri())
        .resolve_merchandise_ids([r#"PANEL "XL""#])
        .await
        .unwrap();
    assert_eq!(map.get(r#"PANEL "XL""#), Some(&None));
}

#[tokio::test]
async fn follows_page_cursor_when_variants_spill_over() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains(r#""after":"cursor-1""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "productVariants": {
                "nodes": [{ "id": "gid://shopify/ProductVariant/2", "sku": "A2" }],
                "pageInfo": { "hasNextPage": false, "endCursor": "cursor-2" }
            } }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "productVariants": {
                "nodes": [
                    { "id": "gid://shopify/ProductVariant/1", "sku": "A1" },
                    { "id": "gid://shopify/ProductVariant/3", "sku": "A1" }
                ],
                "pageInfo": { "hasNextPage": true, "endCursor": "cursor-1" }
            } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let map = test_client(&server.uri())
        .resolve_merchandise_ids(["A1", "A2"])
        .await
        .unwrap();

    assert_eq!(map["A1"].as_deref(), Some("gid://shopify/ProductVariant/1"));
    assert_eq!(
        map["A2"].as_deref(),
        Some("gid://shopify/ProductVariant/2"),
        "match on the second page must not be reported missing"
    );
}

#[tokio::test]
async fn next_page_without_cursor_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "productVariants": {
                "nodes": [{ "id": "gid://shopify/ProductVariant/1", "sku": "A1" }],
                "pageInfo": { "hasNextPage": true, "endCursor": null }
            } }
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .resolve_merchandise_ids(["A1", "A2"])
        .await
        .unwrap_err();
    match err {
        CommerceError::GraphQl(message) => assert!(message.contains("truncated")),
        other => panic!("expected truncation error, got {other:?}"),
    }
}
