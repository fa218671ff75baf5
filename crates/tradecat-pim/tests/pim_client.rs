//! Integration tests for `PimClient` against a local `wiremock` server.

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tradecat_pim::{PimClient, PimError};

fn test_client(base: &str) -> PimClient {
    PimClient::new(base, Some("pim-token"), 5, "tradecat-test/0.1", 0, 0)
        .expect("failed to build test PimClient")
}

fn page(skus: &[&str]) -> serde_json::Value {
    let products: Vec<serde_json::Value> = skus
        .iter()
        .map(|sku| json!({ "sku": sku, "product_name": format!("Product {sku}") }))
        .collect();
    json!({ "products": products })
}

#[tokio::test]
async fn fetch_catalog_returns_empty_vec_for_empty_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "products": [] })))
        .mount(&server)
        .await;

    let entries = test_client(&server.uri()).fetch_catalog().await.unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn fetch_catalog_sends_bearer_token_and_page_size() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("limit", "25"))
        .and(header("authorization", "Bearer pim-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["A1"])))
        .expect(1)
        .mount(&server)
        .await;

    let entries = test_client(&server.uri())
        .with_page_size(25)
        .fetch_catalog()
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].sku, "A1");
}

#[tokio::test]
async fn fetch_catalog_follows_link_cursor_and_preserves_order() {
    let server = MockServer::start().await;
    let next_link = format!(
        "<{}/products?limit=100&page_info=cursor2>; rel=\"next\"",
        server.uri()
    );

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param_is_missing("page_info"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page(&["B2", "A1"]))
                .insert_header("Link", next_link.as_str()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("page_info", "cursor2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["C3"])))
        .mount(&server)
        .await;

    let entries = test_client(&server.uri()).fetch_catalog().await.unwrap();
    let skus: Vec<&str> = entries.iter().map(|e| e.sku.as_str()).collect();
    assert_eq!(skus, vec!["B2", "A1", "C3"]);
}

#[tokio::test]
async fn fetch_catalog_keeps_entries_missing_optional_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [
                { "sku": "A1", "requires_quote": true },
                { "sku": "A2", "trade_price": null, "handle": "a2" }
            ]
        })))
        .mount(&server)
        .await;

    let entries = test_client(&server.uri()).fetch_catalog().await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].requires_quote, Some(true));
    assert!(entries[0].product_name.is_none());
    assert_eq!(entries[1].handle.as_deref(), Some("a2"));
    assert!(entries[1].price.is_none());
}

#[tokio::test]
async fn fetch_catalog_fails_whole_fetch_when_a_later_page_fails() {
    let server = MockServer::start().await;
    let next_link = format!(
        "<{}/products?page_info=broken>; rel=\"next\"",
        server.uri()
    );
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param_is_missing("page_info"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page(&["A1"]))
                .insert_header("Link", next_link.as_str()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("page_info", "broken"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = test_client(&server.uri()).fetch_catalog().await.unwrap_err();
    assert!(
        matches!(err, PimError::UnexpectedStatus { status: 502, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn fetch_catalog_retries_server_errors_when_enabled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["A1"])))
        .mount(&server)
        .await;

    let client = PimClient::new(&server.uri(), None, 5, "tradecat-test/0.1", 2, 0).unwrap();
    let entries = client.fetch_catalog().await.unwrap();
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn fetch_catalog_maps_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri()).fetch_catalog().await.unwrap_err();
    assert!(
        matches!(err, PimError::RateLimited { retry_after_secs: 7 }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn fetch_catalog_reports_malformed_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri()).fetch_catalog().await.unwrap_err();
    assert!(matches!(err, PimError::Deserialize { .. }), "got {err:?}");
}

#[tokio::test]
async fn fetch_catalog_fails_on_entry_without_sku() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [{ "sku": "A1" }, { "product_name": "Orphan" }]
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri()).fetch_catalog().await.unwrap_err();
    assert!(
        matches!(err, PimError::Normalization { ref entry, .. } if entry == "#1"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn fetch_catalog_stops_at_page_limit_on_cycling_cursor() {
    let server = MockServer::start().await;
    let loop_link = format!("<{}/products?page_info=again>; rel=\"next\"", server.uri());
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "products": [] }))
                .insert_header("Link", loop_link.as_str()),
        )
        .mount(&server)
        .await;

    let err = test_client(&server.uri()).fetch_catalog().await.unwrap_err();
    assert!(
        matches!(err, PimError::PaginationLimit { max_pages: 200 }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn fetch_menu_normalizes_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/menus/main-menu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "menu": {
                "title": "Main menu",
                "items": [
                    { "title": "Panels", "url": "/collections/panels", "items": [
                        { "title": "Oak", "url": "/collections/oak" }
                    ]},
                    { "title": "Doors" }
                ]
            }
        })))
        .mount(&server)
        .await;

    let taxonomy = test_client(&server.uri())
        .fetch_menu("main-menu")
        .await
        .unwrap();
    assert_eq!(taxonomy.title.as_deref(), Some("Main menu"));
    assert_eq!(taxonomy.items.len(), 2);
    assert_eq!(taxonomy.items[0].children[0].label, "Oak");
    assert!(taxonomy.items[1].path.is_none());
}

#[tokio::test]
async fn fetch_menu_maps_404_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/menus/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_menu("missing")
        .await
        .unwrap_err();
    assert!(matches!(err, PimError::NotFound { .. }), "got {err:?}");
}
