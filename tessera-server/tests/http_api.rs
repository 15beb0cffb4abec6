//! HTTP surface over the fully assembled router
//! Run: cargo test -p tessera-server --test http_api

use axum::body::Body;
use http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use tessera_server::core::{Config, ServerState, build_app};

async fn test_app() -> (tempfile::TempDir, axum::Router) {
    let tmp = tempfile::tempdir().unwrap();
    let config = Config::with_overrides(tmp.path().to_string_lossy(), 0);
    let state = ServerState::initialize(config).await.unwrap();
    (tmp, build_app(state))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn health_reports_ok() {
    let (_tmp, app) = test_app().await;
    let (status, body) = send(&app, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn categories_are_seeded_and_read_over_http() {
    let (_tmp, app) = test_app().await;

    let payload = json!({ "name": "Flooring", "slug": "flooring" });
    let (status, body) = send(&app, post_json("/api/categories", &payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slug"], "flooring");

    // Duplicate slugs are rejected with the conflict envelope
    let (status, body) = send(&app, post_json("/api/categories", &payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "E0004");

    let (status, body) = send(&app, get("/api/categories/flooring")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Flooring");

    let (status, body) = send(&app, get("/api/categories")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn products_are_seeded_and_read_over_http() {
    let (_tmp, app) = test_app().await;

    let payload = json!({
        "name": "Oak Board",
        "slug": "oak-board",
        "price": 45.0,
        "material": "Oak",
        "stock": 10
    });
    let (status, body) = send(&app, post_json("/api/products", &payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slug"], "oak-board");

    let (status, body) = send(&app, get("/api/products/oak-board")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Oak Board");
    assert_eq!(body["price"], 45.0);

    let (status, body) = send(&app, get("/api/products/no-such-product")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "E0003");
}

#[tokio::test]
async fn reserved_slugs_return_not_found_on_the_category_route() {
    let (_tmp, app) = test_app().await;
    for slug in ["cart", "checkout", "admin"] {
        let (status, _) = send(&app, get(&format!("/api/catalog/c/{slug}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "slug {slug}");
    }
}

#[tokio::test]
async fn clearance_listing_declares_shared_cache_validity() {
    let (_tmp, app) = test_app().await;
    let response = app.clone().oneshot(get("/api/catalog/clearance")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok()),
        Some("public, s-maxage=60")
    );
}

#[tokio::test]
async fn all_products_listing_has_the_envelope_shape() {
    let (_tmp, app) = test_app().await;
    let (status, body) = send(&app, get("/api/catalog/products")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
    assert_eq!(body["page"], 1);
    assert_eq!(body["page_size"], 24);
    // The fixed price group is present even on an empty catalog
    let groups = body["filter_groups"].as_array().unwrap();
    assert_eq!(groups.last().unwrap()["id"], "price");
}
