//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain::Category;
use metrics_exporter_prometheus::PrometheusHandle;
use registration::{InMemoryCompensationLog, SigningKeys};
use store::{CategoryStore, MemoryStore};
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn keys() -> SigningKeys {
    SigningKeys::new("test-access-secret", "test-refresh-secret").unwrap()
}

async fn setup() -> (axum::Router, MemoryStore, InMemoryCompensationLog) {
    let store = MemoryStore::new();
    store
        .insert_category(Category::new("Cafe & Coffee Shop", "Cafes"))
        .await
        .unwrap();

    let log = InMemoryCompensationLog::new();
    let state = api::create_memory_state(store.clone(), &keys(), log.clone());
    let app = api::create_app(state, get_metrics_handle());
    (app, store, log)
}

fn register_body(email: &str) -> serde_json::Value {
    serde_json::json!({
        "shop_name": "The Morning Bean",
        "owner_name": "Linh Tran",
        "email": email,
        "password": "s3cret-pw",
        "phone": "0901234567",
        "address": "12 Nguyen Hue",
        "city": "Ho Chi Minh City",
        "city_code": "79",
        "district": "District 1",
        "district_code": "760",
        "ward": "Ben Nghe",
        "description": "Specialty coffee",
        "category_name": "Cafe & Coffee Shop"
    })
}

fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _, _) = setup().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_register_shop_owner() {
    let (app, store, log) = setup().await;

    let response = app
        .oneshot(post_json(
            "/register/shop-owner",
            &register_body("linh@example.com"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = read_json(response).await;

    assert_eq!(json["account"]["email"], "linh@example.com");
    assert_eq!(json["account"]["role"], "ShopOwner");
    // The credential hash never leaves the server.
    assert!(json["account"].get("password_hash").is_none());
    assert_eq!(json["shop"]["status"], "Pending");
    assert_eq!(json["shop"]["owner_id"], json["account"]["id"]);
    assert!(json["tokens"]["access_token"].as_str().is_some());
    assert!(json["tokens"]["refresh_token"].as_str().is_some());

    assert_eq!(store.account_count().await, 1);
    assert_eq!(store.shop_count().await, 1);
    assert!(log.is_empty());
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let (app, store, _) = setup().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/register/shop-owner",
            &register_body("linh@example.com"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(post_json(
            "/register/shop-owner",
            &register_body("linh@example.com"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = read_json(response).await;
    assert_eq!(json["kind"], "duplicate_email");
    assert_eq!(store.account_count().await, 1);
}

#[tokio::test]
async fn test_unknown_category_not_found() {
    let (app, store, _) = setup().await;

    let mut body = register_body("linh@example.com");
    body["category_name"] = serde_json::json!("Nonexistent");

    let response = app
        .oneshot(post_json("/register/shop-owner", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = read_json(response).await;
    assert_eq!(json["kind"], "category_not_found");
    assert_eq!(store.account_count().await, 0);
}

#[tokio::test]
async fn test_invalid_request_bad_request() {
    let (app, _, _) = setup().await;

    let mut body = register_body("linh@example.com");
    body["password"] = serde_json::json!("abc");

    let response = app
        .oneshot(post_json("/register/shop-owner", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = read_json(response).await;
    assert_eq!(json["kind"], "validation");
}

#[tokio::test]
async fn test_shop_failure_compensates_and_reports() {
    let (app, store, log) = setup().await;
    store.set_fail_on_shop_insert(true).await;

    let response = app
        .oneshot(post_json(
            "/register/shop-owner",
            &register_body("linh@example.com"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = read_json(response).await;
    assert_eq!(json["kind"], "shop_creation_failed");
    assert_eq!(json["retriable_issuance"], false);

    // The account created before the failure was compensated away.
    assert_eq!(store.account_count().await, 0);
    assert_eq!(log.len(), 1);
}

#[tokio::test]
async fn test_reissue_tokens() {
    let (app, _, _) = setup().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/register/shop-owner",
            &register_body("linh@example.com"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(post_json(
            "/register/reissue",
            &serde_json::json!({
                "email": "linh@example.com",
                "password": "s3cret-pw"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert!(json["access_token"].as_str().is_some());
    assert!(json["refresh_token"].as_str().is_some());
}

#[tokio::test]
async fn test_reissue_wrong_password_unauthorized() {
    let (app, _, _) = setup().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/register/shop-owner",
            &register_body("linh@example.com"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(post_json(
            "/register/reissue",
            &serde_json::json!({
                "email": "linh@example.com",
                "password": "wrong-pw"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = read_json(response).await;
    assert_eq!(json["kind"], "invalid_credential");
}

#[tokio::test]
async fn test_reissue_unknown_account_not_found() {
    let (app, _, _) = setup().await;

    let response = app
        .oneshot(post_json(
            "/register/reissue",
            &serde_json::json!({
                "email": "nobody@example.com",
                "password": "s3cret-pw"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let (app, _, _) = setup().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
