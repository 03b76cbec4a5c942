//! Integration tests for the scoring API
//!
//! Requests go through the axum router into a real in-memory SQLite store.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, NaiveDateTime};
use scoring_api::{
    auth::Authenticator,
    config::ScoringConfig,
    handlers::{create_router, AppState, HealthCheckResponse},
    pipeline::Pipeline,
};
use scoring_store::SqliteStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for oneshot

const ACCOUNT: &str = "horns&hoofs";
const LOGIN: &str = "h&f";

/// Helper to create the app over a seeded store
fn create_test_app() -> (Router, Authenticator) {
    let config = ScoringConfig::default_test_config();
    let store = Arc::new(SqliteStore::new(":memory:").unwrap());
    store.set_interests(1, &["books", "hi-tech"]).unwrap();
    store.set_interests(2, &["sport"]).unwrap();

    let pipeline = Pipeline::from_config(&config, store);
    let authenticator = pipeline.authenticator().clone();
    let app = create_router(AppState::new(Arc::new(pipeline)).with_clock(fixed_now));
    (app, authenticator)
}

/// Clock shared by the app and the token helpers
fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 15)
        .unwrap()
        .and_hms_opt(12, 30, 0)
        .unwrap()
}

fn user_request(auth: &Authenticator, method: &str, arguments: Value) -> Value {
    json!({
        "account": ACCOUNT,
        "login": LOGIN,
        "method": method,
        "token": auth.user_token(ACCOUNT, LOGIN),
        "arguments": arguments,
    })
}

fn admin_request(auth: &Authenticator, method: &str, arguments: Value) -> Value {
    json!({
        "account": ACCOUNT,
        "login": "admin",
        "method": method,
        "token": auth.admin_token(fixed_now()),
        "arguments": arguments,
    })
}

/// POST a raw body to `uri`, returning status and decoded envelope
async fn post(app: Router, uri: &str, body: impl Into<Body>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn call(app: Router, body: &Value) -> (StatusCode, Value) {
    post(app, "/method", body.to_string()).await
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let (app, _) = create_test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let health: HealthCheckResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(health.status, "ok");
}

#[tokio::test]
async fn test_online_score_user() {
    let (app, auth) = create_test_app();
    let body = user_request(
        &auth,
        "online_score",
        json!({"phone": "79175002040", "email": "stupnikov@otus.ru"}),
    );

    let (status, envelope) = call(app, &body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(envelope, json!({"response": {"score": 3.0}, "code": 200}));
}

#[tokio::test]
async fn test_online_score_full_profile() {
    let (app, auth) = create_test_app();
    let body = user_request(
        &auth,
        "online_score",
        json!({
            "phone": 79175002040u64,
            "email": "stupnikov@otus.ru",
            "first_name": "Stanislav",
            "last_name": "Stupnikov",
            "birthday": "01.01.1990",
            "gender": 1
        }),
    );

    let (status, envelope) = call(app, &body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(envelope["response"]["score"], json!(5.0));
}

#[tokio::test]
async fn test_online_score_admin() {
    let (app, auth) = create_test_app();
    let body = admin_request(
        &auth,
        "online_score",
        json!({"phone": "79175002040", "email": "stupnikov@otus.ru"}),
    );

    let (status, envelope) = call(app, &body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(envelope["response"]["score"], json!(42.0));
}

#[tokio::test]
async fn test_bad_token() {
    let (app, auth) = create_test_app();
    let mut body = user_request(&auth, "online_score", json!({"first_name": "a", "last_name": "b"}));
    body["token"] = json!("sdd");

    let (status, envelope) = call(app, &body).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(envelope["code"], json!(403));
    assert!(envelope.get("error").is_some());
}

#[tokio::test]
async fn test_online_score_single_field() {
    let (app, auth) = create_test_app();
    let body = user_request(&auth, "online_score", json!({"first_name": "a"}));

    let (status, envelope) = call(app, &body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(envelope["code"], json!(422));
}

#[tokio::test]
async fn test_online_score_invalid_phone() {
    let (app, auth) = create_test_app();
    let body = user_request(
        &auth,
        "online_score",
        json!({"phone": "89175002040", "email": "stupnikov@otus.ru"}),
    );

    let (status, envelope) = call(app, &body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(envelope["error"].as_str().unwrap().contains("phone"));
}

#[tokio::test]
async fn test_clients_interests() {
    let (app, auth) = create_test_app();
    let body = user_request(&auth, "clients_interests", json!({"client_ids": [1, 2], "date": "19.07.2017"}));

    let (status, envelope) = call(app, &body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        envelope["response"],
        json!({"client_id1": ["books", "hi-tech"], "client_id2": ["sport"]})
    );
}

#[tokio::test]
async fn test_clients_interests_unknown_client() {
    let (app, auth) = create_test_app();
    let body = admin_request(&auth, "clients_interests", json!({"client_ids": [99]}));

    let (status, envelope) = call(app, &body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(envelope["response"], json!({"client_id99": []}));
}

#[tokio::test]
async fn test_clients_interests_empty_ids() {
    let (app, auth) = create_test_app();
    let body = user_request(&auth, "clients_interests", json!({"client_ids": []}));

    let (status, _) = call(app, &body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_clients_interests_idempotent() {
    let (app, auth) = create_test_app();
    let body = user_request(&auth, "clients_interests", json!({"client_ids": [2, 1]}));

    let (_, first) = call(app.clone(), &body).await;
    let (_, second) = call(app, &body).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_invalid_json() {
    let (app, _) = create_test_app();

    let (status, envelope) = post(app, "/method", "{\"login\": ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(envelope["code"], json!(400));
}

#[tokio::test]
async fn test_non_object_body() {
    let (app, _) = create_test_app();

    let (status, _) = post(app, "/method", "[1, 2, 3]").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_envelope() {
    let (app, _) = create_test_app();

    let (status, envelope) = post(app, "/method", "{}").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(envelope["code"], json!(422));
}

#[tokio::test]
async fn test_unknown_method() {
    let (app, auth) = create_test_app();
    let body = user_request(&auth, "drop_tables", json!({}));

    let (status, envelope) = call(app, &body).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(envelope["code"], json!(404));
}

#[tokio::test]
async fn test_unknown_path() {
    let (app, _) = create_test_app();

    let (status, envelope) = post(app, "/session/establish", "{}").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(envelope["code"], json!(404));
}
