//! Router-level tests
//!
//! 不起监听端口，直接用 `tower::ServiceExt::oneshot` 打路由，
//! 验证认证中间件与错误响应体。

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use pos_server::ErrorBody;
use pos_server::core::{Config, ServerState};
use tower::ServiceExt;

async fn test_router() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("pos.db");
    let config = Config::with_overrides(db_path.to_string_lossy(), 0);
    let state = ServerState::initialize(&config).await.unwrap();
    (pos_server::api::router(state), dir)
}

async fn error_body(response: axum::response::Response) -> ErrorBody {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_served_without_auth() {
    let (app, _dir) = test_router().await;

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn missing_token_yields_e3001() {
    let (app, _dir) = test_router().await;

    let response = app
        .oneshot(Request::get("/api/products/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = error_body(response).await;
    assert_eq!(body.code, "E3001");
}

#[tokio::test]
async fn garbage_token_yields_e3002() {
    let (app, _dir) = test_router().await;

    let response = app
        .oneshot(
            Request::get("/api/products/")
                .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = error_body(response).await;
    assert_eq!(body.code, "E3002");
}

#[tokio::test]
async fn cors_preflight_skips_auth() {
    let (app, _dir) = test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/products/")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_ne!(response.status(), StatusCode::UNAUTHORIZED);
}
