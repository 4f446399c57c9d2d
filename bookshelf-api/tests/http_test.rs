//! HTTP-level tests: routing, GraphQL transport and health endpoints

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::*;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_health_reports_connected_store() {
    let ctx = TestContext::new();

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = ctx.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_ready() {
    let ctx = TestContext::new();

    let request = Request::builder().uri("/ready").body(Body::empty()).unwrap();
    let (status, body) = ctx.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let ctx = TestContext::new();

    let request = Request::builder().uri("/v1/nope").body(Body::empty()).unwrap();
    let (status, body) = ctx.send(request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_graphql_over_http() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .post_graphql(
            CREATE_USER,
            json!({ "username": "amy", "email": "amy@example.com", "password": "password1" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_no_errors(&body);
    let id = body["data"]["createUser"]["user"]["_id"].as_str().unwrap().to_string();

    let (status, body) = ctx
        .post_graphql(SAVE_BOOK, json!({ "userId": id, "bookId": "B1" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["saveBook"]["savedBooks"], json!(["B1"]));
}

#[tokio::test]
async fn test_graphql_errors_are_in_body() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .post_graphql(LOGIN, json!({ "email": "nobody@example.com", "password": "x" }))
        .await;

    // GraphQL reports resolver failures in the response, not the status line
    assert_eq!(status, StatusCode::OK);
    assert_eq!(error_code(&body), "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_graphiql_served_on_get() {
    let ctx = TestContext::new();

    let request = Request::builder().uri("/graphql").body(Body::empty()).unwrap();
    let response = ctx.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(String::from_utf8_lossy(&body).to_lowercase().contains("graphiql"));
}
