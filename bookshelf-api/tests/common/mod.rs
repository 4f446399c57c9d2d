//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - In-memory store and application state
//! - GraphQL execution helpers (in-process and over HTTP)
//! - Test user registration

#![allow(dead_code)]

use async_graphql::{Request as GraphQLRequest, Variables};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use bookshelf_api::app::{build_router, AppState};
use bookshelf_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use bookshelf_shared::store::{MemoryStore, Store};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: Arc<dyn Store>,
    pub state: AppState,
    pub app: axum::Router,
}

impl TestContext {
    /// Creates a new test context over an empty in-memory store
    pub fn new() -> Self {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), test_config());
        let app = build_router(state.clone());

        Self { store, state, app }
    }

    /// Executes a GraphQL document directly against the schema and returns
    /// the serialized response (`data` and `errors`)
    pub async fn execute(&self, query: &str, variables: Value) -> Value {
        let request = GraphQLRequest::new(query).variables(Variables::from_json(variables));
        let response = self.state.schema.execute(request).await;
        serde_json::to_value(&response).unwrap()
    }

    /// Posts a GraphQL document to `/graphql`
    pub async fn post_graphql(&self, query: &str, variables: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/graphql")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({ "query": query, "variables": variables }).to_string(),
            ))
            .unwrap();

        self.send(request).await
    }

    /// Sends a request through the router and parses the JSON body
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);

        (status, json)
    }

    /// Registers a user through `createUser` and returns `(id, token)`
    pub async fn register(&self, username: &str, email: &str, password: &str) -> (String, String) {
        let response = self
            .execute(
                CREATE_USER,
                json!({ "username": username, "email": email, "password": password }),
            )
            .await;

        assert_no_errors(&response);
        let auth = &response["data"]["createUser"];
        (
            auth["user"]["_id"].as_str().unwrap().to_string(),
            auth["token"].as_str().unwrap().to_string(),
        )
    }
}

/// Configuration used by every test; the database URL is never dialled
pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: "postgresql://localhost/unused".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            expiration_hours: 2,
        },
    }
}

pub fn assert_no_errors(response: &Value) {
    assert!(
        response.get("errors").map_or(true, |e| e.is_null() || e.as_array().map_or(false, Vec::is_empty)),
        "unexpected errors: {}",
        response
    );
}

/// First error's `extensions.code`
pub fn error_code(response: &Value) -> &str {
    response["errors"][0]["extensions"]["code"].as_str().unwrap_or_default()
}

/// First error's message
pub fn error_message(response: &Value) -> &str {
    response["errors"][0]["message"].as_str().unwrap_or_default()
}

pub const CREATE_USER: &str = r#"
mutation CreateUser($username: String!, $email: String!, $password: String!) {
  createUser(username: $username, email: $email, password: $password) {
    token
    user { _id username email savedBooks bookCount }
  }
}
"#;

pub const LOGIN: &str = r#"
mutation Login($email: String!, $password: String!) {
  login(email: $email, password: $password) {
    token
    user { _id username }
  }
}
"#;

pub const SAVE_BOOK: &str = r#"
mutation SaveBook($userId: ID!, $bookId: String!, $book: BookInput) {
  saveBook(userId: $userId, bookId: $bookId, book: $book) {
    _id
    savedBooks
    bookCount
  }
}
"#;

pub const DELETE_BOOK: &str = r#"
mutation DeleteBook($userId: ID!, $bookId: String!) {
  deleteBook(userId: $userId, bookId: $bookId) {
    _id
    savedBooks
    bookCount
  }
}
"#;

pub const USER: &str = r#"
query User($username: String!, $userId: ID!) {
  user(username: $username, userId: $userId) {
    _id
    username
    savedBooks
    books { bookId title authors }
  }
}
"#;

pub const USERS: &str = r#"
query Users {
  users { _id username email bookCount }
}
"#;

pub const BOOKS: &str = r#"
query Books($userId: ID) {
  books(userId: $userId) { bookId title }
}
"#;

pub const BOOK: &str = r#"
query Book($bookId: String!) {
  book(bookId: $bookId) { bookId title description }
}
"#;
