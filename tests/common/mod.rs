#![allow(dead_code)]

use axum::{
    Router,
    body::{self, Body},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use task_manager_api::test_helpers::{TEST_ADMIN_PASSWORD, TEST_ADMIN_USERNAME};

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request should succeed");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).expect("build request")
}

pub fn get(uri: &str, token: &str) -> Request<Body> {
    json_request(Method::GET, uri, Some(token), None)
}

pub async fn login(app: &Router, username: &str, password: &str) -> TestResponse {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/token/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("username={username}&password={password}")))
        .expect("build request");
    send(app, request).await
}

pub async fn token_for(app: &Router, username: &str, password: &str) -> String {
    let response = login(app, username, password).await;
    assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);
    response.body["access_token"]
        .as_str()
        .expect("access_token")
        .to_string()
}

pub async fn admin_token(app: &Router) -> String {
    token_for(app, TEST_ADMIN_USERNAME, TEST_ADMIN_PASSWORD).await
}

/// Creates a regular account through the admin API and returns its id.
pub async fn create_user(app: &Router, admin: &str, username: &str, password: &str) -> i64 {
    let response = send(
        app,
        json_request(
            Method::POST,
            "/users/",
            Some(admin),
            Some(json!({ "username": username, "password": password })),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "create user: {}", response.body);
    response.body["id"].as_i64().expect("user id")
}

pub async fn create_task(app: &Router, token: &str, body: Value) -> TestResponse {
    send(app, json_request(Method::POST, "/tasks/", Some(token), Some(body))).await
}

pub fn future_due_date() -> String {
    (chrono::Utc::now() + chrono::TimeDelta::days(7)).to_rfc3339()
}
