//! Test helper utilities for integration testing against a mocked console service
#![allow(dead_code)]

use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jenkins_console::app_state::AppState;
use jenkins_console::models::config::FieldValues;
use jenkins_console::routes;
use jenkins_console::services::console_client::ConsoleClient;

/// Console client pointed at a mock server.
pub fn console_for(server: &MockServer) -> ConsoleClient {
    ConsoleClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
}

/// Application router backed by a mock console service.
pub fn app_for(server: &MockServer) -> Router {
    routes::router(AppState::new(console_for(server)))
}

/// Convert a `json!` object literal into raw field values.
pub fn raw(value: Value) -> FieldValues {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// Mount a `success: true` envelope carrying `body` on `verb path`.
pub async fn mount_success(server: &MockServer, verb: &str, route: &str, body: Value) {
    let mut envelope = json!({ "success": true });
    if let (Some(target), Value::Object(extra)) = (envelope.as_object_mut(), body) {
        target.extend(extra);
    }
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope))
        .mount(server)
        .await;
}

/// Mount a `success: false` envelope with the given error text.
pub async fn mount_rejection(server: &MockServer, verb: &str, route: &str, error: &str) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": false, "error": error })),
        )
        .mount(server)
        .await;
}

/// Mount a mock that fails the test if it is ever called.
pub async fn forbid(server: &MockServer, verb: &str, route: &str) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(0)
        .mount(server)
        .await;
}

/// Drive one request through the router and decode the JSON response.
pub async fn call(router: Router, verb: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(verb).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
