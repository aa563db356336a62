// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use octofit_tracker::config::Config;
use octofit_tracker::db::{Database, FirestoreDb};
use octofit_tracker::routes::create_router;
use octofit_tracker::AppState;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a test app backed by a fresh in-memory database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config: Config::default(),
        db: Database::in_memory(),
    });

    (create_router(state.clone()), state)
}

/// Send a request through the router and decode the JSON response.
///
/// Empty bodies (e.g. 204) decode to `Value::Null`.
#[allow(dead_code)]
pub async fn send(
    app: &axum::Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
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

#[allow(dead_code)]
pub async fn get(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

#[allow(dead_code)]
pub async fn post(app: &axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

/// Create a user through the API and return its ID.
#[allow(dead_code)]
pub async fn create_user(app: &axum::Router, username: &str) -> u64 {
    let (status, body) = post(
        app,
        "/api/users",
        serde_json::json!({
            "username": username,
            "email": format!("{}@example.com", username),
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create user: {}", body);
    body["id"].as_u64().unwrap()
}

/// Log an activity through the API and return its ID.
#[allow(dead_code)]
pub async fn log_activity(
    app: &axum::Router,
    user_id: u64,
    activity_type: &str,
    duration: u32,
    calories: Option<u32>,
) -> u64 {
    let (status, body) = post(
        app,
        "/api/activities",
        serde_json::json!({
            "user_id": user_id,
            "activity_type": activity_type,
            "duration": duration,
            "calories": calories,
            "date": "2024-01-15T10:00:00Z",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "log activity: {}", body);
    body["id"].as_u64().unwrap()
}

/// Create a team through the API and return its ID.
#[allow(dead_code)]
pub async fn create_team(app: &axum::Router, name: &str, created_by: u64, members: &[u64]) -> u64 {
    let (status, body) = post(
        app,
        "/api/teams",
        serde_json::json!({
            "name": name,
            "created_by_id": created_by,
            "member_ids": members,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create team: {}", body);
    body["id"].as_u64().unwrap()
}
