// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! CRUD endpoint tests for users, profiles, activities, teams and workouts.

use axum::http::{Method, StatusCode};
use serde_json::json;

mod common;
use common::{create_team, create_user, get, log_activity, post, send};

// ═══════════════════════════════════════════════════════════════════════════
// USERS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_health_check() {
    let (app, _state) = common::create_test_app();

    let (status, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_user_crud() {
    let (app, _state) = common::create_test_app();
    let id = create_user(&app, "alice").await;

    let (status, user) = get(&app, &format!("/api/users/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["username"], "alice");
    assert_eq!(user["email"], "alice@example.com");

    let (status, user) = send(
        &app,
        Method::PATCH,
        &format!("/api/users/{}", id),
        Some(json!({ "first_name": "Alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["first_name"], "Alice");
    assert_eq!(user["username"], "alice");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/users/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = get(&app, &format!("/api/users/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn test_duplicate_username_rejected() {
    let (app, _state) = common::create_test_app();
    create_user(&app, "alice").await;

    let (status, _) = post(&app, "/api/users", json!({ "username": "alice" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_email_rejected() {
    let (app, _state) = common::create_test_app();

    let (status, body) = post(
        &app,
        "/api/users",
        json!({ "username": "bob", "email": "not-an-email" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_request");
}

#[tokio::test]
async fn test_blank_username_rejected() {
    let (app, _state) = common::create_test_app();

    let (status, body) = post(&app, "/api/users", json!({ "username": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_request");

    let id = create_user(&app, "alice").await;
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/users/{}", id),
        Some(json!({ "username": " " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, users) = get(&app, "/api/users").await;
    assert_eq!(users.as_array().unwrap().len(), 1);
    assert_eq!(users[0]["username"], "alice");
}

#[tokio::test]
async fn test_deleting_user_cascades() {
    let (app, _state) = common::create_test_app();
    let alice = create_user(&app, "alice").await;
    let bob = create_user(&app, "bob").await;
    log_activity(&app, alice, "running", 30, Some(300)).await;
    let alice_team = create_team(&app, "Alice's Team", alice, &[alice, bob]).await;
    let bob_team = create_team(&app, "Bob's Team", bob, &[alice, bob]).await;
    let (status, _) = post(&app, "/api/profiles", json!({ "user_id": alice })).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/users/{}", alice), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, activities) = get(&app, "/api/activities").await;
    assert_eq!(activities, json!([]));
    let (_, profiles) = get(&app, "/api/profiles").await;
    assert_eq!(profiles, json!([]));
    let (status, _) = get(&app, &format!("/api/teams/{}", alice_team)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, team) = get(&app, &format!("/api/teams/{}", bob_team)).await;
    assert_eq!(team["member_count"], 1);
    assert_eq!(team["members"][0]["id"], bob);
}

// ═══════════════════════════════════════════════════════════════════════════
// PROFILES
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_profile_by_user() {
    let (app, _state) = common::create_test_app();
    let alice = create_user(&app, "alice").await;

    let (status, profile) = post(
        &app,
        "/api/profiles",
        json!({ "user_id": alice, "bio": "Marathon enthusiast", "fitness_goal": "Run 5K" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(profile["user"]["username"], "alice");

    let (status, fetched) = get(&app, &format!("/api/profiles/by_user?user_id={}", alice)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["fitness_goal"], "Run 5K");

    let (status, _) = get(&app, "/api/profiles/by_user").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let bob = create_user(&app, "bob").await;
    let (status, body) = get(&app, &format!("/api/profiles/by_user?user_id={}", bob)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Profile not found");
}

#[tokio::test]
async fn test_one_profile_per_user() {
    let (app, _state) = common::create_test_app();
    let alice = create_user(&app, "alice").await;

    let (status, _) = post(&app, "/api/profiles", json!({ "user_id": alice })).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = post(&app, "/api/profiles", json!({ "user_id": alice })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ═══════════════════════════════════════════════════════════════════════════
// ACTIVITIES
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_activity_create_and_filter() {
    let (app, _state) = common::create_test_app();
    let alice = create_user(&app, "alice").await;
    let bob = create_user(&app, "bob").await;

    let (status, activity) = post(
        &app,
        "/api/activities",
        json!({
            "user_id": alice,
            "activity_type": "running",
            "duration": 30,
            "distance": 5.0,
            "calories": 300,
            "date": "2024-01-15T10:00:00Z",
            "notes": "Great run!"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(activity["activity_type"], "running");
    assert_eq!(activity["activity_type_display"], "Running");
    assert_eq!(activity["user"]["id"], alice);

    log_activity(&app, bob, "yoga", 45, None).await;

    let (_, all) = get(&app, "/api/activities").await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, mine) = get(&app, &format!("/api/activities?user_id={}", alice)).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let (_, yoga) = get(&app, "/api/activities?activity_type=yoga").await;
    assert_eq!(yoga.as_array().unwrap().len(), 1);
    assert_eq!(yoga[0]["user"]["id"], bob);

    let (status, _) = get(&app, "/api/activities?activity_type=pilates").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_activity_for_unknown_user_rejected() {
    let (app, _state) = common::create_test_app();

    let (status, _) = post(
        &app,
        "/api/activities",
        json!({
            "user_id": 4242,
            "activity_type": "running",
            "duration": 30,
            "date": "2024-01-15T10:00:00Z"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ill_typed_activity_body_is_json_400() {
    let (app, _state) = common::create_test_app();
    let alice = create_user(&app, "alice").await;

    for body in [
        json!({
            "user_id": alice,
            "activity_type": "pilates",
            "duration": 30,
            "date": "2024-01-15T10:00:00Z"
        }),
        json!({
            "user_id": alice,
            "activity_type": "running",
            "duration": 30,
            "calories": -100,
            "date": "2024-01-15T10:00:00Z"
        }),
        json!({
            "user_id": "alice",
            "activity_type": "running",
            "duration": 30,
            "date": "2024-01-15T10:00:00Z"
        }),
    ] {
        let (status, response) = post(&app, "/api/activities", body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        assert_eq!(response["code"], "bad_request");
        assert!(response["error"].is_string());
    }

    let (_, activities) = get(&app, "/api/activities").await;
    assert_eq!(activities, json!([]));
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let (app, _state) = common::create_test_app();

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/api/teams")
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("{\"name\": "))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "bad_request");
}

#[tokio::test]
async fn test_recent_activities_limit() {
    let (app, _state) = common::create_test_app();
    let alice = create_user(&app, "alice").await;
    for _ in 0..5 {
        log_activity(&app, alice, "walking", 20, Some(80)).await;
    }

    let (status, recent) = get(&app, "/api/activities/recent?limit=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(recent.as_array().unwrap().len(), 3);

    let (_, recent) = get(&app, "/api/activities/recent").await;
    assert_eq!(recent.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_activity_stats() {
    let (app, _state) = common::create_test_app();
    let alice = create_user(&app, "alice").await;
    log_activity(&app, alice, "running", 30, Some(300)).await;
    log_activity(&app, alice, "gym", 60, None).await;

    let (status, stats) = get(&app, &format!("/api/activities/stats?user_id={}", alice)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_activities"], 2);
    assert_eq!(stats["total_duration"], 90);
    assert_eq!(stats["total_calories"], 300);

    let (status, body) = get(&app, "/api/activities/stats").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "user_id parameter is required");
}

#[tokio::test]
async fn test_activity_update_and_delete() {
    let (app, _state) = common::create_test_app();
    let alice = create_user(&app, "alice").await;
    let id = log_activity(&app, alice, "running", 30, Some(300)).await;

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/activities/{}", id),
        Some(json!({ "calories": 350, "notes": "Felt strong" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["calories"], 350);
    assert_eq!(updated["duration"], 30);

    let (status, cleared) = send(
        &app,
        Method::PATCH,
        &format!("/api/activities/{}", id),
        Some(json!({ "calories": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["calories"], serde_json::Value::Null);
    assert_eq!(cleared["notes"], "Felt strong");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/activities/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = get(&app, &format!("/api/activities/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ═══════════════════════════════════════════════════════════════════════════
// TEAMS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_team_create_and_members() {
    let (app, _state) = common::create_test_app();
    let alice = create_user(&app, "alice").await;
    let bob = create_user(&app, "bob").await;
    let charlie = create_user(&app, "charlie").await;
    log_activity(&app, bob, "cycling", 40, Some(350)).await;

    let team = create_team(&app, "Test Team", alice, &[alice, bob]).await;

    let (status, body) = get(&app, &format!("/api/teams/{}", team)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["member_count"], 2);
    assert_eq!(body["created_by"]["username"], "alice");
    assert_eq!(body["total_activities"], 1);

    let (status, body) = post(
        &app,
        &format!("/api/teams/{}/add_member", team),
        json!({ "user_id": charlie }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["member_count"], 3);

    let (_, mine) = get(&app, &format!("/api/teams?user_id={}", charlie)).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let (status, body) = post(
        &app,
        &format!("/api/teams/{}/add_member", team),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "user_id is required");

    let (status, body) = post(
        &app,
        &format!("/api/teams/{}/remove_member", team),
        json!({ "user_id": 4242 }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn test_team_update_replaces_members() {
    let (app, _state) = common::create_test_app();
    let alice = create_user(&app, "alice").await;
    let bob = create_user(&app, "bob").await;
    let team = create_team(&app, "Test Team", alice, &[alice]).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/teams/{}", team),
        Some(json!({ "name": "Renamed", "member_ids": [bob, 4242] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["member_count"], 1);
    assert_eq!(body["members"][0]["id"], bob);
}

// ═══════════════════════════════════════════════════════════════════════════
// WORKOUT SUGGESTIONS
// ═══════════════════════════════════════════════════════════════════════════

async fn create_workout(app: &axum::Router, title: &str, difficulty: &str, activity_type: &str) {
    let (status, body) = post(
        app,
        "/api/workouts",
        json!({
            "title": title,
            "description": "Beginner running plan",
            "activity_type": activity_type,
            "difficulty": difficulty,
            "duration": 30,
            "calories_estimate": 300
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create workout: {}", body);
}

#[tokio::test]
async fn test_workouts_filter_by_difficulty() {
    let (app, _state) = common::create_test_app();
    create_workout(&app, "5K Run", "beginner", "running").await;
    create_workout(&app, "HIIT", "advanced", "gym").await;

    let (status, all) = get(&app, "/api/workouts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, beginner) = get(&app, "/api/workouts?difficulty=beginner").await;
    assert_eq!(beginner.as_array().unwrap().len(), 1);
    assert_eq!(beginner[0]["difficulty_display"], "Beginner");

    let (_, gym) = get(&app, "/api/workouts?activity_type=gym").await;
    assert_eq!(gym[0]["title"], "HIIT");

    let (status, _) = get(&app, "/api/workouts?difficulty=expert").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_random_workouts() {
    let (app, _state) = common::create_test_app();
    for i in 0..5 {
        create_workout(&app, &format!("Workout {}", i), "intermediate", "running").await;
    }

    let (status, picked) = get(&app, "/api/workouts/random").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(picked.as_array().unwrap().len(), 3);

    let (_, picked) = get(&app, "/api/workouts/random?count=10").await;
    assert_eq!(picked.as_array().unwrap().len(), 5);
}
