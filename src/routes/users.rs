// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User account routes.

use crate::db::collections;
use crate::error::{AppError, Result};
use crate::models::user::{NewUser, UserUpdate};
use crate::models::User;
use crate::routes::JsonBody;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/{id}",
            get(get_user)
                .put(update_user)
                .patch(update_user)
                .delete(delete_user),
        )
}

/// Look up a user or fail with 404.
pub(crate) async fn load_user(state: &AppState, id: u64) -> Result<User> {
    state
        .db
        .get_user(id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))
}

/// Reject a username that belongs to a different user.
async fn ensure_username_available(state: &AppState, username: &str, id: Option<u64>) -> Result<()> {
    match state.db.find_user_by_username(username.trim()).await? {
        Some(existing) if Some(existing.id) != id => Err(AppError::BadRequest(
            "A user with that username already exists".to_string(),
        )),
        _ => Ok(()),
    }
}

async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<User>>> {
    Ok(Json(state.db.list_users().await?))
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    JsonBody(input): JsonBody<NewUser>,
) -> Result<(StatusCode, Json<User>)> {
    input.validate()?;
    ensure_username_available(&state, &input.username, None).await?;

    let id = state.db.allocate_id(collections::USERS)?;
    let user = input.into_user(id, chrono::Utc::now());
    state.db.upsert_user(&user).await?;

    tracing::info!(user_id = user.id, username = %user.username, "Created user");

    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(State(state): State<Arc<AppState>>, Path(id): Path<u64>) -> Result<Json<User>> {
    Ok(Json(load_user(&state, id).await?))
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    JsonBody(input): JsonBody<UserUpdate>,
) -> Result<Json<User>> {
    input.validate()?;
    let mut user = load_user(&state, id).await?;

    if let Some(username) = &input.username {
        ensure_username_available(&state, username, Some(id)).await?;
    }

    input.apply(&mut user);
    state.db.upsert_user(&user).await?;

    Ok(Json(user))
}

/// Delete a user together with their profile, activities and created teams.
async fn delete_user(State(state): State<Arc<AppState>>, Path(id): Path<u64>) -> Result<StatusCode> {
    load_user(&state, id).await?;

    tracing::info!(user_id = id, "Deleting user");
    state.db.delete_user_data(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
