// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile routes.

use crate::db::collections;
use crate::error::{AppError, Result};
use crate::models::profile::{NewProfile, ProfileResponse, ProfileUpdate};
use crate::models::UserProfile;
use crate::routes::users::load_user;
use crate::routes::{require_id_param, JsonBody};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/profiles", get(list_profiles).post(create_profile))
        .route("/api/profiles/by_user", get(get_profile_by_user))
        .route(
            "/api/profiles/{id}",
            get(get_profile)
                .put(update_profile)
                .patch(update_profile)
                .delete(delete_profile),
        )
}

async fn to_response(state: &AppState, profile: UserProfile) -> Result<ProfileResponse> {
    let user = load_user(state, profile.user_id).await?;
    Ok(ProfileResponse::new(profile, user))
}

async fn load_profile(state: &AppState, id: u64) -> Result<UserProfile> {
    state
        .db
        .get_profile(id)
        .await?
        .ok_or_else(|| AppError::not_found("Profile"))
}

async fn list_profiles(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ProfileResponse>>> {
    let profiles = state.db.list_profiles().await?;
    let users: HashMap<u64, _> = state
        .db
        .list_users()
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let responses = profiles
        .into_iter()
        .filter_map(|p| {
            let user = users.get(&p.user_id).cloned();
            if user.is_none() {
                tracing::warn!(profile_id = p.id, user_id = p.user_id, "Profile without user");
            }
            user.map(|u| ProfileResponse::new(p, u))
        })
        .collect();

    Ok(Json(responses))
}

async fn create_profile(
    State(state): State<Arc<AppState>>,
    JsonBody(input): JsonBody<NewProfile>,
) -> Result<(StatusCode, Json<ProfileResponse>)> {
    input.validate()?;

    let user = state
        .db
        .get_user(input.user_id)
        .await?
        .ok_or_else(|| AppError::BadRequest(format!("User {} does not exist", input.user_id)))?;

    if state.db.get_profile_by_user(user.id).await?.is_some() {
        return Err(AppError::BadRequest(
            "Profile already exists for this user".to_string(),
        ));
    }

    let now = chrono::Utc::now();
    let profile = UserProfile {
        id: state.db.allocate_id(collections::PROFILES)?,
        user_id: user.id,
        bio: input.bio,
        fitness_goal: input.fitness_goal,
        created_at: now,
        updated_at: now,
    };
    state.db.upsert_profile(&profile).await?;

    Ok((StatusCode::CREATED, Json(ProfileResponse::new(profile, user))))
}

async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<ProfileResponse>> {
    let profile = load_profile(&state, id).await?;
    Ok(Json(to_response(&state, profile).await?))
}

#[derive(Deserialize)]
struct ByUserQuery {
    user_id: Option<String>,
}

/// Fetch the profile belonging to `?user_id=`.
async fn get_profile_by_user(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ByUserQuery>,
) -> Result<Json<ProfileResponse>> {
    let user_id = require_id_param("user_id", params.user_id.as_deref())?;

    let profile = state
        .db
        .get_profile_by_user(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Profile"))?;

    Ok(Json(to_response(&state, profile).await?))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    JsonBody(input): JsonBody<ProfileUpdate>,
) -> Result<Json<ProfileResponse>> {
    input.validate()?;
    let mut profile = load_profile(&state, id).await?;

    input.apply(&mut profile, chrono::Utc::now());
    state.db.upsert_profile(&profile).await?;

    Ok(Json(to_response(&state, profile).await?))
}

async fn delete_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<StatusCode> {
    load_profile(&state, id).await?;
    state.db.delete_profile(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
