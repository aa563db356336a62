// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout suggestion routes.

use crate::db::{collections, WorkoutFilter};
use crate::error::{AppError, Result};
use crate::models::workout::{NewWorkout, WorkoutResponse, WorkoutUpdate};
use crate::models::{Difficulty, WorkoutSuggestion};
use crate::routes::JsonBody;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

const DEFAULT_RANDOM_COUNT: usize = 3;
const MAX_RANDOM_COUNT: usize = 50;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/workouts", get(list_workouts).post(create_workout))
        .route("/api/workouts/random", get(random_workouts))
        .route(
            "/api/workouts/{id}",
            get(get_workout)
                .put(update_workout)
                .patch(update_workout)
                .delete(delete_workout),
        )
}

#[derive(Deserialize)]
struct WorkoutsQuery {
    difficulty: Option<String>,
    activity_type: Option<String>,
    /// `random` only: number of suggestions
    count: Option<String>,
}

impl WorkoutsQuery {
    fn to_filter(&self) -> Result<WorkoutFilter> {
        let difficulty = self
            .difficulty
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(|d| d.parse::<Difficulty>().map_err(AppError::BadRequest))
            .transpose()?;

        Ok(WorkoutFilter {
            difficulty,
            activity_type: self.activity_type.clone().filter(|t| !t.is_empty()),
        })
    }

    fn count(&self) -> Result<usize> {
        match self.count.as_deref() {
            None => Ok(DEFAULT_RANDOM_COUNT),
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map(|n| n.min(MAX_RANDOM_COUNT))
                .map_err(|_| {
                    AppError::BadRequest("count parameter must be a non-negative integer".to_string())
                }),
        }
    }
}

async fn load_workout(state: &AppState, id: u64) -> Result<WorkoutSuggestion> {
    state
        .db
        .get_workout(id)
        .await?
        .ok_or_else(|| AppError::not_found("Workout suggestion"))
}

async fn list_workouts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WorkoutsQuery>,
) -> Result<Json<Vec<WorkoutResponse>>> {
    let workouts = state.db.list_workouts(&params.to_filter()?).await?;
    Ok(Json(workouts.into_iter().map(WorkoutResponse::from).collect()))
}

/// A random sample of suggestions matching the list filters.
async fn random_workouts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WorkoutsQuery>,
) -> Result<Json<Vec<WorkoutResponse>>> {
    let count = params.count()?;
    let workouts = state.db.list_workouts(&params.to_filter()?).await?;

    let picked = crate::random::sample(workouts, count)?;
    Ok(Json(picked.into_iter().map(WorkoutResponse::from).collect()))
}

async fn create_workout(
    State(state): State<Arc<AppState>>,
    JsonBody(input): JsonBody<NewWorkout>,
) -> Result<(StatusCode, Json<WorkoutResponse>)> {
    input.validate()?;

    let id = state.db.allocate_id(collections::WORKOUTS)?;
    let workout = input.into_workout(id, chrono::Utc::now());
    state.db.upsert_workout(&workout).await?;

    Ok((StatusCode::CREATED, Json(workout.into())))
}

async fn get_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<WorkoutResponse>> {
    Ok(Json(load_workout(&state, id).await?.into()))
}

async fn update_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    JsonBody(input): JsonBody<WorkoutUpdate>,
) -> Result<Json<WorkoutResponse>> {
    input.validate()?;
    let mut workout = load_workout(&state, id).await?;

    input.apply(&mut workout);
    state.db.upsert_workout(&workout).await?;

    Ok(Json(workout.into()))
}

async fn delete_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<StatusCode> {
    load_workout(&state, id).await?;
    state.db.delete_workout(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
