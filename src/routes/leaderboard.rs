// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard routes.

use crate::error::Result;
use crate::models::UserStatSummary;
use crate::routes::{parse_id_param, require_id_param};
use crate::services::leaderboard;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/leaderboard", get(get_leaderboard))
        .route("/api/leaderboard/global", get(get_global_leaderboard))
        .route("/api/leaderboard/team", get(get_team_leaderboard))
}

/// `team_id` is taken as a raw string so malformed values produce our JSON 400.
#[derive(Deserialize)]
struct LeaderboardQuery {
    team_id: Option<String>,
}

/// Global leaderboard, or the team leaderboard when `team_id` is given.
async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeaderboardQuery>,
) -> Result<Json<Vec<UserStatSummary>>> {
    let board = match parse_id_param("team_id", params.team_id.as_deref())? {
        Some(team_id) => leaderboard::team_leaderboard(&state.db, team_id).await?,
        None => leaderboard::global_leaderboard(&state.db).await?,
    };
    Ok(Json(board))
}

async fn get_global_leaderboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserStatSummary>>> {
    Ok(Json(leaderboard::global_leaderboard(&state.db).await?))
}

async fn get_team_leaderboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeaderboardQuery>,
) -> Result<Json<Vec<UserStatSummary>>> {
    let team_id = require_id_param("team_id", params.team_id.as_deref())?;
    tracing::debug!(team_id, "Fetching team leaderboard");
    Ok(Json(leaderboard::team_leaderboard(&state.db, team_id).await?))
}
