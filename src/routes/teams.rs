// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team routes, including membership management.

use crate::db::{collections, ActivityFilter};
use crate::error::{AppError, Result};
use crate::models::team::{MemberRequest, NewTeam, TeamResponse, TeamUpdate};
use crate::models::Team;
use crate::routes::{parse_id_param, JsonBody};
use crate::routes::users::load_user;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/teams", get(list_teams).post(create_team))
        .route(
            "/api/teams/{id}",
            get(get_team)
                .put(update_team)
                .patch(update_team)
                .delete(delete_team),
        )
        .route("/api/teams/{id}/add_member", post(add_member))
        .route("/api/teams/{id}/remove_member", post(remove_member))
}

async fn load_team(state: &AppState, id: u64) -> Result<Team> {
    state
        .db
        .get_team(id)
        .await?
        .ok_or_else(|| AppError::not_found("Team"))
}

/// Keep only the IDs that belong to existing users, preserving order.
async fn existing_user_ids(state: &AppState, ids: &[u64]) -> Result<Vec<u64>> {
    let wanted: HashSet<u64> = ids.iter().copied().collect();
    let found: HashSet<u64> = state
        .db
        .get_users(&wanted)
        .await?
        .into_iter()
        .map(|u| u.id)
        .collect();

    if found.len() < wanted.len() {
        tracing::debug!(
            requested = wanted.len(),
            found = found.len(),
            "Ignoring unknown member IDs"
        );
    }

    Ok(ids.iter().copied().filter(|id| found.contains(id)).collect())
}

/// Expand a team with its creator, members and activity count.
async fn to_response(state: &AppState, team: Team) -> Result<TeamResponse> {
    let mut user_ids = team.members();
    user_ids.insert(team.created_by);

    let users: HashMap<u64, _> = state
        .db
        .get_users(&user_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let created_by = users.get(&team.created_by).cloned().ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "Creator {} of team {} is missing",
            team.created_by,
            team.id
        ))
    })?;
    let members: Vec<_> = team
        .member_ids
        .iter()
        .filter_map(|id| users.get(id).cloned())
        .collect();

    let total_activities = if members.is_empty() {
        0
    } else {
        state
            .db
            .list_activities(&ActivityFilter::for_users(team.members()))
            .await?
            .len()
    };

    Ok(TeamResponse {
        id: team.id,
        name: team.name,
        description: team.description,
        created_by,
        member_count: members.len(),
        members,
        total_activities,
        created_at: team.created_at,
        updated_at: team.updated_at,
    })
}

#[derive(Deserialize)]
struct TeamsQuery {
    /// Only teams this user is a member of
    user_id: Option<String>,
}

async fn list_teams(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TeamsQuery>,
) -> Result<Json<Vec<TeamResponse>>> {
    let member = parse_id_param("user_id", params.user_id.as_deref())?;
    let teams = state.db.list_teams(member).await?;

    let mut responses = Vec::with_capacity(teams.len());
    for team in teams {
        responses.push(to_response(&state, team).await?);
    }
    Ok(Json(responses))
}

async fn create_team(
    State(state): State<Arc<AppState>>,
    JsonBody(mut input): JsonBody<NewTeam>,
) -> Result<(StatusCode, Json<TeamResponse>)> {
    input.validate()?;

    if state.db.get_user(input.created_by_id).await?.is_none() {
        return Err(AppError::BadRequest(format!(
            "User {} does not exist",
            input.created_by_id
        )));
    }
    input.member_ids = existing_user_ids(&state, &input.member_ids).await?;

    let id = state.db.allocate_id(collections::TEAMS)?;
    let team = input.into_team(id, chrono::Utc::now());
    state.db.upsert_team(&team).await?;

    tracing::info!(
        team_id = team.id,
        members = team.member_ids.len(),
        "Created team"
    );

    Ok((StatusCode::CREATED, Json(to_response(&state, team).await?)))
}

async fn get_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<TeamResponse>> {
    let team = load_team(&state, id).await?;
    Ok(Json(to_response(&state, team).await?))
}

async fn update_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    JsonBody(mut input): JsonBody<TeamUpdate>,
) -> Result<Json<TeamResponse>> {
    input.validate()?;
    let mut team = load_team(&state, id).await?;

    if let Some(member_ids) = input.member_ids.take() {
        input.member_ids = Some(existing_user_ids(&state, &member_ids).await?);
    }

    input.apply(&mut team, chrono::Utc::now());
    state.db.upsert_team(&team).await?;

    Ok(Json(to_response(&state, team).await?))
}

async fn delete_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<StatusCode> {
    load_team(&state, id).await?;
    state.db.delete_team(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Resolve the team and the user named in a membership request.
async fn membership_target(
    state: &AppState,
    team_id: u64,
    request: MemberRequest,
) -> Result<(Team, u64)> {
    let team = load_team(state, team_id).await?;
    let user_id = request
        .user_id
        .ok_or_else(|| AppError::BadRequest("user_id is required".to_string()))?;
    let user = load_user(state, user_id).await?;
    Ok((team, user.id))
}

async fn add_member(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    JsonBody(request): JsonBody<MemberRequest>,
) -> Result<Json<TeamResponse>> {
    let (mut team, user_id) = membership_target(&state, id, request).await?;

    if team.add_member(user_id) {
        team.updated_at = chrono::Utc::now();
        state.db.upsert_team(&team).await?;
        tracing::info!(team_id = id, user_id, "Added team member");
    }

    Ok(Json(to_response(&state, team).await?))
}

async fn remove_member(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    JsonBody(request): JsonBody<MemberRequest>,
) -> Result<Json<TeamResponse>> {
    let (mut team, user_id) = membership_target(&state, id, request).await?;

    if team.remove_member(user_id) {
        team.updated_at = chrono::Utc::now();
        state.db.upsert_team(&team).await?;
        tracing::info!(team_id = id, user_id, "Removed team member");
    }

    Ok(Json(to_response(&state, team).await?))
}
