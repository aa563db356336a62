// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity logging routes.

use crate::db::{collections, ActivityFilter};
use crate::error::{AppError, Result};
use crate::models::activity::{ActivityResponse, ActivityUpdate, NewActivity};
use crate::models::{Activity, ActivityTotals, ActivityType};
use crate::routes::{parse_id_param, require_id_param, JsonBody};
use crate::routes::users::load_user;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use validator::Validate;

const DEFAULT_RECENT_LIMIT: usize = 10;
const MAX_RECENT_LIMIT: usize = 100;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/activities", get(list_activities).post(create_activity))
        .route("/api/activities/recent", get(recent_activities))
        .route("/api/activities/stats", get(activity_stats))
        .route(
            "/api/activities/{id}",
            get(get_activity)
                .put(update_activity)
                .patch(update_activity)
                .delete(delete_activity),
        )
}

#[derive(Deserialize)]
struct ActivitiesQuery {
    /// Only activities of this user
    user_id: Option<String>,
    /// Only activities of this type (e.g. "running")
    activity_type: Option<String>,
    /// `recent` only: number of activities to return
    limit: Option<String>,
}

impl ActivitiesQuery {
    fn to_filter(&self) -> Result<ActivityFilter> {
        let user_ids = parse_id_param("user_id", self.user_id.as_deref())?.map(|id| HashSet::from([id]));
        let activity_type = self
            .activity_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|t| t.parse::<ActivityType>().map_err(AppError::BadRequest))
            .transpose()?;

        Ok(ActivityFilter {
            user_ids,
            activity_type,
            limit: None,
        })
    }
}

fn parse_limit(raw: Option<&str>) -> Result<usize> {
    match raw {
        None => Ok(DEFAULT_RECENT_LIMIT),
        Some(value) => value
            .trim()
            .parse::<usize>()
            .map(|limit| limit.min(MAX_RECENT_LIMIT))
            .map_err(|_| {
                AppError::BadRequest("limit parameter must be a non-negative integer".to_string())
            }),
    }
}

/// Attach owners to activities, dropping any whose owner has disappeared.
async fn to_responses(state: &AppState, activities: Vec<Activity>) -> Result<Vec<ActivityResponse>> {
    let owner_ids: HashSet<u64> = activities.iter().map(|a| a.user_id).collect();
    let owners: HashMap<u64, _> = state
        .db
        .get_users(&owner_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    Ok(activities
        .into_iter()
        .filter_map(|a| {
            let owner = owners.get(&a.user_id).cloned();
            if owner.is_none() {
                tracing::warn!(activity_id = a.id, user_id = a.user_id, "Activity without user");
            }
            owner.map(|u| ActivityResponse::new(a, u))
        })
        .collect())
}

async fn load_activity(state: &AppState, id: u64) -> Result<Activity> {
    state
        .db
        .get_activity(id)
        .await?
        .ok_or_else(|| AppError::not_found("Activity"))
}

/// List activities, newest first.
async fn list_activities(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ActivitiesQuery>,
) -> Result<Json<Vec<ActivityResponse>>> {
    let filter = params.to_filter()?;
    let activities = state.db.list_activities(&filter).await?;
    Ok(Json(to_responses(&state, activities).await?))
}

/// The newest `limit` activities (default 10), honoring the list filters.
async fn recent_activities(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ActivitiesQuery>,
) -> Result<Json<Vec<ActivityResponse>>> {
    let mut filter = params.to_filter()?;
    filter.limit = Some(parse_limit(params.limit.as_deref())?);

    let activities = state.db.list_activities(&filter).await?;
    Ok(Json(to_responses(&state, activities).await?))
}

/// Totals across all of one user's activities.
async fn activity_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ActivitiesQuery>,
) -> Result<Json<ActivityTotals>> {
    let user_id = require_id_param("user_id", params.user_id.as_deref())?;

    let activities = state
        .db
        .list_activities(&ActivityFilter::for_user(user_id))
        .await?;

    Ok(Json(ActivityTotals::from_activities(&activities)))
}

async fn create_activity(
    State(state): State<Arc<AppState>>,
    JsonBody(input): JsonBody<NewActivity>,
) -> Result<(StatusCode, Json<ActivityResponse>)> {
    input.validate()?;

    let user = state
        .db
        .get_user(input.user_id)
        .await?
        .ok_or_else(|| AppError::BadRequest(format!("User {} does not exist", input.user_id)))?;

    let id = state.db.allocate_id(collections::ACTIVITIES)?;
    let activity = input.into_activity(id, chrono::Utc::now());
    state.db.upsert_activity(&activity).await?;

    tracing::info!(
        activity_id = activity.id,
        user_id = activity.user_id,
        activity_type = %activity.activity_type,
        "Logged activity"
    );

    Ok((StatusCode::CREATED, Json(ActivityResponse::new(activity, user))))
}

async fn get_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<ActivityResponse>> {
    let activity = load_activity(&state, id).await?;
    let user = load_user(&state, activity.user_id).await?;
    Ok(Json(ActivityResponse::new(activity, user)))
}

async fn update_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    JsonBody(input): JsonBody<ActivityUpdate>,
) -> Result<Json<ActivityResponse>> {
    input.validate()?;
    let mut activity = load_activity(&state, id).await?;

    input.apply(&mut activity);
    state.db.upsert_activity(&activity).await?;

    let user = load_user(&state, activity.user_id).await?;
    Ok(Json(ActivityResponse::new(activity, user)))
}

async fn delete_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<StatusCode> {
    load_activity(&state, id).await?;
    state.db.delete_activity(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit(None).unwrap(), DEFAULT_RECENT_LIMIT);
        assert_eq!(parse_limit(Some("5")).unwrap(), 5);
        assert_eq!(parse_limit(Some("100000")).unwrap(), MAX_RECENT_LIMIT);
        assert!(parse_limit(Some("-3")).is_err());
    }

    #[test]
    fn test_query_rejects_unknown_activity_type() {
        let query = ActivitiesQuery {
            user_id: None,
            activity_type: Some("pilates".to_string()),
            limit: None,
        };
        assert!(matches!(query.to_filter(), Err(AppError::BadRequest(_))));
    }
}
