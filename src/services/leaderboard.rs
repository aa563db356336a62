// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard aggregation.
//!
//! Groups activities by user, folds them into [`ActivityTotals`], drops
//! users without activities, sorts by total calories (highest first) and
//! assigns dense 1-based ranks. Ties keep user-ID order, so the output is
//! deterministic for a given data set.

use std::collections::HashMap;

use crate::db::{ActivityFilter, ActivityStore, TeamStore, UserStore};
use crate::error::{AppError, Result};
use crate::models::{Activity, ActivityTotals, User, UserStatSummary};

/// Rank `users` by the calories they burned across `activities`.
///
/// Activities belonging to users not in `users` are ignored, which is how
/// the team variant scopes the computation.
pub fn compute_leaderboard(users: &[User], activities: &[Activity]) -> Vec<UserStatSummary> {
    let mut totals: HashMap<u64, ActivityTotals> = HashMap::with_capacity(users.len());
    for activity in activities {
        totals
            .entry(activity.user_id)
            .or_default()
            .add_activity(activity);
    }

    let mut ordered: Vec<&User> = users.iter().collect();
    ordered.sort_by_key(|u| u.id);
    ordered.dedup_by_key(|u| u.id);

    let mut ranked: Vec<(&User, ActivityTotals)> = ordered
        .into_iter()
        .filter_map(|user| {
            totals
                .get(&user.id)
                .filter(|t| t.total_activities > 0)
                .map(|t| (user, *t))
        })
        .collect();

    // Stable sort: equal calorie totals stay in user-ID order
    ranked.sort_by(|(_, a), (_, b)| b.total_calories.cmp(&a.total_calories));

    ranked
        .into_iter()
        .zip(1u32..)
        .map(|((user, totals), rank)| UserStatSummary::new(user.clone(), totals, rank))
        .collect()
}

/// Leaderboard across every user.
pub async fn global_leaderboard<S>(store: &S) -> Result<Vec<UserStatSummary>>
where
    S: UserStore + ActivityStore,
{
    let users = store.list_users().await?;
    let activities = store.list_activities(&ActivityFilter::default()).await?;

    let leaderboard = compute_leaderboard(&users, &activities);
    tracing::debug!(
        users = users.len(),
        activities = activities.len(),
        entries = leaderboard.len(),
        "Computed global leaderboard"
    );
    Ok(leaderboard)
}

/// Leaderboard restricted to the members of one team.
///
/// Fails with `NotFound` if the team does not exist.
pub async fn team_leaderboard<S>(store: &S, team_id: u64) -> Result<Vec<UserStatSummary>>
where
    S: UserStore + ActivityStore + TeamStore,
{
    if store.get_team(team_id).await?.is_none() {
        return Err(AppError::not_found("Team"));
    }

    let members = store.get_members(team_id).await?;
    if members.is_empty() {
        return Ok(Vec::new());
    }

    let users = store.get_users(&members).await?;
    let activities = store
        .list_activities(&ActivityFilter::for_users(members))
        .await?;

    let leaderboard = compute_leaderboard(&users, &activities);
    tracing::debug!(
        team_id,
        members = users.len(),
        entries = leaderboard.len(),
        "Computed team leaderboard"
    );
    Ok(leaderboard)
}
