// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory storage backend.
//!
//! Used for local development and tests. IDs are sequential per
//! collection, starting at 1.

use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;

use crate::db::{ActivityFilter, WorkoutFilter};
use crate::error::AppError;
use crate::models::{Activity, Team, User, UserProfile, WorkoutSuggestion};

#[derive(Default)]
struct Tables {
    counters: DashMap<&'static str, u64>,
    users: DashMap<u64, User>,
    profiles: DashMap<u64, UserProfile>,
    activities: DashMap<u64, Activity>,
    teams: DashMap<u64, Team>,
    workouts: DashMap<u64, WorkoutSuggestion>,
}

/// Process-local database. Clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryDb {
    tables: Arc<Tables>,
}

/// Snapshot the values of `map` that satisfy `keep`, ordered by key.
fn collect_sorted<T: Clone>(
    map: &DashMap<u64, T>,
    mut keep: impl FnMut(&T) -> bool,
) -> Vec<T> {
    let mut rows: Vec<(u64, T)> = map
        .iter()
        .filter(|entry| keep(entry.value()))
        .map(|entry| (*entry.key(), entry.value().clone()))
        .collect();
    rows.sort_by_key(|(id, _)| *id);
    rows.into_iter().map(|(_, value)| value).collect()
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate_id(&self, collection: &'static str) -> Result<u64, AppError> {
        let mut counter = self.tables.counters.entry(collection).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }

    // ─── User Operations ─────────────────────────────────────────

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(collect_sorted(&self.tables.users, |_| true))
    }

    pub async fn get_user(&self, id: u64) -> Result<Option<User>, AppError> {
        Ok(self.tables.users.get(&id).map(|u| u.value().clone()))
    }

    pub async fn get_users(&self, ids: &HashSet<u64>) -> Result<Vec<User>, AppError> {
        Ok(collect_sorted(&self.tables.users, |u| ids.contains(&u.id)))
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .tables
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.value().clone()))
    }

    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        self.tables.users.insert(user.id, user.clone());
        Ok(())
    }

    pub async fn delete_user(&self, id: u64) -> Result<(), AppError> {
        self.tables.users.remove(&id);
        Ok(())
    }

    // ─── Profile Operations ──────────────────────────────────────

    pub async fn list_profiles(&self) -> Result<Vec<UserProfile>, AppError> {
        Ok(collect_sorted(&self.tables.profiles, |_| true))
    }

    pub async fn get_profile(&self, id: u64) -> Result<Option<UserProfile>, AppError> {
        Ok(self.tables.profiles.get(&id).map(|p| p.value().clone()))
    }

    pub async fn get_profile_by_user(&self, user_id: u64) -> Result<Option<UserProfile>, AppError> {
        Ok(self
            .tables
            .profiles
            .iter()
            .find(|p| p.user_id == user_id)
            .map(|p| p.value().clone()))
    }

    pub async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), AppError> {
        self.tables.profiles.insert(profile.id, profile.clone());
        Ok(())
    }

    pub async fn delete_profile(&self, id: u64) -> Result<(), AppError> {
        self.tables.profiles.remove(&id);
        Ok(())
    }

    // ─── Activity Operations ─────────────────────────────────────

    pub async fn list_activities(&self, filter: &ActivityFilter) -> Result<Vec<Activity>, AppError> {
        let matching = collect_sorted(&self.tables.activities, |a| filter.matches(a));
        Ok(filter.finish(matching))
    }

    pub async fn get_activity(&self, id: u64) -> Result<Option<Activity>, AppError> {
        Ok(self.tables.activities.get(&id).map(|a| a.value().clone()))
    }

    pub async fn upsert_activity(&self, activity: &Activity) -> Result<(), AppError> {
        self.tables.activities.insert(activity.id, activity.clone());
        Ok(())
    }

    pub async fn delete_activity(&self, id: u64) -> Result<(), AppError> {
        self.tables.activities.remove(&id);
        Ok(())
    }

    // ─── Team Operations ─────────────────────────────────────────

    pub async fn list_teams(&self, member: Option<u64>) -> Result<Vec<Team>, AppError> {
        Ok(collect_sorted(&self.tables.teams, |t| {
            member.is_none_or(|id| t.member_ids.contains(&id))
        }))
    }

    pub async fn get_team(&self, id: u64) -> Result<Option<Team>, AppError> {
        Ok(self.tables.teams.get(&id).map(|t| t.value().clone()))
    }

    pub async fn upsert_team(&self, team: &Team) -> Result<(), AppError> {
        self.tables.teams.insert(team.id, team.clone());
        Ok(())
    }

    pub async fn delete_team(&self, id: u64) -> Result<(), AppError> {
        self.tables.teams.remove(&id);
        Ok(())
    }

    // ─── Workout Operations ──────────────────────────────────────

    pub async fn list_workouts(
        &self,
        filter: &WorkoutFilter,
    ) -> Result<Vec<WorkoutSuggestion>, AppError> {
        Ok(collect_sorted(&self.tables.workouts, |w| filter.matches(w)))
    }

    pub async fn get_workout(&self, id: u64) -> Result<Option<WorkoutSuggestion>, AppError> {
        Ok(self.tables.workouts.get(&id).map(|w| w.value().clone()))
    }

    pub async fn upsert_workout(&self, workout: &WorkoutSuggestion) -> Result<(), AppError> {
        self.tables.workouts.insert(workout.id, workout.clone());
        Ok(())
    }

    pub async fn delete_workout(&self, id: u64) -> Result<(), AppError> {
        self.tables.workouts.remove(&id);
        Ok(())
    }
}
