// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! Two backends share one method surface: Firestore for deployments and an
//! in-memory store for local development and tests. Handlers talk to the
//! [`Database`] enum; the leaderboard only needs the narrower
//! [`UserStore`], [`ActivityStore`] and [`TeamStore`] traits.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use std::collections::HashSet;
use std::future::Future;

use crate::config::{Config, StorageBackend};
use crate::error::AppError;
use crate::models::{
    Activity, ActivityType, Difficulty, Team, User, UserProfile, WorkoutSuggestion,
};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const PROFILES: &str = "profiles";
    pub const ACTIVITIES: &str = "activities";
    pub const TEAMS: &str = "teams";
    pub const WORKOUTS: &str = "workouts";
}

/// Selection criteria for activity listings.
#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    /// Only activities owned by these users
    pub user_ids: Option<HashSet<u64>>,
    pub activity_type: Option<ActivityType>,
    /// Keep only the newest `limit` activities
    pub limit: Option<usize>,
}

impl ActivityFilter {
    pub fn for_users(user_ids: HashSet<u64>) -> Self {
        Self {
            user_ids: Some(user_ids),
            ..Default::default()
        }
    }

    pub fn for_user(user_id: u64) -> Self {
        Self::for_users(HashSet::from([user_id]))
    }

    pub fn matches(&self, activity: &Activity) -> bool {
        self.user_ids
            .as_ref()
            .is_none_or(|ids| ids.contains(&activity.user_id))
            && self
                .activity_type
                .is_none_or(|t| t == activity.activity_type)
    }

    /// Order newest first and apply the limit.
    pub fn finish(&self, mut activities: Vec<Activity>) -> Vec<Activity> {
        activities.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
        if let Some(limit) = self.limit {
            activities.truncate(limit);
        }
        activities
    }
}

/// Selection criteria for workout suggestions.
#[derive(Debug, Clone, Default)]
pub struct WorkoutFilter {
    pub difficulty: Option<Difficulty>,
    pub activity_type: Option<String>,
}

impl WorkoutFilter {
    pub fn matches(&self, workout: &WorkoutSuggestion) -> bool {
        self.difficulty.is_none_or(|d| d == workout.difficulty)
            && self
                .activity_type
                .as_deref()
                .is_none_or(|t| t == workout.activity_type)
    }
}

/// Read access to users.
pub trait UserStore {
    /// All users, ordered by ID.
    fn list_users(&self) -> impl Future<Output = Result<Vec<User>, AppError>> + Send;

    /// The subset of `ids` that exist, ordered by ID.
    fn get_users(
        &self,
        ids: &HashSet<u64>,
    ) -> impl Future<Output = Result<Vec<User>, AppError>> + Send;
}

/// Read access to activities.
pub trait ActivityStore {
    fn list_activities(
        &self,
        filter: &ActivityFilter,
    ) -> impl Future<Output = Result<Vec<Activity>, AppError>> + Send;
}

/// Read access to teams and their membership.
pub trait TeamStore {
    fn get_team(&self, id: u64) -> impl Future<Output = Result<Option<Team>, AppError>> + Send;

    /// Member IDs of a team; empty when the team does not exist.
    fn get_members(
        &self,
        team_id: u64,
    ) -> impl Future<Output = Result<HashSet<u64>, AppError>> + Send;
}

/// Storage handle shared by all request handlers.
#[derive(Clone)]
pub enum Database {
    Firestore(FirestoreDb),
    Memory(MemoryDb),
}

macro_rules! dispatch {
    ($self:ident, $db:ident => $call:expr) => {
        match $self {
            Database::Firestore($db) => $call,
            Database::Memory($db) => $call,
        }
    };
}

impl Database {
    /// Connect to the backend selected in the configuration.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        match config.storage_backend {
            StorageBackend::Firestore => Ok(Database::Firestore(
                FirestoreDb::new(&config.gcp_project_id).await?,
            )),
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; data will not survive a restart");
                Ok(Database::Memory(MemoryDb::new()))
            }
        }
    }

    /// Fresh, empty in-memory database.
    pub fn in_memory() -> Self {
        Database::Memory(MemoryDb::new())
    }

    /// Reserve a new document ID in `collection`.
    pub fn allocate_id(&self, collection: &'static str) -> Result<u64, AppError> {
        dispatch!(self, db => db.allocate_id(collection))
    }

    // ─── Users ───────────────────────────────────────────────────

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        dispatch!(self, db => db.list_users().await)
    }

    pub async fn get_user(&self, id: u64) -> Result<Option<User>, AppError> {
        dispatch!(self, db => db.get_user(id).await)
    }

    pub async fn get_users(&self, ids: &HashSet<u64>) -> Result<Vec<User>, AppError> {
        dispatch!(self, db => db.get_users(ids).await)
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        dispatch!(self, db => db.find_user_by_username(username).await)
    }

    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        dispatch!(self, db => db.upsert_user(user).await)
    }

    pub async fn delete_user(&self, id: u64) -> Result<(), AppError> {
        dispatch!(self, db => db.delete_user(id).await)
    }

    // ─── Profiles ────────────────────────────────────────────────

    pub async fn list_profiles(&self) -> Result<Vec<UserProfile>, AppError> {
        dispatch!(self, db => db.list_profiles().await)
    }

    pub async fn get_profile(&self, id: u64) -> Result<Option<UserProfile>, AppError> {
        dispatch!(self, db => db.get_profile(id).await)
    }

    pub async fn get_profile_by_user(&self, user_id: u64) -> Result<Option<UserProfile>, AppError> {
        dispatch!(self, db => db.get_profile_by_user(user_id).await)
    }

    pub async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), AppError> {
        dispatch!(self, db => db.upsert_profile(profile).await)
    }

    pub async fn delete_profile(&self, id: u64) -> Result<(), AppError> {
        dispatch!(self, db => db.delete_profile(id).await)
    }

    // ─── Activities ──────────────────────────────────────────────

    pub async fn list_activities(&self, filter: &ActivityFilter) -> Result<Vec<Activity>, AppError> {
        dispatch!(self, db => db.list_activities(filter).await)
    }

    pub async fn get_activity(&self, id: u64) -> Result<Option<Activity>, AppError> {
        dispatch!(self, db => db.get_activity(id).await)
    }

    pub async fn upsert_activity(&self, activity: &Activity) -> Result<(), AppError> {
        dispatch!(self, db => db.upsert_activity(activity).await)
    }

    pub async fn delete_activity(&self, id: u64) -> Result<(), AppError> {
        dispatch!(self, db => db.delete_activity(id).await)
    }

    // ─── Teams ───────────────────────────────────────────────────

    /// Teams ordered by ID, optionally only those `member` belongs to.
    pub async fn list_teams(&self, member: Option<u64>) -> Result<Vec<Team>, AppError> {
        dispatch!(self, db => db.list_teams(member).await)
    }

    pub async fn get_team(&self, id: u64) -> Result<Option<Team>, AppError> {
        dispatch!(self, db => db.get_team(id).await)
    }

    pub async fn upsert_team(&self, team: &Team) -> Result<(), AppError> {
        dispatch!(self, db => db.upsert_team(team).await)
    }

    pub async fn delete_team(&self, id: u64) -> Result<(), AppError> {
        dispatch!(self, db => db.delete_team(id).await)
    }

    // ─── Workout Suggestions ─────────────────────────────────────

    pub async fn list_workouts(
        &self,
        filter: &WorkoutFilter,
    ) -> Result<Vec<WorkoutSuggestion>, AppError> {
        dispatch!(self, db => db.list_workouts(filter).await)
    }

    pub async fn get_workout(&self, id: u64) -> Result<Option<WorkoutSuggestion>, AppError> {
        dispatch!(self, db => db.get_workout(id).await)
    }

    pub async fn upsert_workout(&self, workout: &WorkoutSuggestion) -> Result<(), AppError> {
        dispatch!(self, db => db.upsert_workout(workout).await)
    }

    pub async fn delete_workout(&self, id: u64) -> Result<(), AppError> {
        dispatch!(self, db => db.delete_workout(id).await)
    }

    // ─── User Data Deletion ──────────────────────────────────────

    /// Delete a user and everything that depends on them.
    ///
    /// Removes the profile, all activities and every team the user created,
    /// and drops the user from the remaining teams' memberships.
    ///
    /// Returns the number of documents deleted.
    pub async fn delete_user_data(&self, user_id: u64) -> Result<usize, AppError> {
        let mut deleted_count = 0;

        if let Some(profile) = self.get_profile_by_user(user_id).await? {
            self.delete_profile(profile.id).await?;
            deleted_count += 1;
        }

        let activities = self
            .list_activities(&ActivityFilter::for_user(user_id))
            .await?;
        for activity in &activities {
            self.delete_activity(activity.id).await?;
        }
        deleted_count += activities.len();
        tracing::debug!(user_id, count = activities.len(), "Deleted activities");

        for mut team in self.list_teams(None).await? {
            if team.created_by == user_id {
                self.delete_team(team.id).await?;
                deleted_count += 1;
            } else if team.remove_member(user_id) {
                team.updated_at = chrono::Utc::now();
                self.upsert_team(&team).await?;
            }
        }

        self.delete_user(user_id).await?;
        deleted_count += 1;

        tracing::info!(user_id, deleted_count, "User data deletion complete");

        Ok(deleted_count)
    }
}

impl UserStore for Database {
    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Database::list_users(self).await
    }

    async fn get_users(&self, ids: &HashSet<u64>) -> Result<Vec<User>, AppError> {
        Database::get_users(self, ids).await
    }
}

impl ActivityStore for Database {
    async fn list_activities(&self, filter: &ActivityFilter) -> Result<Vec<Activity>, AppError> {
        Database::list_activities(self, filter).await
    }
}

impl TeamStore for Database {
    async fn get_team(&self, id: u64) -> Result<Option<Team>, AppError> {
        Database::get_team(self, id).await
    }

    async fn get_members(&self, team_id: u64) -> Result<HashSet<u64>, AppError> {
        Ok(Database::get_team(self, team_id)
            .await?
            .map(|team| team.members())
            .unwrap_or_default())
    }
}
