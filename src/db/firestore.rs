// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users and their profiles
//! - Activities (logged workouts)
//! - Teams (membership stored inline)
//! - Workout suggestions
//!
//! Document IDs are the decimal form of the numeric model ID.

use crate::db::{collections, ActivityFilter, WorkoutFilter};
use crate::error::AppError;
use crate::models::{Activity, Team, User, UserProfile, WorkoutSuggestion};
use futures_util::{stream, StreamExt};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashSet;

const MAX_CONCURRENT_DB_OPS: usize = 50;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: firestore::FirestoreDb,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }

    /// Document IDs are random so concurrent instances never collide.
    pub fn allocate_id(&self, _collection: &'static str) -> Result<u64, AppError> {
        crate::random::random_id()
    }

    // ─── Generic Document Helpers ────────────────────────────────

    async fn get_doc<T>(&self, collection: &str, id: u64) -> Result<Option<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        self.client
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(&id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn set_doc<T>(&self, collection: &str, id: u64, object: &T) -> Result<(), AppError>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collection)
            .document_id(id.to_string())
            .object(object)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn delete_doc(&self, collection: &str, id: u64) -> Result<(), AppError> {
        self.client
            .fluent()
            .delete()
            .from(collection)
            .document_id(id.to_string())
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn list_docs<T>(&self, collection: &str) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        self.client
            .fluent()
            .select()
            .from(collection)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let mut users: Vec<User> = self.list_docs(collections::USERS).await?;
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    pub async fn get_user(&self, id: u64) -> Result<Option<User>, AppError> {
        self.get_doc(collections::USERS, id).await
    }

    /// Fetch several users by ID, skipping IDs that do not exist.
    pub async fn get_users(&self, ids: &HashSet<u64>) -> Result<Vec<User>, AppError> {
        let fetched = stream::iter(ids.iter().copied())
            .map(|id| async move { self.get_user(id).await })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<Option<User>, AppError>>>()
            .await;

        let mut users = fetched
            .into_iter()
            .filter_map(|r| r.transpose())
            .collect::<Result<Vec<User>, AppError>>()?;
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let users: Vec<User> = self
            .client
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(|q| q.for_all([q.field("username").eq(username)]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(users.into_iter().next())
    }

    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        self.set_doc(collections::USERS, user.id, user).await
    }

    pub async fn delete_user(&self, id: u64) -> Result<(), AppError> {
        self.delete_doc(collections::USERS, id).await
    }

    // ─── Profile Operations ──────────────────────────────────────

    pub async fn list_profiles(&self) -> Result<Vec<UserProfile>, AppError> {
        let mut profiles: Vec<UserProfile> = self.list_docs(collections::PROFILES).await?;
        profiles.sort_by_key(|p| p.id);
        Ok(profiles)
    }

    pub async fn get_profile(&self, id: u64) -> Result<Option<UserProfile>, AppError> {
        self.get_doc(collections::PROFILES, id).await
    }

    pub async fn get_profile_by_user(&self, user_id: u64) -> Result<Option<UserProfile>, AppError> {
        let profiles: Vec<UserProfile> = self
            .client
            .fluent()
            .select()
            .from(collections::PROFILES)
            .filter(|q| q.for_all([q.field("user_id").eq(user_id)]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(profiles.into_iter().next())
    }

    pub async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), AppError> {
        self.set_doc(collections::PROFILES, profile.id, profile).await
    }

    pub async fn delete_profile(&self, id: u64) -> Result<(), AppError> {
        self.delete_doc(collections::PROFILES, id).await
    }

    // ─── Activity Operations ─────────────────────────────────────

    /// Activities for a single user, optionally restricted to one type.
    async fn activities_for_user(
        &self,
        user_id: u64,
        filter: &ActivityFilter,
    ) -> Result<Vec<Activity>, AppError> {
        let activity_type = filter.activity_type.map(|t| t.as_str());

        self.client
            .fluent()
            .select()
            .from(collections::ACTIVITIES)
            .filter(|q| {
                q.for_all([
                    q.field("user_id").eq(user_id),
                    activity_type.and_then(|t| q.field("activity_type").eq(t)),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List activities matching `filter`, newest first.
    ///
    /// User-scoped queries run one equality query per user with bounded
    /// concurrency, which avoids Firestore's limit on `IN` filter values.
    pub async fn list_activities(&self, filter: &ActivityFilter) -> Result<Vec<Activity>, AppError> {
        let activities = match &filter.user_ids {
            Some(user_ids) => stream::iter(user_ids.iter().copied())
                .map(|user_id| self.activities_for_user(user_id, filter))
                .buffer_unordered(MAX_CONCURRENT_DB_OPS)
                .collect::<Vec<Result<Vec<Activity>, AppError>>>()
                .await
                .into_iter()
                .collect::<Result<Vec<Vec<Activity>>, AppError>>()?
                .into_iter()
                .flatten()
                .collect(),
            None => {
                let activity_type = filter.activity_type.map(|t| t.as_str());
                let query = self
                    .client
                    .fluent()
                    .select()
                    .from(collections::ACTIVITIES);

                let query = if let Some(activity_type) = activity_type {
                    query.filter(move |q| q.field("activity_type").eq(activity_type))
                } else {
                    query
                };

                // `finish` re-sorts with the ID tiebreak after the fetch
                let query = match filter.limit {
                    Some(limit) => query
                        .order_by([("date", firestore::FirestoreQueryDirection::Descending)])
                        .limit(limit.min(u32::MAX as usize) as u32),
                    None => query,
                };

                query
                    .obj()
                    .query()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?
            }
        };

        tracing::debug!(count = activities.len(), "Fetched activities");

        Ok(filter.finish(activities))
    }

    pub async fn get_activity(&self, id: u64) -> Result<Option<Activity>, AppError> {
        self.get_doc(collections::ACTIVITIES, id).await
    }

    pub async fn upsert_activity(&self, activity: &Activity) -> Result<(), AppError> {
        self.set_doc(collections::ACTIVITIES, activity.id, activity)
            .await
    }

    pub async fn delete_activity(&self, id: u64) -> Result<(), AppError> {
        self.delete_doc(collections::ACTIVITIES, id).await
    }

    // ─── Team Operations ─────────────────────────────────────────

    pub async fn list_teams(&self, member: Option<u64>) -> Result<Vec<Team>, AppError> {
        let mut teams: Vec<Team> = match member {
            Some(user_id) => self
                .client
                .fluent()
                .select()
                .from(collections::TEAMS)
                .filter(move |q| q.field("member_ids").array_contains(user_id))
                .obj()
                .query()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?,
            None => self.list_docs(collections::TEAMS).await?,
        };
        teams.sort_by_key(|t| t.id);
        Ok(teams)
    }

    pub async fn get_team(&self, id: u64) -> Result<Option<Team>, AppError> {
        self.get_doc(collections::TEAMS, id).await
    }

    pub async fn upsert_team(&self, team: &Team) -> Result<(), AppError> {
        self.set_doc(collections::TEAMS, team.id, team).await
    }

    pub async fn delete_team(&self, id: u64) -> Result<(), AppError> {
        self.delete_doc(collections::TEAMS, id).await
    }

    // ─── Workout Operations ──────────────────────────────────────

    pub async fn list_workouts(
        &self,
        filter: &WorkoutFilter,
    ) -> Result<Vec<WorkoutSuggestion>, AppError> {
        let difficulty = filter.difficulty.map(|d| d.as_str());
        let activity_type = filter.activity_type.as_deref();

        let mut workouts: Vec<WorkoutSuggestion> = self
            .client
            .fluent()
            .select()
            .from(collections::WORKOUTS)
            .filter(|q| {
                q.for_all([
                    difficulty.and_then(|d| q.field("difficulty").eq(d)),
                    activity_type.and_then(|t| q.field("activity_type").eq(t)),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        workouts.sort_by_key(|w| w.id);
        Ok(workouts)
    }

    pub async fn get_workout(&self, id: u64) -> Result<Option<WorkoutSuggestion>, AppError> {
        self.get_doc(collections::WORKOUTS, id).await
    }

    pub async fn upsert_workout(&self, workout: &WorkoutSuggestion) -> Result<(), AppError> {
        self.set_doc(collections::WORKOUTS, workout.id, workout)
            .await
    }

    pub async fn delete_workout(&self, id: u64) -> Result<(), AppError> {
        self.delete_doc(collections::WORKOUTS, id).await
    }
}
