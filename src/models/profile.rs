// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile model (one profile per user).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::User;

/// Profile stored in the `profiles` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    /// Owning user; at most one profile per user
    pub user_id: u64,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub fitness_goal: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewProfile {
    pub user_id: u64,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub bio: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub fitness_goal: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(max = 5000))]
    pub bio: Option<String>,
    #[validate(length(max = 200))]
    pub fitness_goal: Option<String>,
}

impl ProfileUpdate {
    pub fn apply(self, profile: &mut UserProfile, now: DateTime<Utc>) {
        if let Some(bio) = self.bio {
            profile.bio = bio;
        }
        if let Some(goal) = self.fitness_goal {
            profile.fitness_goal = goal;
        }
        profile.updated_at = now;
    }
}

/// Profile as returned by the API, with the owning user expanded.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub id: u64,
    pub user: User,
    pub bio: String,
    pub fitness_goal: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileResponse {
    pub fn new(profile: UserProfile, user: User) -> Self {
        Self {
            id: profile.id,
            user,
            bio: profile.bio,
            fitness_goal: profile.fitness_goal,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}
