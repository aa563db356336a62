// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team model. Membership scopes the team leaderboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use validator::Validate;

use crate::models::User;

/// Team stored in the `teams` collection.
///
/// Members are kept inline on the team document so a single read resolves
/// both the team and its membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// User who created the team
    pub created_by: u64,
    /// Member user IDs, in insertion order without duplicates
    #[serde(default)]
    pub member_ids: Vec<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    pub fn members(&self) -> HashSet<u64> {
        self.member_ids.iter().copied().collect()
    }

    /// Add a member. Returns `false` if already a member.
    pub fn add_member(&mut self, user_id: u64) -> bool {
        if self.member_ids.contains(&user_id) {
            return false;
        }
        self.member_ids.push(user_id);
        true
    }

    /// Remove a member. Returns `false` if not a member.
    pub fn remove_member(&mut self, user_id: u64) -> bool {
        let before = self.member_ids.len();
        self.member_ids.retain(|&id| id != user_id);
        self.member_ids.len() != before
    }

    /// Replace the membership, dropping duplicates but keeping order.
    pub fn set_members(&mut self, member_ids: &[u64]) {
        self.member_ids.clear();
        for &id in member_ids {
            self.add_member(id);
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewTeam {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub description: String,
    pub created_by_id: u64,
    #[serde(default)]
    pub member_ids: Vec<u64>,
}

impl NewTeam {
    pub fn into_team(self, id: u64, now: DateTime<Utc>) -> Team {
        let mut team = Team {
            id,
            name: self.name,
            description: self.description,
            created_by: self.created_by_id,
            member_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        team.set_members(&self.member_ids);
        team
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct TeamUpdate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    /// When present, replaces the whole membership
    pub member_ids: Option<Vec<u64>>,
}

impl TeamUpdate {
    pub fn apply(self, team: &mut Team, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            team.name = name;
        }
        if let Some(description) = self.description {
            team.description = description;
        }
        if let Some(member_ids) = self.member_ids {
            team.set_members(&member_ids);
        }
        team.updated_at = now;
    }
}

/// Body for `add_member` / `remove_member`.
#[derive(Debug, Deserialize)]
pub struct MemberRequest {
    pub user_id: Option<u64>,
}

/// Team as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct TeamResponse {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub created_by: User,
    pub members: Vec<User>,
    pub member_count: usize,
    /// Activities logged by current members
    pub total_activities: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
