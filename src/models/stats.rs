// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user activity aggregates.
//!
//! These are derived on every request from the stored activities and are
//! never persisted.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{Activity, User};

/// Running totals over a set of activities.
///
/// Missing distance or calorie values count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityTotals {
    pub total_activities: u32,
    /// Minutes
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_duration: u64,
    /// Kilometers
    pub total_distance: f64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_calories: u64,
}

impl ActivityTotals {
    /// Fold one activity into the totals.
    pub fn add_activity(&mut self, activity: &Activity) {
        self.total_activities += 1;
        self.total_duration += u64::from(activity.duration);
        self.total_distance += activity.distance.unwrap_or(0.0);
        self.total_calories += u64::from(activity.calories.unwrap_or(0));
    }

    pub fn from_activities<'a>(activities: impl IntoIterator<Item = &'a Activity>) -> Self {
        let mut totals = Self::default();
        for activity in activities {
            totals.add_activity(activity);
        }
        totals
    }
}

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserStatSummary {
    pub user: User,
    pub total_activities: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_duration: u64,
    pub total_distance: f64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_calories: u64,
    /// 1-based position in the leaderboard
    pub rank: u32,
}

impl UserStatSummary {
    pub fn new(user: User, totals: ActivityTotals, rank: u32) -> Self {
        Self {
            user,
            total_activities: totals.total_activities,
            total_duration: totals.total_duration,
            total_distance: totals.total_distance,
            total_calories: totals.total_calories,
            rank,
        }
    }
}
