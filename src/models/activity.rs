// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Logged workout activity model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::models::User;

/// Kind of workout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Running,
    Cycling,
    Swimming,
    Walking,
    Gym,
    Yoga,
    Other,
}

impl ActivityType {
    pub const ALL: [ActivityType; 7] = [
        ActivityType::Running,
        ActivityType::Cycling,
        ActivityType::Swimming,
        ActivityType::Walking,
        ActivityType::Gym,
        ActivityType::Yoga,
        ActivityType::Other,
    ];

    /// Stored value, as used in query strings and documents.
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityType::Running => "running",
            ActivityType::Cycling => "cycling",
            ActivityType::Swimming => "swimming",
            ActivityType::Walking => "walking",
            ActivityType::Gym => "gym",
            ActivityType::Yoga => "yoga",
            ActivityType::Other => "other",
        }
    }

    /// Human readable label.
    pub fn display_name(self) -> &'static str {
        match self {
            ActivityType::Running => "Running",
            ActivityType::Cycling => "Cycling",
            ActivityType::Swimming => "Swimming",
            ActivityType::Walking => "Walking",
            ActivityType::Gym => "Gym",
            ActivityType::Yoga => "Yoga",
            ActivityType::Other => "Other",
        }
    }

    /// Whether a distance is meaningful for this kind of activity.
    pub fn tracks_distance(self) -> bool {
        matches!(
            self,
            ActivityType::Running | ActivityType::Cycling | ActivityType::Walking
        )
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivityType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown activity type '{}'", s))
    }
}

/// Stored activity record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Activity ID (also used as document ID)
    pub id: u64,
    /// Owner
    pub user_id: u64,
    pub activity_type: ActivityType,
    /// Duration in minutes
    pub duration: u32,
    /// Distance in kilometers
    pub distance: Option<f64>,
    /// Calories burned
    pub calories: Option<u32>,
    #[serde(default)]
    pub notes: String,
    /// When the workout took place
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewActivity {
    pub user_id: u64,
    pub activity_type: ActivityType,
    #[validate(range(min = 1, max = 10080))]
    pub duration: u32,
    #[validate(range(min = 0.0))]
    pub distance: Option<f64>,
    pub calories: Option<u32>,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub notes: String,
    pub date: DateTime<Utc>,
}

impl NewActivity {
    pub fn into_activity(self, id: u64, now: DateTime<Utc>) -> Activity {
        Activity {
            id,
            user_id: self.user_id,
            activity_type: self.activity_type,
            duration: self.duration,
            distance: self.distance,
            calories: self.calories,
            notes: self.notes,
            date: self.date,
            created_at: now,
        }
    }
}

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`).
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial update. `distance` and `calories` may be sent as `null` to clear them.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ActivityUpdate {
    pub activity_type: Option<ActivityType>,
    #[validate(range(min = 1, max = 10080))]
    pub duration: Option<u32>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(range(min = 0.0))]
    pub distance: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub calories: Option<Option<u32>>,
    #[validate(length(max = 5000))]
    pub notes: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

impl ActivityUpdate {
    pub fn apply(self, activity: &mut Activity) {
        if let Some(activity_type) = self.activity_type {
            activity.activity_type = activity_type;
        }
        if let Some(duration) = self.duration {
            activity.duration = duration;
        }
        if let Some(distance) = self.distance {
            activity.distance = distance;
        }
        if let Some(calories) = self.calories {
            activity.calories = calories;
        }
        if let Some(notes) = self.notes {
            activity.notes = notes;
        }
        if let Some(date) = self.date {
            activity.date = date;
        }
    }
}

/// Activity as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityResponse {
    pub id: u64,
    pub user: User,
    pub activity_type: ActivityType,
    pub activity_type_display: &'static str,
    pub duration: u32,
    pub distance: Option<f64>,
    pub calories: Option<u32>,
    pub notes: String,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ActivityResponse {
    pub fn new(activity: Activity, user: User) -> Self {
        Self {
            id: activity.id,
            user,
            activity_type: activity.activity_type,
            activity_type_display: activity.activity_type.display_name(),
            duration: activity.duration,
            distance: activity.distance,
            calories: activity.calories,
            notes: activity.notes,
            date: activity.date,
            created_at: activity.created_at,
        }
    }
}
