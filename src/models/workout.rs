// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout suggestion model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(format!("Unknown difficulty '{}'", other)),
        }
    }
}

/// Stored workout suggestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSuggestion {
    pub id: u64,
    pub title: String,
    pub description: String,
    /// Free-form activity type (not restricted to logged activity kinds)
    pub activity_type: String,
    pub difficulty: Difficulty,
    /// Duration in minutes
    pub duration: u32,
    pub calories_estimate: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewWorkout {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1, max = 50))]
    pub activity_type: String,
    pub difficulty: Difficulty,
    #[validate(range(min = 1))]
    pub duration: u32,
    pub calories_estimate: u32,
}

impl NewWorkout {
    pub fn into_workout(self, id: u64, now: DateTime<Utc>) -> WorkoutSuggestion {
        WorkoutSuggestion {
            id,
            title: self.title,
            description: self.description,
            activity_type: self.activity_type,
            difficulty: self.difficulty,
            duration: self.duration,
            calories_estimate: self.calories_estimate,
            created_at: now,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct WorkoutUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub activity_type: Option<String>,
    pub difficulty: Option<Difficulty>,
    #[validate(range(min = 1))]
    pub duration: Option<u32>,
    pub calories_estimate: Option<u32>,
}

impl WorkoutUpdate {
    pub fn apply(self, workout: &mut WorkoutSuggestion) {
        if let Some(title) = self.title {
            workout.title = title;
        }
        if let Some(description) = self.description {
            workout.description = description;
        }
        if let Some(activity_type) = self.activity_type {
            workout.activity_type = activity_type;
        }
        if let Some(difficulty) = self.difficulty {
            workout.difficulty = difficulty;
        }
        if let Some(duration) = self.duration {
            workout.duration = duration;
        }
        if let Some(calories) = self.calories_estimate {
            workout.calories_estimate = calories;
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkoutResponse {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub activity_type: String,
    pub difficulty: Difficulty,
    pub difficulty_display: &'static str,
    pub duration: u32,
    pub calories_estimate: u32,
    pub created_at: DateTime<Utc>,
}

impl From<WorkoutSuggestion> for WorkoutResponse {
    fn from(w: WorkoutSuggestion) -> Self {
        Self {
            id: w.id,
            title: w.title,
            description: w.description,
            activity_type: w.activity_type,
            difficulty: w.difficulty,
            difficulty_display: w.difficulty.display_name(),
            duration: w.duration,
            calories_estimate: w.calories_estimate,
            created_at: w.created_at,
        }
    }
}
