// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Demo data for local development.
//!
//! Seeding only runs against an empty store, so restarting with
//! `SEED_DEMO_DATA=true` never duplicates records.

use chrono::{DateTime, Duration, Utc};

use crate::db::{collections, Database};
use crate::error::Result;
use crate::models::user::NewUser;
use crate::models::{
    Activity, ActivityType, Difficulty, Team, UserProfile, WorkoutSuggestion,
};

/// Counts of what a seeding run created.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub profiles: usize,
    pub activities: usize,
    pub teams: usize,
    pub workouts: usize,
}

const USERS: [(&str, &str, &str, &str); 4] = [
    ("alice", "alice@example.com", "Alice", "Johnson"),
    ("bob", "bob@example.com", "Bob", "Smith"),
    ("charlie", "charlie@example.com", "Charlie", "Brown"),
    ("diana", "diana@example.com", "Diana", "Williams"),
];

const PROFILES: [(&str, &str); 4] = [
    ("Marathon enthusiast", "Run a sub-4 hour marathon"),
    ("Gym lover and weightlifter", "Bench press 200 lbs"),
    ("Yoga and mindfulness practitioner", "Practice yoga daily"),
    ("Cycling enthusiast", "Complete a century ride"),
];

/// (name, description, creator index, member indexes)
const TEAMS: [(&str, &str, usize, &[usize]); 3] = [
    ("Morning Warriors", "Early bird workout team", 0, &[0, 1]),
    ("Weekend Warriors", "Weekend fitness enthusiasts", 2, &[2, 3]),
    ("Cardio Kings", "Focus on cardio activities", 1, &[0, 1, 3]),
];

/// (title, description, activity type, difficulty, minutes, calories)
const WORKOUTS: [(&str, &str, &str, Difficulty, u32, u32); 6] = [
    (
        "5K Running Plan",
        "Build up to running 5 kilometers in 8 weeks",
        "running",
        Difficulty::Beginner,
        30,
        300,
    ),
    (
        "HIIT Cardio Blast",
        "High-intensity interval training for maximum calorie burn",
        "gym",
        Difficulty::Advanced,
        25,
        400,
    ),
    (
        "Morning Yoga Flow",
        "Gentle yoga sequence to start your day",
        "yoga",
        Difficulty::Beginner,
        20,
        100,
    ),
    (
        "Hill Cycling Challenge",
        "Climb repeats to build leg strength and endurance",
        "cycling",
        Difficulty::Intermediate,
        60,
        600,
    ),
    (
        "Open Water Swim",
        "Continuous swim focusing on breathing rhythm",
        "swimming",
        Difficulty::Intermediate,
        45,
        450,
    ),
    (
        "Strength Circuit",
        "Full body compound lifts in a timed circuit",
        "gym",
        Difficulty::Advanced,
        50,
        500,
    ),
];

const ACTIVITY_KINDS: [ActivityType; 6] = [
    ActivityType::Running,
    ActivityType::Cycling,
    ActivityType::Swimming,
    ActivityType::Walking,
    ActivityType::Gym,
    ActivityType::Yoga,
];

const SEED_ACTIVITY_COUNT: u64 = 20;

/// Populate an empty database with demo users, activities, teams and workouts.
///
/// Returns an empty report if any user already exists.
pub async fn seed_demo_data(db: &Database) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    if !db.list_users().await?.is_empty() {
        tracing::info!("Database already has users, skipping demo seed");
        return Ok(report);
    }

    let now = Utc::now();

    let mut user_ids = Vec::with_capacity(USERS.len());
    for (username, email, first, last) in USERS {
        let user = NewUser {
            username: username.to_string(),
            email: Some(email.to_string()),
            first_name: Some(first.to_string()),
            last_name: Some(last.to_string()),
        }
        .into_user(db.allocate_id(collections::USERS)?, now);
        db.upsert_user(&user).await?;
        user_ids.push(user.id);
        report.users += 1;
    }

    for (&user_id, (bio, goal)) in user_ids.iter().zip(PROFILES) {
        let profile = UserProfile {
            id: db.allocate_id(collections::PROFILES)?,
            user_id,
            bio: bio.to_string(),
            fitness_goal: goal.to_string(),
            created_at: now,
            updated_at: now,
        };
        db.upsert_profile(&profile).await?;
        report.profiles += 1;
    }

    for i in 0..SEED_ACTIVITY_COUNT {
        let activity = demo_activity(i, &user_ids, db.allocate_id(collections::ACTIVITIES)?, now);
        db.upsert_activity(&activity).await?;
        report.activities += 1;
    }

    for (name, description, creator, members) in TEAMS {
        let team = Team {
            id: db.allocate_id(collections::TEAMS)?,
            name: name.to_string(),
            description: description.to_string(),
            created_by: user_ids[creator],
            member_ids: members.iter().map(|&m| user_ids[m]).collect(),
            created_at: now,
            updated_at: now,
        };
        db.upsert_team(&team).await?;
        report.teams += 1;
    }

    for (title, description, activity_type, difficulty, duration, calories) in WORKOUTS {
        let workout = WorkoutSuggestion {
            id: db.allocate_id(collections::WORKOUTS)?,
            title: title.to_string(),
            description: description.to_string(),
            activity_type: activity_type.to_string(),
            difficulty,
            duration,
            calories_estimate: calories,
            created_at: now,
        };
        db.upsert_workout(&workout).await?;
        report.workouts += 1;
    }

    tracing::info!(?report, "Seeded demo data");

    Ok(report)
}

/// The `i`-th demo activity. Values vary with `i` but are reproducible.
fn demo_activity(i: u64, user_ids: &[u64], id: u64, now: DateTime<Utc>) -> Activity {
    let kind = ACTIVITY_KINDS[(i as usize * 5 + 1) % ACTIVITY_KINDS.len()];
    let user_id = user_ids[(i as usize * 7 + 3) % user_ids.len()];
    let distance = kind
        .tracks_distance()
        .then(|| ((i * 13) % 190 + 10) as f64 / 10.0);

    Activity {
        id,
        user_id,
        activity_type: kind,
        duration: (20 + (i * 17) % 100) as u32,
        distance,
        calories: Some((100 + (i * 71) % 700) as u32),
        notes: format!("Great {} session!", kind),
        date: now - Duration::days((1 + (i * 11) % 30) as i64),
        created_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ActivityFilter;

    #[tokio::test]
    async fn test_seed_populates_empty_store() {
        let db = Database::in_memory();

        let report = seed_demo_data(&db).await.unwrap();

        assert_eq!(
            report,
            SeedReport {
                users: 4,
                profiles: 4,
                activities: 20,
                teams: 3,
                workouts: 6,
            }
        );
        let activities = db.list_activities(&ActivityFilter::default()).await.unwrap();
        assert_eq!(activities.len(), 20);
        assert!(activities
            .iter()
            .all(|a| a.distance.is_some() == a.activity_type.tracks_distance()));
    }

    #[tokio::test]
    async fn test_seed_is_skipped_when_data_exists() {
        let db = Database::in_memory();
        seed_demo_data(&db).await.unwrap();

        let second = seed_demo_data(&db).await.unwrap();

        assert_eq!(second, SeedReport::default());
        assert_eq!(db.list_users().await.unwrap().len(), 4);
    }
}
