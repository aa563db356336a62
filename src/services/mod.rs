// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod leaderboard;
pub mod seed;

pub use leaderboard::{compute_leaderboard, global_leaderboard, team_leaderboard};
pub use seed::seed_demo_data;
