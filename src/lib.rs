// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! OctoFit Tracker: fitness tracking backend
//!
//! This crate provides the JSON API for logging workouts, organising users
//! into teams and ranking them on calorie leaderboards.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod random;
pub mod routes;
pub mod services;

use config::Config;
use db::Database;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
}
