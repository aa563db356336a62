// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError};

/// User account stored in the `users` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct User {
    /// User ID (also used as document ID)
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    /// Unique login name
    pub username: String,
    /// Email address (empty if not provided)
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// When the account was created
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub date_joined: DateTime<Utc>,
}

/// Request body for creating a user.
#[derive(Debug, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, max = 150), custom(function = "not_blank"))]
    pub username: String,
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
}

/// Request body for updating a user. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UserUpdate {
    #[validate(length(min = 1, max = 150), custom(function = "not_blank"))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
}

/// Usernames are stored trimmed, so whitespace alone counts as empty.
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

impl NewUser {
    /// Build the stored record once an ID has been assigned.
    pub fn into_user(self, id: u64, now: DateTime<Utc>) -> User {
        User {
            id,
            username: self.username.trim().to_string(),
            email: self.email.unwrap_or_default(),
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            date_joined: now,
        }
    }
}

impl UserUpdate {
    pub fn apply(self, user: &mut User) {
        if let Some(username) = self.username {
            user.username = username.trim().to_string();
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(first_name) = self.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            user.last_name = last_name;
        }
    }
}
