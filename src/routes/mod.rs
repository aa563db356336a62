// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod activities;
pub mod leaderboard;
pub mod profiles;
pub mod teams;
pub mod users;
pub mod workouts;

use crate::error::{AppError, Result};
use crate::AppState;
use axum::extract::{FromRequest, Request};
use axum::http::{header, Method};
use axum::{routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer - allow requests from frontend URL and localhost (for dev)
    let frontend_url = state.config.frontend_url.clone();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                origin_str == frontend_url
                    || origin_str.starts_with("http://localhost")
                    || origin_str.starts_with("http://127.0.0.1")
            },
        ))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/health", get(health_check))
        .merge(users::routes())
        .merge(profiles::routes())
        .merge(activities::routes())
        .merge(teams::routes())
        .merge(workouts::routes())
        .merge(leaderboard::routes())
        .layer(axum::middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// `Json` request body whose rejections are reported as [`AppError`].
pub(crate) struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = axum::extract::rejection::JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}

/// Parse an optional numeric ID from a query string.
///
/// Absent means `None`; present but empty or non-numeric is a 400.
pub(crate) fn parse_id_param(name: &str, raw: Option<&str>) -> Result<Option<u64>> {
    raw.map(|value| {
        let value = value.trim();
        if value.is_empty() {
            return Err(AppError::BadRequest(format!(
                "{} parameter must not be empty",
                name
            )));
        }
        value.parse::<u64>().map_err(|_| {
            AppError::BadRequest(format!("{} parameter must be a positive integer", name))
        })
    })
    .transpose()
}

/// Like [`parse_id_param`] but the parameter must be present.
pub(crate) fn require_id_param(name: &str, raw: Option<&str>) -> Result<u64> {
    parse_id_param(name, raw)?
        .ok_or_else(|| AppError::BadRequest(format!("{} parameter is required", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_param() {
        assert_eq!(parse_id_param("team_id", None).unwrap(), None);
        assert_eq!(parse_id_param("team_id", Some("42")).unwrap(), Some(42));
        assert_eq!(parse_id_param("team_id", Some(" 7 ")).unwrap(), Some(7));
        assert!(matches!(
            parse_id_param("team_id", Some("")),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            parse_id_param("team_id", Some("abc")),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            parse_id_param("team_id", Some("-1")),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_require_id_param_missing() {
        let err = require_id_param("user_id", None).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref msg) if msg == "user_id parameter is required"));
    }
}
