// SPDX-License-Identifier: MIT

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::config::ConfigError;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("User not authorized")]
    Unauthorized,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Google API error: {0}")]
    GoogleApi(String),

    #[error("Telegram API error: {0}")]
    Telegram(String),

    #[error("Authorization failed: {0}")]
    OAuth(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // OAuth exchange failures render as plain text for the browser tab
        // the provider redirected to, not as an API-shaped JSON body.
        if let AppError::OAuth(msg) = &self {
            tracing::warn!(error = %msg, "OAuth exchange failed");
            return (
                StatusCode::BAD_REQUEST,
                format!("Authorization failed: {}", msg),
            )
                .into_response();
        }

        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Config(err) => {
                tracing::error!(error = %err, "Configuration error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "config_error",
                    Some(err.to_string()),
                )
            }
            AppError::GoogleApi(msg) => {
                (StatusCode::BAD_GATEWAY, "google_error", Some(msg.clone()))
            }
            AppError::Telegram(msg) => {
                (StatusCode::BAD_GATEWAY, "telegram_error", Some(msg.clone()))
            }
            AppError::OAuth(_) => unreachable!("handled above"),
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl AppError {
    /// Marker message for an expired or revoked Google access token.
    pub const GOOGLE_TOKEN_ERROR: &'static str = "Token expired or revoked";

    /// Whether this error indicates the Google access token needs a refresh.
    pub fn is_google_token_error(&self) -> bool {
        matches!(self, AppError::GoogleApi(msg) if msg.contains(Self::GOOGLE_TOKEN_ERROR))
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
