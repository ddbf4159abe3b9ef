//! Unified error handling for dashboard handlers.
//!
//! Expected failures (API down, bad input, wrong role) become notifications
//! and never reach this type; `AppError` covers what the page cannot recover
//! from.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::StateError;

/// Application-level error type for the dashboard.
#[derive(Debug, Error)]
pub enum AppError {
    /// Client state store failed.
    #[error("Storage error: {0}")]
    State(#[from] StateError),

    /// Session read or write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::State(_) | Self::Session(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Dashboard request error"
            );
        }

        let status = match &self {
            Self::State(_) | Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::State(_) | Self::Session(_) => "Internal server error".to_string(),
            Self::NotFound(_) => self.to_string(),
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            status(AppError::NotFound("/nope".to_string())),
            StatusCode::NOT_FOUND
        );
        let corrupt = serde_json::from_str::<i32>("x").unwrap_err();
        assert_eq!(
            status(AppError::State(StateError::Serialization(corrupt))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("/parcels/9".to_string());
        assert_eq!(err.to_string(), "Not found: /parcels/9");
    }
}
