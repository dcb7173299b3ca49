//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::db::repository::RepositoryError;
use crate::services::{PlanError, RosterError};

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Invalid request (validation error)
    BadRequest(String),
    /// Missing or rejected credential
    Unauthorized(String),
    /// Authenticated but not allowed
    Forbidden(String),
    /// Internal server error
    Internal(String),
    /// Repository error
    Repository(RepositoryError),
    /// Plan generation failed. Details are logged, never returned.
    PlanGeneration,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, ApiError::new("UNAUTHORIZED", msg))
            }
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, ApiError::new("FORBIDDEN", msg)),
            AppError::Internal(msg) => {
                error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("INTERNAL_ERROR", "Internal server error"),
                )
            }
            AppError::Repository(e) => {
                if e.is_not_found() {
                    (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", e.to_string()))
                } else if matches!(e, RepositoryError::ValidationError { .. }) {
                    (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", e.to_string()))
                } else {
                    error!(error = %e, context = ?e.context(), "Repository error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ApiError::new("REPOSITORY_ERROR", "Storage backend error"),
                    )
                }
            }
            AppError::PlanGeneration => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("PLAN_GENERATION_FAILED", "Failed to generate study plan")
                    .with_details("Please try again later"),
            ),
        };

        (status, Json(error)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(format!("{:#}", err))
    }
}

impl From<PlanError> for AppError {
    /// Every generation failure is a generic 500; the service has already
    /// logged the cause.
    fn from(_: PlanError) -> Self {
        AppError::PlanGeneration
    }
}

impl From<RosterError> for AppError {
    fn from(err: RosterError) -> Self {
        match err {
            RosterError::NotStaff(_) | RosterError::NotStudent | RosterError::Forbidden => {
                AppError::Forbidden(err.to_string())
            }
            RosterError::InviteNotFound => AppError::NotFound(err.to_string()),
            RosterError::InviteUsed | RosterError::InviteExpired => {
                AppError::BadRequest(err.to_string())
            }
            RosterError::Repository(e) => AppError::Repository(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::Unauthorized("no".into()), StatusCode::UNAUTHORIZED),
            (AppError::PlanGeneration, StatusCode::INTERNAL_SERVER_ERROR),
            (
                AppError::Repository(RepositoryError::not_found("plan 4")),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::Repository(RepositoryError::validation("pages must be positive")),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Repository(RepositoryError::connection("refused")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (RosterError::InviteExpired.into(), StatusCode::BAD_REQUEST),
            (RosterError::NotStudent.into(), StatusCode::FORBIDDEN),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
