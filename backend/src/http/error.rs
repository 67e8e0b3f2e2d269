//! HTTP error handling and response types.
//!
//! Client errors carry their message through to the body. Upstream and internal
//! failures are logged and answered with a generic message so that store or
//! auth-service details never reach the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::AuthError;
use crate::db::repository::RepositoryError;
use crate::models::DateRangeError;
use crate::services::ServiceError;

const UPSTREAM_MESSAGE: &str = "The backing service is unavailable, please try again later";
const INTERNAL_MESSAGE: &str = "An unexpected error occurred";

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
    /// Invalid request (validation error)
    BadRequest(String),
    /// Missing or invalid bearer token, or rejected credentials
    Unauthorized(String),
    /// Authenticated but not allowed
    Forbidden(String),
    /// Resource not found
    NotFound(String),
    /// The store or auth service failed
    Upstream(String),
    /// Internal server error
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            AppError::BadRequest(msg) => ApiError::new("BAD_REQUEST", msg),
            AppError::Unauthorized(msg) => ApiError::new("UNAUTHORIZED", msg),
            AppError::Forbidden(msg) => ApiError::new("FORBIDDEN", msg),
            AppError::NotFound(msg) => ApiError::new("NOT_FOUND", msg),
            AppError::Upstream(detail) => {
                tracing::error!(%detail, "upstream failure");
                ApiError::new("UPSTREAM_ERROR", UPSTREAM_MESSAGE)
            }
            AppError::Internal(detail) => {
                tracing::error!(%detail, "internal error");
                ApiError::new("INTERNAL_ERROR", INTERNAL_MESSAGE)
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { message, .. } => AppError::NotFound(message),
            RepositoryError::ValidationError { message, .. } => AppError::BadRequest(message),
            RepositoryError::ConnectionError { .. }
            | RepositoryError::QueryError { .. }
            | RepositoryError::DecodeError { .. } => AppError::Upstream(err.to_string()),
            RepositoryError::ConfigurationError { .. } | RepositoryError::InternalError { .. } => {
                AppError::Internal(err.to_string())
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::Unauthorized(err.to_string()),
            AuthError::EmailTaken | AuthError::Validation(_) => AppError::BadRequest(err.to_string()),
            AuthError::Upstream(_) | AuthError::Decode(_) => AppError::Upstream(err.to_string()),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Repository(e) => e.into(),
            ServiceError::Auth(e) => e.into(),
            ServiceError::Validation(msg) => AppError::BadRequest(msg),
            ServiceError::Forbidden(msg) => AppError::Forbidden(msg),
        }
    }
}

impl From<DateRangeError> for AppError {
    fn from(err: DateRangeError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
