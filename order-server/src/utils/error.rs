//! Unified error handling
//!
//! - [`AppError`] - application error enum, rendered as an [`ApiResponse`] envelope
//! - [`ok`] - success envelope helper
//!
//! Numeric codes and HTTP statuses come from [`shared::error::ErrorCode`]:
//!
//! | Error | Code | HTTP |
//! |-------|------|------|
//! | `Validation` | 2 | 400 |
//! | `NotFound` | 3 | 404 |
//! | `Conflict` | 4 | 409 |
//! | `Invalid` | 5 | 400 |
//! | `Unauthorized` | 1001 | 401 |
//! | `AuthorizationRequired` | 2002 | 403 |
//! | `InvalidTransition` | 4001 | 422 |
//! | `DuplicatePending` | 4002 | 409 |
//! | `Internal` / `Database` | 9001 / 9002 | 500 |

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use std::collections::HashMap;
use tracing::error;

pub use shared::error::{ApiResponse, ErrorCode};

use crate::db::StorageError;

/// Application-level Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Caller errors (4xx) ==========
    #[error("Authentication required")]
    /// No actor identity on the request (401)
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid request: {0}")]
    Invalid(String),

    // ========== Workflow errors ==========
    #[error("Invalid transition from {from} to {to}")]
    /// Target status not reachable from the current one (422)
    InvalidTransition {
        from: String,
        to: String,
        allowed: Vec<String>,
    },

    #[error("Authorization required: {0}")]
    /// Action needs privilege or an approved request (403)
    AuthorizationRequired(String),

    #[error("A pending request already exists: {existing_id}")]
    DuplicatePending { existing_id: String },

    // ========== System errors (5xx) ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn authorization_required(msg: impl Into<String>) -> Self {
        Self::AuthorizationRequired(msg.into())
    }

    pub fn invalid_transition(
        from: impl ToString,
        to: impl ToString,
        allowed: impl IntoIterator<Item = impl ToString>,
    ) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
            allowed: allowed.into_iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Wire error code
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Unauthorized => ErrorCode::NotAuthenticated,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::Conflict(_) => ErrorCode::Conflict,
            AppError::Validation(_) => ErrorCode::ValidationFailed,
            AppError::Invalid(_) => ErrorCode::InvalidRequest,
            AppError::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            AppError::AuthorizationRequired(_) => ErrorCode::AuthorizationRequired,
            AppError::DuplicatePending { .. } => ErrorCode::DuplicatePendingRequest,
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::Internal(_) => ErrorCode::InternalError,
        }
    }

    fn details(&self) -> Option<HashMap<String, Value>> {
        match self {
            AppError::InvalidTransition { from, to, allowed } => Some(HashMap::from([
                ("from".to_string(), Value::from(from.as_str())),
                ("to".to_string(), Value::from(to.as_str())),
                ("allowed".to_string(), Value::from(allowed.clone())),
            ])),
            AppError::DuplicatePending { existing_id } => Some(HashMap::from([(
                "existing_request_id".to_string(),
                Value::from(existing_id.as_str()),
            )])),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let message = match &self {
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                code.message().to_string()
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                code.message().to_string()
            }
            other => other.to_string(),
        };

        let body = Json(ApiResponse::<()>::error(code, message, self.details()));
        (code.http_status(), body).into_response()
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        AppError::Database(e.to_string())
    }
}

impl From<redb::CommitError> for AppError {
    fn from(e: redb::CommitError) -> Self {
        StorageError::from(e).into()
    }
}

impl From<redb::TransactionError> for AppError {
    fn from(e: redb::TransactionError) -> Self {
        StorageError::from(e).into()
    }
}

impl From<shared::models::ParseStatusError> for AppError {
    fn from(e: shared::models::ParseStatusError) -> Self {
        AppError::Invalid(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_invalid_transition_details() {
        let err = AppError::invalid_transition("DRAFT", "PAID", ["CONFIRMED", "CANCELLED"]);
        let details = err.details().unwrap();
        assert_eq!(details["allowed"], serde_json::json!(["CONFIRMED", "CANCELLED"]));
        assert_eq!(err.code(), ErrorCode::InvalidTransition);
    }

    #[test]
    fn test_status_codes() {
        let resp = AppError::DuplicatePending {
            existing_id: "r-1".into(),
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = AppError::authorization_required("needs approval").into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = AppError::Database("boom".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
