//! API response envelope

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Unified API response structure
///
/// - `code`: error code (0 for success)
/// - `message`: human-readable message
/// - `data`: response payload (on success)
/// - `details`: structured error context (on failure), e.g. `allowed` next states
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl<T> ApiResponse<T> {
    /// Success response with data
    pub fn success(data: T) -> Self {
        Self {
            code: ErrorCode::Success.code(),
            message: ErrorCode::Success.message().to_string(),
            data: Some(data),
            details: None,
        }
    }

    /// Whether the response carries the success code
    pub fn is_success(&self) -> bool {
        self.code == ErrorCode::Success.code()
    }
}

impl ApiResponse<()> {
    /// Error response with optional details
    pub fn error(
        code: ErrorCode,
        message: impl Into<String>,
        details: Option<HashMap<String, Value>>,
    ) -> Self {
        Self {
            code: code.code(),
            message: message.into(),
            data: None,
            details,
        }
    }
}
