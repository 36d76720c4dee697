//! Error codes returned by the order management API
//!
//! Codes are grouped by leading digit:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission / approval errors
//! - 4xxx: Order lifecycle errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code enum
///
/// Serialized as a bare `u16` so clients in any language can switch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed (bad input or a violated financial guard)
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Conflicting state (e.g. already exists)
    Conflict = 4,
    /// Malformed request
    InvalidRequest = 5,

    // ==================== 1xxx: Auth ====================
    /// Caller identity missing
    NotAuthenticated = 1001,

    // ==================== 2xxx: Permission ====================
    /// Privileged action attempted without privilege or an active grant
    AuthorizationRequired = 2002,

    // ==================== 4xxx: Order lifecycle ====================
    /// Status transition not allowed from the current status
    InvalidTransition = 4001,
    /// A pending approval request already exists
    DuplicatePendingRequest = 4002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Storage failure
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Numeric value of the code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Whether this code represents success
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Default human-readable message
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Success => "OK",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::Conflict => "Conflicting state",
            Self::InvalidRequest => "Invalid request",
            Self::NotAuthenticated => "Authentication required",
            Self::AuthorizationRequired => "Authorization required",
            Self::InvalidTransition => "Invalid status transition",
            Self::DuplicatePendingRequest => "A pending request already exists",
            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an unknown u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Success),
            2 => Ok(Self::ValidationFailed),
            3 => Ok(Self::NotFound),
            4 => Ok(Self::Conflict),
            5 => Ok(Self::InvalidRequest),
            1001 => Ok(Self::NotAuthenticated),
            2002 => Ok(Self::AuthorizationRequired),
            4001 => Ok(Self::InvalidTransition),
            4002 => Ok(Self::DuplicatePendingRequest),
            9001 => Ok(Self::InternalError),
            9002 => Ok(Self::DatabaseError),
            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
