//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,
            Self::ValidationFailed | Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict | Self::DuplicatePendingRequest => StatusCode::CONFLICT,
            Self::NotAuthenticated => StatusCode::UNAUTHORIZED,
            Self::AuthorizationRequired => StatusCode::FORBIDDEN,
            Self::InvalidTransition => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InternalError | Self::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::AuthorizationRequired.http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ErrorCode::DuplicatePendingRequest.http_status(),
            StatusCode::CONFLICT
        );
    }
}
