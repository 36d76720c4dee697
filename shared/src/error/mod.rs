//! Error codes and the API response envelope
//!
//! The server's typed errors map onto [`ErrorCode`] and are rendered as an
//! [`ApiResponse`] so clients always see the same JSON shape:
//!
//! ```
//! use shared::error::{ApiResponse, ErrorCode};
//!
//! let body = ApiResponse::error(ErrorCode::NotFound, "Order o-1 not found", None);
//! assert_eq!(body.code, 3);
//! ```

mod codes;
mod http;
mod types;

pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::ApiResponse;
