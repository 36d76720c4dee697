//! Shared types for the order management backend
//!
//! Serializable domain types used by the server and by any client talking to it:
//! aggregate shapes, lifecycle statuses, approval requests, document sequences,
//! request payloads, error codes and the API response envelope.

pub mod error;
pub mod models;
pub mod request;
pub mod util;

// Re-exports
pub use error::{ApiResponse, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
