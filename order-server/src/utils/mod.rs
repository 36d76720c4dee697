//! Shared utilities
//!
//! - [`AppError`] / [`AppResult`] - application errors and their HTTP rendering
//! - [`logger`] - tracing subscriber setup

pub mod error;
pub mod logger;

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
