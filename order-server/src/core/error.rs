//! Startup and serve errors
//!
//! Request-level failures use [`crate::utils::AppError`]; this type covers
//! what can stop the process itself.

use thiserror::Error;

use crate::db::StorageError;
use crate::utils::AppError;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to prepare work directory: {0}")]
    WorkDir(#[source] std::io::Error),

    #[error("Failed to open database: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to seed defaults: {0}")]
    Seed(#[from] AppError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP server error: {0}")]
    Serve(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
