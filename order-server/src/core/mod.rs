//! Core module: configuration, state and server lifecycle
//!
//! - [`Config`] - environment-driven configuration
//! - [`ServerState`] - shared service handles
//! - [`Server`] - HTTP server and background tasks
//! - [`ServerError`] - startup failures

pub mod config;
pub mod error;
pub mod server;
pub mod state;
pub mod tasks;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;
pub use tasks::{BackgroundTasks, TaskKind};
