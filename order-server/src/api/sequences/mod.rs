//! Document sequence API
//!
//! | Path | Method | Action |
//! |------|--------|--------|
//! | /api/sequences | GET | every sequence row |
//! | /api/sequences/{type} | GET | one row |
//! | /api/sequences/{type}/next | POST | issue the next number |
//!
//! `{type}` accepts `ORDER`, `EXPENSE`, `QUOTE`, `PRODUCTION`, `WORK_ORDER`
//! (or `work-order`).

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/sequences", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{document_type}", get(handler::get_by_type))
        .route("/{document_type}/next", post(handler::next))
}
