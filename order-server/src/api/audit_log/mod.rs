//! Audit log API
//!
//! `GET /api/audit?resource_id=…` lists the trail of one resource, oldest
//! first; without `resource_id` the latest `limit` entries are returned,
//! newest first.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/audit", get(handler::list))
}
