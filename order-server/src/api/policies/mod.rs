//! Editable-status policy API
//!
//! | Path | Method | Action |
//! |------|--------|--------|
//! | /api/policies | GET | list, lifecycle order |
//! | /api/policies/{status} | GET | fetch one |
//! | /api/policies/{status} | PUT | set `allow_edit_requests` (privileged) |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/policies", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{status}", get(handler::get_by_status).put(handler::update))
}
