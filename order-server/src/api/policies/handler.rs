//! Editable-status policy handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{EditableStatusPolicy, OrderStatus};
use shared::request::PolicyUpdate;

use crate::auth::RequestContext;
use crate::core::ServerState;
use crate::utils::AppResult;

/// GET /api/policies
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<EditableStatusPolicy>>> {
    Ok(Json(state.policies.list()?))
}

/// GET /api/policies/{status}
pub async fn get_by_status(
    State(state): State<ServerState>,
    Path(status): Path<String>,
) -> AppResult<Json<EditableStatusPolicy>> {
    let status: OrderStatus = status.parse()?;
    Ok(Json(state.policies.get(status)?))
}

/// PUT /api/policies/{status}
pub async fn update(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(status): Path<String>,
    Json(payload): Json<PolicyUpdate>,
) -> AppResult<Json<EditableStatusPolicy>> {
    let status: OrderStatus = status.parse()?;
    Ok(Json(
        state
            .policies
            .update(&ctx, status, payload.allow_edit_requests)?,
    ))
}
