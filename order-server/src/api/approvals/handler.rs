//! Approval API handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::ApprovalRequest;
use shared::request::{NewApprovalRequest, ReviewDecision};

use super::ApprovalRoute;
use crate::auth::RequestContext;
use crate::core::ServerState;
use crate::utils::AppResult;

/// POST {resource}/{id}/{segment}
pub async fn request<R: ApprovalRoute>(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(payload): Json<NewApprovalRequest>,
) -> AppResult<Json<ApprovalRequest>> {
    Ok(Json(R::workflow(&state).request(&ctx, &id, payload)?))
}

/// GET {resource}/{id}/{segment} - newest first
pub async fn list_for_resource<R: ApprovalRoute>(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<ApprovalRequest>>> {
    Ok(Json(R::workflow(&state).list_for_resource(&id)?))
}

/// GET {inbox}
pub async fn list_pending<R: ApprovalRoute>(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<ApprovalRequest>>> {
    Ok(Json(R::workflow(&state).list_pending()?))
}

/// GET {inbox}/{request_id}
pub async fn get_by_id<R: ApprovalRoute>(
    State(state): State<ServerState>,
    Path(request_id): Path<String>,
) -> AppResult<Json<ApprovalRequest>> {
    Ok(Json(R::workflow(&state).get(&request_id)?))
}

/// PUT {inbox}/{request_id}/approve
pub async fn approve<R: ApprovalRoute>(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(request_id): Path<String>,
    payload: Option<Json<ReviewDecision>>,
) -> AppResult<Json<ApprovalRequest>> {
    let decision = payload.map(|Json(d)| d).unwrap_or_default();
    Ok(Json(R::workflow(&state).approve(&ctx, &request_id, decision)?))
}

/// PUT {inbox}/{request_id}/reject
pub async fn reject<R: ApprovalRoute>(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(request_id): Path<String>,
    payload: Option<Json<ReviewDecision>>,
) -> AppResult<Json<ApprovalRequest>> {
    let decision = payload.map(|Json(d)| d).unwrap_or_default();
    Ok(Json(R::workflow(&state).reject(&ctx, &request_id, decision)?))
}
