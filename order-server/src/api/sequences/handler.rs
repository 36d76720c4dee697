//! Document sequence handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{DocumentType, Sequence};
use shared::request::{IssuedNumber, NextNumberRequest};

use crate::auth::RequestContext;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// GET /api/sequences
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Sequence>>> {
    Ok(Json(state.sequences.list()?))
}

/// GET /api/sequences/{type}
pub async fn get_by_type(
    State(state): State<ServerState>,
    Path(document_type): Path<String>,
) -> AppResult<Json<Sequence>> {
    let document_type: DocumentType = document_type.parse()?;
    let sequence = state
        .sequences
        .current(document_type)?
        .ok_or_else(|| AppError::not_found(format!("sequence {}", document_type)))?;
    Ok(Json(sequence))
}

/// POST /api/sequences/{type}/next
pub async fn next(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(document_type): Path<String>,
    payload: Option<Json<NextNumberRequest>>,
) -> AppResult<Json<IssuedNumber>> {
    let document_type: DocumentType = document_type.parse()?;
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let prefix = request
        .prefix
        .unwrap_or_else(|| document_type.default_prefix().to_string());
    let year = request
        .year
        .unwrap_or_else(|| shared::util::year_of_millis(state.clock.now_millis()));

    let number = state.sequences.next(document_type, &prefix, year)?;
    tracing::info!(
        document_type = %document_type,
        number = %number,
        actor = %ctx.actor_id,
        "Document number issued"
    );
    Ok(Json(IssuedNumber { number }))
}
