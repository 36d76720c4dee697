use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use shared::models::AuditEntry;

use crate::core::ServerState;
use crate::utils::AppResult;

const DEFAULT_LIMIT: usize = 100;
const MAX_LIMIT: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// GET /api/audit
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<AuditQuery>,
) -> AppResult<Json<Vec<AuditEntry>>> {
    let entries = match query.resource_id.as_deref().filter(|id| !id.is_empty()) {
        Some(resource_id) => state.audit.query_by_resource(resource_id)?,
        None => state
            .audit
            .query_last(query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT))?,
    };
    Ok(Json(entries))
}
