//! Aggregate API handlers
//!
//! Generic over the lifecycle; the route table picks the instantiation.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{Aggregate, Order};
use shared::request::{
    HeaderUpdate, ItemUpdate, NewAggregate, NewDiscount, NewItem, NewPayment, StatusChange,
};

use super::AggregateRoute;
use crate::auth::RequestContext;
use crate::core::ServerState;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub status: Option<String>,
}

/// GET {prefix} - list, newest first
pub async fn list<S: AggregateRoute>(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Aggregate<S>>>> {
    let status = query.status.as_deref().map(str::parse::<S>).transpose()?;
    Ok(Json(S::service(&state).list(status)?))
}

/// GET {prefix}/{id}
pub async fn get_by_id<S: AggregateRoute>(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Aggregate<S>>> {
    Ok(Json(S::service(&state).get(&id)?))
}

/// POST {prefix}
pub async fn create<S: AggregateRoute>(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Json(payload): Json<NewAggregate>,
) -> AppResult<Json<Aggregate<S>>> {
    Ok(Json(S::service(&state).create(&ctx, payload)?))
}

/// PUT {prefix}/{id}
pub async fn update_header<S: AggregateRoute>(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(payload): Json<HeaderUpdate>,
) -> AppResult<Json<Aggregate<S>>> {
    Ok(Json(S::service(&state).update_header(&ctx, &id, payload)?))
}

/// PUT {prefix}/{id}/status
pub async fn change_status<S: AggregateRoute>(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(payload): Json<StatusChange<String>>,
) -> AppResult<Json<Aggregate<S>>> {
    let target: S = payload.status.parse()?;
    Ok(Json(S::service(&state).change_status(&ctx, &id, target)?))
}

/// POST {prefix}/{id}/items
pub async fn add_item<S: AggregateRoute>(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(payload): Json<NewItem>,
) -> AppResult<Json<Aggregate<S>>> {
    Ok(Json(S::service(&state).add_item(&ctx, &id, payload)?))
}

/// PUT {prefix}/{id}/items/{item_id}
pub async fn update_item<S: AggregateRoute>(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path((id, item_id)): Path<(String, String)>,
    Json(payload): Json<ItemUpdate>,
) -> AppResult<Json<Aggregate<S>>> {
    Ok(Json(
        S::service(&state).update_item(&ctx, &id, &item_id, payload)?,
    ))
}

/// DELETE {prefix}/{id}/items/{item_id}
pub async fn remove_item<S: AggregateRoute>(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path((id, item_id)): Path<(String, String)>,
) -> AppResult<Json<Aggregate<S>>> {
    Ok(Json(S::service(&state).remove_item(&ctx, &id, &item_id)?))
}

/// POST {prefix}/{id}/discounts
pub async fn add_discount<S: AggregateRoute>(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(payload): Json<NewDiscount>,
) -> AppResult<Json<Aggregate<S>>> {
    Ok(Json(S::service(&state).add_discount(&ctx, &id, payload)?))
}

/// DELETE {prefix}/{id}/discounts/{discount_id}
pub async fn remove_discount<S: AggregateRoute>(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path((id, discount_id)): Path<(String, String)>,
) -> AppResult<Json<Aggregate<S>>> {
    Ok(Json(
        S::service(&state).remove_discount(&ctx, &id, &discount_id)?,
    ))
}

/// POST {prefix}/{id}/payments
pub async fn add_payment<S: AggregateRoute>(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(payload): Json<NewPayment>,
) -> AppResult<Json<Aggregate<S>>> {
    Ok(Json(S::service(&state).add_payment(&ctx, &id, payload)?))
}

/// POST /api/quotes/{id}/convert
pub async fn convert_quote(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.convert_quote(&ctx, &id)?))
}
