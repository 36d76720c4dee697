//! Aggregate API (orders, expense-orders, quotes)
//!
//! # Routes (per resource prefix)
//!
//! | Path | Method | Action |
//! |------|--------|--------|
//! | / | GET | list (`?status=`) |
//! | / | POST | create |
//! | /{id} | GET | fetch |
//! | /{id} | PUT | update header |
//! | /{id}/status | PUT | change status |
//! | /{id}/items | POST | add item |
//! | /{id}/items/{item_id} | PUT / DELETE | update / remove item |
//! | /{id}/discounts | POST | add discount |
//! | /{id}/discounts/{discount_id} | DELETE | remove discount |
//! | /{id}/payments | POST | record payment |
//! | /api/quotes/{id}/convert | POST | quote → order |

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use shared::models::{ExpenseOrderStatus, OrderStatus, QuoteStatus};

use crate::core::ServerState;
use crate::lifecycle::LifecycleStatus;
use crate::orders::AggregateService;

/// Binds a lifecycle to its URL prefix and service
pub trait AggregateRoute: LifecycleStatus {
    const PATH: &'static str;

    fn service(state: &ServerState) -> &AggregateService<Self>;

    fn extra_routes() -> Router<ServerState> {
        Router::new()
    }
}

impl AggregateRoute for OrderStatus {
    const PATH: &'static str = "/api/orders";

    fn service(state: &ServerState) -> &AggregateService<Self> {
        &state.orders
    }
}

impl AggregateRoute for ExpenseOrderStatus {
    const PATH: &'static str = "/api/expense-orders";

    fn service(state: &ServerState) -> &AggregateService<Self> {
        &state.expense_orders
    }
}

impl AggregateRoute for QuoteStatus {
    const PATH: &'static str = "/api/quotes";

    fn service(state: &ServerState) -> &AggregateService<Self> {
        &state.quotes
    }

    fn extra_routes() -> Router<ServerState> {
        Router::new().route("/{id}/convert", post(handler::convert_quote))
    }
}

pub fn router<S: AggregateRoute>() -> Router<ServerState> {
    Router::new().nest(S::PATH, routes::<S>().merge(S::extra_routes()))
}

fn routes<S: AggregateRoute>() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list::<S>).post(handler::create::<S>))
        .route(
            "/{id}",
            get(handler::get_by_id::<S>).put(handler::update_header::<S>),
        )
        .route("/{id}/status", put(handler::change_status::<S>))
        .route("/{id}/items", post(handler::add_item::<S>))
        .route(
            "/{id}/items/{item_id}",
            put(handler::update_item::<S>).delete(handler::remove_item::<S>),
        )
        .route("/{id}/discounts", post(handler::add_discount::<S>))
        .route(
            "/{id}/discounts/{discount_id}",
            delete(handler::remove_discount::<S>),
        )
        .route("/{id}/payments", post(handler::add_payment::<S>))
}
