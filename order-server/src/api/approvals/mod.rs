//! Approval API
//!
//! # Routes
//!
//! | Path | Method | Action |
//! |------|--------|--------|
//! | /api/orders/{id}/edit-requests | POST / GET | request / history |
//! | /api/orders/{id}/status-change-requests | POST / GET | request / history |
//! | /api/expense-orders/{id}/authorization-requests | POST / GET | request / history |
//! | {inbox} | GET | pending requests, oldest first |
//! | {inbox}/{request_id} | GET | fetch |
//! | {inbox}/{request_id}/approve | PUT | approve (privileged) |
//! | {inbox}/{request_id}/reject | PUT | reject (privileged) |
//!
//! Inboxes: `/api/order-edit-requests`, `/api/order-status-change-requests`,
//! `/api/expense-authorization-requests`.

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::approval::{
    ApprovalResource, ApprovalWorkflow, ExpenseAuthorization, OrderEdit, OrderStatusChange,
};
use crate::core::ServerState;

/// Binds an approval resource to its URLs and workflow
pub trait ApprovalRoute: ApprovalResource + Sized {
    /// Prefix of the resource the requests point at
    const RESOURCE_PATH: &'static str;
    /// Sub-collection under a resource
    const SEGMENT: &'static str;
    /// Reviewer inbox
    const INBOX_PATH: &'static str;

    fn workflow(state: &ServerState) -> &ApprovalWorkflow<Self>;
}

impl ApprovalRoute for OrderEdit {
    const RESOURCE_PATH: &'static str = "/api/orders";
    const SEGMENT: &'static str = "edit-requests";
    const INBOX_PATH: &'static str = "/api/order-edit-requests";

    fn workflow(state: &ServerState) -> &ApprovalWorkflow<Self> {
        &state.order_edits
    }
}

impl ApprovalRoute for OrderStatusChange {
    const RESOURCE_PATH: &'static str = "/api/orders";
    const SEGMENT: &'static str = "status-change-requests";
    const INBOX_PATH: &'static str = "/api/order-status-change-requests";

    fn workflow(state: &ServerState) -> &ApprovalWorkflow<Self> {
        &state.status_changes
    }
}

impl ApprovalRoute for ExpenseAuthorization {
    const RESOURCE_PATH: &'static str = "/api/expense-orders";
    const SEGMENT: &'static str = "authorization-requests";
    const INBOX_PATH: &'static str = "/api/expense-authorization-requests";

    fn workflow(state: &ServerState) -> &ApprovalWorkflow<Self> {
        &state.expense_auths
    }
}

pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(routes::<OrderEdit>())
        .merge(routes::<OrderStatusChange>())
        .merge(routes::<ExpenseAuthorization>())
}

fn routes<R: ApprovalRoute>() -> Router<ServerState> {
    let per_resource = format!("{}/{{id}}/{}", R::RESOURCE_PATH, R::SEGMENT);
    let inbox = Router::new()
        .route("/", get(handler::list_pending::<R>))
        .route("/{request_id}", get(handler::get_by_id::<R>))
        .route("/{request_id}/approve", put(handler::approve::<R>))
        .route("/{request_id}/reject", put(handler::reject::<R>));

    Router::new()
        .route(
            &per_resource,
            get(handler::list_for_resource::<R>).post(handler::request::<R>),
        )
        .nest(R::INBOX_PATH, inbox)
}
