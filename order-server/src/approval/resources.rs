//! The three approval workflows

use shared::models::{
    ApprovalKind, EditableStatusPolicy, ExpenseOrder, ExpenseOrderStatus, Order, OrderStatus,
};

use super::resource::{ApprovalResource, GrantSemantics, LiveResource};
use crate::db::{
    DocReader, EXPENSE_AUTH_REQUESTS_TABLE, EXPENSE_ORDERS_TABLE, JsonTable,
    ORDER_EDIT_REQUESTS_TABLE, ORDER_STATUS_CHANGE_REQUESTS_TABLE, ORDERS_TABLE, POLICIES_TABLE,
};
use crate::lifecycle::{Authority, LifecycleStatus};
use crate::utils::{AppError, AppResult};

fn load_order(reader: &impl DocReader, order_id: &str) -> AppResult<LiveResource> {
    let order: Order = reader
        .get_doc(ORDERS_TABLE, order_id)?
        .ok_or_else(|| AppError::not_found(format!("order {}", order_id)))?;
    Ok(LiveResource {
        id: order.id,
        number: order.number,
        status: order.status.as_str().to_string(),
        owner_id: order.created_by,
    })
}

/// Temporary permission to edit a locked order
#[derive(Debug, Clone)]
pub struct OrderEdit {
    window_millis: i64,
}

impl OrderEdit {
    pub fn new(window_millis: i64) -> Self {
        Self { window_millis }
    }
}

impl ApprovalResource for OrderEdit {
    const KIND: ApprovalKind = ApprovalKind::OrderEdit;
    const TABLE: JsonTable = ORDER_EDIT_REQUESTS_TABLE;
    const LABEL: &'static str = "order edit";

    fn semantics(&self) -> GrantSemantics {
        GrantSemantics::TimeBoxed {
            window_millis: self.window_millis,
        }
    }

    fn load(&self, reader: &impl DocReader, resource_id: &str) -> AppResult<LiveResource> {
        load_order(reader, resource_id)
    }

    fn accept_request(
        &self,
        reader: &impl DocReader,
        resource: &LiveResource,
        target: Option<&str>,
    ) -> AppResult<Option<String>> {
        if target.is_some() {
            return Err(AppError::Invalid("edit requests do not take a target".into()));
        }
        let status: OrderStatus = resource.status.parse()?;
        if status.is_editable() {
            return Err(AppError::validation(format!(
                "order {} is {} and can be edited directly",
                resource.number, status
            )));
        }
        if status.is_terminal() {
            return Err(AppError::validation(format!(
                "order {} is closed ({})",
                resource.number, status
            )));
        }
        let policy = reader
            .get_doc::<EditableStatusPolicy>(POLICIES_TABLE, status.as_str())?
            .unwrap_or_else(|| EditableStatusPolicy::default_for(status));
        if !policy.allow_edit_requests {
            return Err(AppError::validation(format!(
                "orders in status {} do not accept edit requests",
                status
            )));
        }
        Ok(None)
    }
}

/// Permission to move an order to a status that needs approval
#[derive(Debug, Clone, Default)]
pub struct OrderStatusChange;

impl ApprovalResource for OrderStatusChange {
    const KIND: ApprovalKind = ApprovalKind::OrderStatusChange;
    const TABLE: JsonTable = ORDER_STATUS_CHANGE_REQUESTS_TABLE;
    const LABEL: &'static str = "order status change";

    fn semantics(&self) -> GrantSemantics {
        GrantSemantics::OneShotByTarget
    }

    fn load(&self, reader: &impl DocReader, resource_id: &str) -> AppResult<LiveResource> {
        load_order(reader, resource_id)
    }

    fn accept_request(
        &self,
        _reader: &impl DocReader,
        resource: &LiveResource,
        target: Option<&str>,
    ) -> AppResult<Option<String>> {
        let target = target.ok_or_else(|| AppError::validation("target status is required"))?;
        let to: OrderStatus = target.parse()?;
        let from: OrderStatus = resource.status.parse()?;

        let table = OrderStatus::transitions();
        if !table.permits(from, to) {
            return Err(AppError::invalid_transition(from, to, table.allowed(from)));
        }
        if OrderStatus::guard(to).authority != Authority::PrivilegedOrGrant {
            return Err(AppError::validation(format!(
                "moving an order to {} does not take an approval request",
                to
            )));
        }
        Ok(Some(to.as_str().to_string()))
    }
}

/// Permission to authorize an expense-order
#[derive(Debug, Clone, Default)]
pub struct ExpenseAuthorization;

impl ApprovalResource for ExpenseAuthorization {
    const KIND: ApprovalKind = ApprovalKind::ExpenseAuthorization;
    const TABLE: JsonTable = EXPENSE_AUTH_REQUESTS_TABLE;
    const LABEL: &'static str = "expense authorization";

    fn semantics(&self) -> GrantSemantics {
        GrantSemantics::OneShotByTarget
    }

    fn load(&self, reader: &impl DocReader, resource_id: &str) -> AppResult<LiveResource> {
        let expense: ExpenseOrder = reader
            .get_doc(EXPENSE_ORDERS_TABLE, resource_id)?
            .ok_or_else(|| AppError::not_found(format!("expense_order {}", resource_id)))?;
        Ok(LiveResource {
            id: expense.id,
            number: expense.number,
            status: expense.status.as_str().to_string(),
            owner_id: expense.created_by,
        })
    }

    fn accept_request(
        &self,
        _reader: &impl DocReader,
        resource: &LiveResource,
        target: Option<&str>,
    ) -> AppResult<Option<String>> {
        let authorized = ExpenseOrderStatus::Authorized.as_str();
        if let Some(t) = target
            && t != authorized
        {
            return Err(AppError::validation(format!(
                "expense authorization can only target {}, got {}",
                authorized, t
            )));
        }
        let status: ExpenseOrderStatus = resource.status.parse()?;
        if status != ExpenseOrderStatus::Created {
            return Err(AppError::validation(format!(
                "expense order {} must be {} to request authorization (is {})",
                resource.number,
                ExpenseOrderStatus::Created,
                status
            )));
        }
        Ok(Some(authorized.to_string()))
    }
}
