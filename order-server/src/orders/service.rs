//! Aggregate service
//!
//! One generic service handles orders, expense-orders and quotes. Every
//! mutation runs as a single redb write transaction:
//!
//! ```text
//! load → guard (edit lock / transition) → mutate → recalculate → write → commit
//!                                                                          ↓
//!                                                          audit + notifications
//! ```
//!
//! Nothing is written when a guard fails; side effects are dispatched only
//! after a successful commit.

use redb::WriteTransaction;
use rust_decimal::Decimal;
use shared::models::{Aggregate, AuditAction, Discount, LineItem, Payment};
use shared::request::{HeaderUpdate, ItemUpdate, NewAggregate, NewDiscount, NewItem, NewPayment};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::approval::GrantCheck;
use crate::audit::AuditLogRequest;
use crate::auth::RequestContext;
use crate::db::{Store, get_json, put_json};
use crate::finance::FinancialRecalculator;
use crate::finance::money::{
    line_total, validate_amount, validate_item, validate_quantity, validate_tax_rate,
    validate_unit_price,
};
use crate::lifecycle::{LifecycleStatus, Transition, evaluate_transition};
use crate::sequence::SequenceGenerator;
use crate::services::{Clock, Notification, PostCommitHook, PrivilegeLookup, SideEffects};
use crate::utils::{AppError, AppResult};

/// Shared collaborators of the aggregate services
#[derive(Clone)]
pub struct ServiceDeps {
    pub store: Store,
    pub privileges: Arc<dyn PrivilegeLookup>,
    pub clock: Arc<dyn Clock>,
    pub effects: SideEffects,
}

/// How an edit got past the lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditAccess {
    /// Status is freely editable, or the operation is not lock-guarded
    Open,
    Privileged,
    /// Requester holds an approved edit request
    Grant,
}

pub struct AggregateService<S: LifecycleStatus> {
    pub(crate) deps: ServiceDeps,
    default_tax_rate: Decimal,
    edit_grants: Option<Arc<dyn GrantCheck>>,
    transition_grants: Option<Arc<dyn GrantCheck>>,
    _status: PhantomData<fn() -> S>,
}

impl<S: LifecycleStatus> std::fmt::Debug for AggregateService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregateService")
            .field("resource", &S::RESOURCE)
            .field("default_tax_rate", &self.default_tax_rate)
            .finish_non_exhaustive()
    }
}

impl<S: LifecycleStatus> AggregateService<S> {
    pub fn new(deps: ServiceDeps, default_tax_rate: Decimal) -> Self {
        Self {
            deps,
            default_tax_rate,
            edit_grants: None,
            transition_grants: None,
            _status: PhantomData,
        }
    }

    /// Grants that unlock edits on non-editable statuses
    pub fn with_edit_grants(mut self, grants: Arc<dyn GrantCheck>) -> Self {
        self.edit_grants = Some(grants);
        self
    }

    /// Grants that satisfy `PrivilegedOrGrant` transition guards
    pub fn with_transition_grants(mut self, grants: Arc<dyn GrantCheck>) -> Self {
        self.transition_grants = Some(grants);
        self
    }

    fn now(&self) -> i64 {
        self.deps.clock.now_millis()
    }

    fn not_found(id: &str) -> AppError {
        AppError::not_found(format!("{} {}", S::RESOURCE, id))
    }

    pub(crate) fn load_in(&self, txn: &WriteTransaction, id: &str) -> AppResult<Aggregate<S>> {
        get_json(txn, S::TABLE, id)?.ok_or_else(|| Self::not_found(id))
    }

    pub(crate) fn audit_hook(
        &self,
        action: AuditAction,
        actor_id: &str,
        before: Option<&Aggregate<S>>,
        after: &Aggregate<S>,
    ) -> PostCommitHook {
        PostCommitHook::Audit(AuditLogRequest::new(
            action,
            S::RESOURCE,
            &after.id,
            actor_id,
            before,
            Some(after),
            self.now(),
        ))
    }

    // ========== Queries ==========

    pub fn get(&self, id: &str) -> AppResult<Aggregate<S>> {
        self.deps
            .store
            .read_json(S::TABLE, id)?
            .ok_or_else(|| Self::not_found(id))
    }

    /// All aggregates, newest first, optionally filtered by status
    pub fn list(&self, status: Option<S>) -> AppResult<Vec<Aggregate<S>>> {
        let mut all: Vec<Aggregate<S>> = self.deps.store.read_all_json(S::TABLE)?;
        if let Some(status) = status {
            all.retain(|a| a.status == status);
        }
        all.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.number.cmp(&a.number))
        });
        Ok(all)
    }

    // ========== Creation ==========

    /// Create a new aggregate in its initial status with at least one item
    pub fn create(&self, ctx: &RequestContext, input: NewAggregate) -> AppResult<Aggregate<S>> {
        if input.items.is_empty() {
            return Err(AppError::validation(format!(
                "{} needs at least one item",
                S::RESOURCE
            )));
        }
        for item in &input.items {
            validate_item(item)?;
        }
        let tax_rate = input.tax_rate.unwrap_or(self.default_tax_rate);
        validate_tax_rate(tax_rate)?;

        let now = self.now();
        let txn = self.deps.store.begin_write()?;
        let date = input.date.unwrap_or(now);
        let number = SequenceGenerator::next_in(
            &txn,
            S::DOCUMENT_TYPE,
            S::DOCUMENT_TYPE.default_prefix(),
            shared::util::year_of_millis(date),
        )?;

        let mut aggregate = Aggregate::new(
            uuid::Uuid::new_v4().to_string(),
            number,
            S::INITIAL,
            tax_rate,
            ctx.actor_id.clone(),
            now,
        );
        aggregate.date = date;
        aggregate.notes = input.notes.filter(|n| !n.trim().is_empty());
        aggregate.counterparty_id = input.counterparty_id;
        for item in input.items {
            let sort_order = aggregate.next_sort_order();
            aggregate.items.push(new_line_item(item, sort_order));
        }
        FinancialRecalculator::apply(&mut aggregate);
        put_json(&txn, S::TABLE, &aggregate.id, &aggregate)?;
        txn.commit()?;

        tracing::info!(
            resource = S::RESOURCE,
            id = %aggregate.id,
            number = %aggregate.number,
            actor = %ctx.actor_id,
            total = %aggregate.total,
            "Aggregate created"
        );
        self.deps.effects.dispatch(vec![self.audit_hook(
            AuditAction::Create,
            &ctx.actor_id,
            None,
            &aggregate,
        )]);

        Ok(aggregate)
    }

    // ========== Edit lock ==========

    /// Terminal aggregates are closed to everyone; other non-editable
    /// statuses need privilege or a live edit grant.
    fn ensure_editable(
        &self,
        txn: &WriteTransaction,
        ctx: &RequestContext,
        aggregate: &Aggregate<S>,
    ) -> AppResult<EditAccess> {
        if aggregate.status.is_terminal() {
            return Err(AppError::validation(format!(
                "{} {} is closed ({})",
                S::RESOURCE,
                aggregate.number,
                aggregate.status
            )));
        }
        if aggregate.status.is_editable() {
            return Ok(EditAccess::Open);
        }
        if self.deps.privileges.is_privileged(&ctx.actor_id) {
            return Ok(EditAccess::Privileged);
        }
        if let Some(grants) = &self.edit_grants
            && grants.has_active_grant_in(txn, &aggregate.id, &ctx.actor_id, None)?
        {
            return Ok(EditAccess::Grant);
        }
        Err(AppError::authorization_required(format!(
            "{} {} is locked in status {}; request edit permission first",
            S::RESOURCE,
            aggregate.number,
            aggregate.status
        )))
    }

    /// Run `f` against the aggregate inside one transaction, then recalculate
    /// and persist it
    fn mutate<F>(&self, ctx: &RequestContext, id: &str, op: &'static str, f: F) -> AppResult<Aggregate<S>>
    where
        F: FnOnce(&WriteTransaction, &mut Aggregate<S>) -> AppResult<EditAccess>,
    {
        let txn = self.deps.store.begin_write()?;
        let before = self.load_in(&txn, id)?;
        let mut aggregate = before.clone();

        let access = f(&txn, &mut aggregate)?;
        FinancialRecalculator::apply(&mut aggregate);
        FinancialRecalculator::ensure_consistent(&aggregate)?;
        aggregate.updated_at = self.now();

        put_json(&txn, S::TABLE, id, &aggregate)?;
        txn.commit()?;

        if access == EditAccess::Grant
            && let Some(grants) = &self.edit_grants
        {
            grants.consume(id, &ctx.actor_id, None);
        }
        tracing::info!(
            resource = S::RESOURCE,
            id = %id,
            op,
            actor = %ctx.actor_id,
            access = ?access,
            balance = %aggregate.balance,
            "Aggregate updated"
        );
        self.deps.effects.dispatch(vec![self.audit_hook(
            AuditAction::Update,
            &ctx.actor_id,
            Some(&before),
            &aggregate,
        )]);

        Ok(aggregate)
    }

    // ========== Items ==========

    pub fn add_item(&self, ctx: &RequestContext, id: &str, item: NewItem) -> AppResult<Aggregate<S>> {
        validate_item(&item)?;
        self.mutate(ctx, id, "add_item", |txn, aggregate| {
            let access = self.ensure_editable(txn, ctx, aggregate)?;
            let sort_order = aggregate.next_sort_order();
            aggregate.items.push(new_line_item(item, sort_order));
            Ok(access)
        })
    }

    pub fn update_item(
        &self,
        ctx: &RequestContext,
        id: &str,
        item_id: &str,
        changes: ItemUpdate,
    ) -> AppResult<Aggregate<S>> {
        if let Some(description) = &changes.description
            && description.trim().is_empty()
        {
            return Err(AppError::validation("item description must not be empty"));
        }
        if let Some(quantity) = changes.quantity {
            validate_quantity(quantity)?;
        }
        if let Some(unit_price) = changes.unit_price {
            validate_unit_price(unit_price)?;
        }

        self.mutate(ctx, id, "update_item", |txn, aggregate| {
            if aggregate.item(item_id).is_none() {
                return Err(AppError::not_found(format!("item {}", item_id)));
            }
            let access = self.ensure_editable(txn, ctx, aggregate)?;
            if let Some(item) = aggregate.item_mut(item_id) {
                if let Some(description) = changes.description {
                    item.description = description.trim().to_string();
                }
                if let Some(quantity) = changes.quantity {
                    item.quantity = quantity;
                }
                if let Some(unit_price) = changes.unit_price {
                    item.unit_price = unit_price;
                }
            }
            Ok(access)
        })
    }

    /// Remove an item; the last remaining item can never be removed
    pub fn remove_item(&self, ctx: &RequestContext, id: &str, item_id: &str) -> AppResult<Aggregate<S>> {
        self.mutate(ctx, id, "remove_item", |txn, aggregate| {
            if aggregate.items.len() <= 1 {
                return Err(AppError::validation(format!(
                    "cannot remove the last item of {} {}",
                    S::RESOURCE,
                    aggregate.number
                )));
            }
            if aggregate.item(item_id).is_none() {
                return Err(AppError::not_found(format!("item {}", item_id)));
            }
            let access = self.ensure_editable(txn, ctx, aggregate)?;
            aggregate.items.retain(|i| i.id != item_id);
            Ok(access)
        })
    }

    // ========== Discounts ==========

    pub fn add_discount(
        &self,
        ctx: &RequestContext,
        id: &str,
        discount: NewDiscount,
    ) -> AppResult<Aggregate<S>> {
        validate_amount(discount.amount, "discount amount")?;
        let now = self.now();
        self.mutate(ctx, id, "add_discount", |txn, aggregate| {
            let access = self.ensure_editable(txn, ctx, aggregate)?;
            FinancialRecalculator::ensure_discount_fits(aggregate, discount.amount)?;
            aggregate.discounts.push(Discount {
                id: uuid::Uuid::new_v4().to_string(),
                amount: discount.amount,
                reason: discount.reason.filter(|r| !r.trim().is_empty()),
                applied_by: ctx.actor_id.clone(),
                applied_at: now,
            });
            Ok(access)
        })
    }

    pub fn remove_discount(
        &self,
        ctx: &RequestContext,
        id: &str,
        discount_id: &str,
    ) -> AppResult<Aggregate<S>> {
        self.mutate(ctx, id, "remove_discount", |txn, aggregate| {
            if !aggregate.discounts.iter().any(|d| d.id == discount_id) {
                return Err(AppError::not_found(format!("discount {}", discount_id)));
            }
            let access = self.ensure_editable(txn, ctx, aggregate)?;
            aggregate.discounts.retain(|d| d.id != discount_id);
            Ok(access)
        })
    }

    // ========== Payments ==========

    /// Record a payment; never more than the outstanding balance
    pub fn add_payment(
        &self,
        ctx: &RequestContext,
        id: &str,
        payment: NewPayment,
    ) -> AppResult<Aggregate<S>> {
        validate_amount(payment.amount, "payment amount")?;
        let now = self.now();
        self.mutate(ctx, id, "add_payment", |_txn, aggregate| {
            if !aggregate.status.accepts_payments() {
                return Err(AppError::validation(format!(
                    "{} {} does not accept payments in status {}",
                    S::RESOURCE,
                    aggregate.number,
                    aggregate.status
                )));
            }
            FinancialRecalculator::ensure_payment_fits(aggregate, payment.amount)?;
            aggregate.payments.push(Payment {
                id: uuid::Uuid::new_v4().to_string(),
                amount: payment.amount,
                method: payment.method,
                date: payment.date.unwrap_or(now),
                reference: payment.reference.filter(|r| !r.trim().is_empty()),
                recorded_by: ctx.actor_id.clone(),
            });
            Ok(EditAccess::Open)
        })
    }

    // ========== Header ==========

    pub fn update_header(
        &self,
        ctx: &RequestContext,
        id: &str,
        changes: HeaderUpdate,
    ) -> AppResult<Aggregate<S>> {
        if let Some(rate) = changes.tax_rate {
            validate_tax_rate(rate)?;
        }
        self.mutate(ctx, id, "update_header", |txn, aggregate| {
            let access = self.ensure_editable(txn, ctx, aggregate)?;
            if let Some(notes) = changes.notes {
                aggregate.notes = Some(notes).filter(|n| !n.trim().is_empty());
            }
            if let Some(counterparty_id) = changes.counterparty_id {
                aggregate.counterparty_id = Some(counterparty_id).filter(|c| !c.is_empty());
            }
            if let Some(rate) = changes.tax_rate {
                aggregate.tax_rate = rate;
            }
            Ok(access)
        })
    }

    // ========== Status ==========

    /// Move to `to`; a request for the current status is a no-op
    pub fn change_status(&self, ctx: &RequestContext, id: &str, to: S) -> AppResult<Aggregate<S>> {
        let txn = self.deps.store.begin_write()?;
        let before = self.load_in(&txn, id)?;
        let privileged = self.deps.privileges.is_privileged(&ctx.actor_id);
        let target = to.wire();

        let transition = evaluate_transition(&before, to, privileged, || {
            match &self.transition_grants {
                Some(grants) => grants.has_active_grant_in(&txn, id, &ctx.actor_id, Some(target)),
                None => Ok(false),
            }
        })?;
        let via_grant = match transition {
            Transition::Unchanged => return Ok(before),
            Transition::Apply { via_grant } => via_grant,
        };

        let mut aggregate = before.clone();
        aggregate.status = to;
        aggregate.updated_at = self.now();
        put_json(&txn, S::TABLE, id, &aggregate)?;
        txn.commit()?;

        if via_grant && let Some(grants) = &self.transition_grants {
            grants.consume(id, &ctx.actor_id, Some(target));
        }
        tracing::info!(
            resource = S::RESOURCE,
            id = %id,
            from = %before.status,
            to = %to,
            actor = %ctx.actor_id,
            via_grant,
            "Status changed"
        );

        let mut hooks = vec![self.audit_hook(
            AuditAction::Update,
            &ctx.actor_id,
            Some(&before),
            &aggregate,
        )];
        if aggregate.created_by != ctx.actor_id {
            hooks.push(PostCommitHook::notify(
                aggregate.created_by.clone(),
                Notification::new(
                    format!("{}.status_changed", S::RESOURCE),
                    format!("{} {}", aggregate.number, to),
                    format!(
                        "{} moved {} from {} to {}",
                        ctx.actor_id, aggregate.number, before.status, to
                    ),
                )
                .related_to(aggregate.id.clone()),
            ));
        }
        self.deps.effects.dispatch(hooks);

        Ok(aggregate)
    }

    /// Recompute and persist derived totals
    pub fn recalculate(&self, id: &str) -> AppResult<Aggregate<S>> {
        let txn = self.deps.store.begin_write()?;
        let aggregate = FinancialRecalculator::recalculate::<S>(&txn, id)?;
        txn.commit()?;
        Ok(aggregate)
    }
}

pub(crate) fn new_line_item(item: NewItem, sort_order: i32) -> LineItem {
    LineItem {
        id: uuid::Uuid::new_v4().to_string(),
        description: item.description.trim().to_string(),
        quantity: item.quantity,
        unit_price: item.unit_price,
        total: line_total(item.quantity, item.unit_price),
        sort_order,
    }
}
