//! Derived financial fields
//!
//! ```text
//! subtotal        = Σ item.total
//! tax             = round(subtotal × tax_rate, 2)
//! discount_amount = Σ discount.amount
//! total           = subtotal + tax − discount_amount
//! paid_amount     = Σ payment.amount
//! balance         = total − paid_amount
//! ```
//!
//! The recalculation is deterministic and idempotent. It always runs inside
//! the same write transaction as the mutation that triggered it.

pub mod money;

use redb::WriteTransaction;
use rust_decimal::Decimal;
use shared::models::{Aggregate, Discount, LineItem, Payment};

use crate::db::{get_json, put_json};
use crate::lifecycle::LifecycleStatus;
use crate::utils::{AppError, AppResult};
use money::{line_total, round_money};

/// Derived totals of an aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub discount_amount: Decimal,
    pub total: Decimal,
    pub paid_amount: Decimal,
    pub balance: Decimal,
}

impl Totals {
    pub fn compute(
        items: &[LineItem],
        discounts: &[Discount],
        payments: &[Payment],
        tax_rate: Decimal,
    ) -> Self {
        let subtotal: Decimal = items.iter().map(|i| i.total).sum();
        let tax = round_money(subtotal * tax_rate);
        let discount_amount: Decimal = discounts.iter().map(|d| d.amount).sum();
        let total = subtotal + tax - discount_amount;
        let paid_amount: Decimal = payments.iter().map(|p| p.amount).sum();

        Self {
            subtotal,
            tax,
            discount_amount,
            total,
            paid_amount,
            balance: total - paid_amount,
        }
    }

    pub fn of<S>(aggregate: &Aggregate<S>) -> Self {
        Self::compute(
            &aggregate.items,
            &aggregate.discounts,
            &aggregate.payments,
            aggregate.tax_rate,
        )
    }
}

/// Recomputes and persists derived totals
pub struct FinancialRecalculator;

impl FinancialRecalculator {
    /// Reload `aggregate_id`, recompute its totals and write it back once
    pub fn recalculate<S: LifecycleStatus>(
        txn: &WriteTransaction,
        aggregate_id: &str,
    ) -> AppResult<Aggregate<S>> {
        let mut aggregate: Aggregate<S> = get_json(txn, S::TABLE, aggregate_id)?
            .ok_or_else(|| AppError::not_found(format!("{} {}", S::RESOURCE, aggregate_id)))?;
        Self::apply(&mut aggregate);
        put_json(txn, S::TABLE, aggregate_id, &aggregate)?;
        Ok(aggregate)
    }

    /// Recompute item totals and derived fields in memory
    pub fn apply<S>(aggregate: &mut Aggregate<S>) {
        for item in &mut aggregate.items {
            item.total = line_total(item.quantity, item.unit_price);
        }
        let totals = Totals::of(aggregate);
        aggregate.subtotal = totals.subtotal;
        aggregate.tax = totals.tax;
        aggregate.discount_amount = totals.discount_amount;
        aggregate.total = totals.total;
        aggregate.paid_amount = totals.paid_amount;
        aggregate.balance = totals.balance;
    }

    /// Reject a discount that would push total discounts past the subtotal
    pub fn ensure_discount_fits<S>(aggregate: &Aggregate<S>, additional: Decimal) -> AppResult<()> {
        let requested = aggregate.discount_amount + additional;
        if requested > aggregate.subtotal {
            return Err(AppError::validation(format!(
                "discounts would total {} but may not exceed the subtotal of {}",
                requested, aggregate.subtotal
            )));
        }
        Ok(())
    }

    /// Reject a payment larger than the outstanding balance
    pub fn ensure_payment_fits<S>(aggregate: &Aggregate<S>, amount: Decimal) -> AppResult<()> {
        if amount > aggregate.balance {
            return Err(AppError::validation(format!(
                "payment of {} exceeds the outstanding balance of {}",
                amount, aggregate.balance
            )));
        }
        Ok(())
    }

    /// Post-mutation check: discounts within subtotal and nothing overpaid
    pub fn ensure_consistent<S>(aggregate: &Aggregate<S>) -> AppResult<()> {
        if aggregate.discount_amount > aggregate.subtotal {
            return Err(AppError::validation(format!(
                "change would leave discounts of {} above the subtotal of {}",
                aggregate.discount_amount, aggregate.subtotal
            )));
        }
        if aggregate.balance.is_sign_negative() && !aggregate.balance.is_zero() {
            return Err(AppError::validation(format!(
                "change would leave {} overpaid by {}",
                aggregate.number, -aggregate.balance
            )));
        }
        Ok(())
    }
}
