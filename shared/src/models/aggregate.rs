//! Aggregate shape shared by orders, expense-orders and quotes
//!
//! An aggregate is a header plus owned collections of items, payments and
//! discounts. The financial fields are derived and rewritten by the server
//! after every mutation of those collections:
//!
//! ```text
//! subtotal        = Σ item.total
//! tax             = round(subtotal × tax_rate, 2)
//! discount_amount = Σ discount.amount
//! total           = subtotal + tax − discount_amount
//! paid_amount     = Σ payment.amount
//! balance         = total − paid_amount
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::status::{ExpenseOrderStatus, OrderStatus, QuoteStatus};

/// Line item; `total = quantity × unit_price`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    pub description: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total: Decimal,
    pub sort_order: i32,
}

/// Payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Transfer,
    Check,
    Other,
}

/// Payment received (or made, for expense-orders)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub amount: Decimal,
    pub method: PaymentMethod,
    /// Payment date (Unix millis)
    pub date: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub recorded_by: String,
}

/// Flat discount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    pub id: String,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub applied_by: String,
    pub applied_at: i64,
}

/// Order / expense-order / quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate<S> {
    pub id: String,
    /// Human-readable document number, e.g. `ORD-2026-0042`
    pub number: String,
    /// Document date (Unix millis)
    pub date: i64,
    pub status: S,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Client (orders, quotes) or supplier (expense-orders)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterparty_id: Option<String>,
    /// Aggregate this one was derived from (order converted from a quote)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,

    // === Financials (derived) ===
    pub tax_rate: Decimal,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub discount_amount: Decimal,
    pub total: Decimal,
    pub paid_amount: Decimal,
    pub balance: Decimal,

    // === Owned collections ===
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub discounts: Vec<Discount>,

    pub created_by: String,
    pub created_at: i64,
    pub updated_at: i64,
}

pub type Order = Aggregate<OrderStatus>;
pub type ExpenseOrder = Aggregate<ExpenseOrderStatus>;
pub type Quote = Aggregate<QuoteStatus>;

impl<S> Aggregate<S> {
    /// Empty aggregate with zeroed financials
    pub fn new(
        id: String,
        number: String,
        status: S,
        tax_rate: Decimal,
        created_by: String,
        now: i64,
    ) -> Self {
        Self {
            id,
            number,
            date: now,
            status,
            notes: None,
            counterparty_id: None,
            source_id: None,
            tax_rate,
            subtotal: Decimal::ZERO,
            tax: Decimal::ZERO,
            discount_amount: Decimal::ZERO,
            total: Decimal::ZERO,
            paid_amount: Decimal::ZERO,
            balance: Decimal::ZERO,
            items: Vec::new(),
            payments: Vec::new(),
            discounts: Vec::new(),
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn item(&self, item_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub fn item_mut(&mut self, item_id: &str) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|i| i.id == item_id)
    }

    /// Sort order for an appended item
    pub fn next_sort_order(&self) -> i32 {
        self.items
            .iter()
            .map(|i| i.sort_order)
            .max()
            .map_or(0, |max| max + 1)
    }

    /// Whether the balance is fully settled
    pub fn is_settled(&self) -> bool {
        self.balance.is_zero()
    }
}
