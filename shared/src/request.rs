//! Request payloads

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::PaymentMethod;

/// New line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub description: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// Partial line item update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemUpdate {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: Option<i32>,
    #[serde(default)]
    pub unit_price: Option<Decimal>,
}

/// Create an order / expense-order / quote
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewAggregate {
    /// Document date (Unix millis); defaults to now
    #[serde(default)]
    pub date: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub counterparty_id: Option<String>,
    /// Defaults to the configured rate
    #[serde(default)]
    pub tax_rate: Option<Decimal>,
    #[serde(default)]
    pub items: Vec<NewItem>,
}

/// Header update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderUpdate {
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub counterparty_id: Option<String>,
    #[serde(default)]
    pub tax_rate: Option<Decimal>,
}

/// Record a payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPayment {
    pub amount: Decimal,
    #[serde(default)]
    pub method: PaymentMethod,
    /// Payment date (Unix millis); defaults to now
    #[serde(default)]
    pub date: Option<i64>,
    #[serde(default)]
    pub reference: Option<String>,
}

/// Apply a discount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDiscount {
    pub amount: Decimal,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Status change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange<S> {
    pub status: S,
}

/// Open an approval request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewApprovalRequest {
    #[serde(default)]
    pub justification: Option<String>,
    /// Target status (status-change requests only)
    #[serde(default)]
    pub target: Option<String>,
}

/// Approve / reject an approval request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewDecision {
    #[serde(default)]
    pub notes: Option<String>,
}

/// Update an editable-status policy flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyUpdate {
    pub allow_edit_requests: bool,
}

/// Issue a document number
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NextNumberRequest {
    #[serde(default)]
    pub prefix: Option<String>,
    /// Defaults to the current year
    #[serde(default)]
    pub year: Option<i32>,
}

/// Issued document number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedNumber {
    pub number: String,
}
