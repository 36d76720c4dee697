//! Aggregate lifecycles
//!
//! [`LifecycleStatus`] ties a status enum to its storage table, document
//! numbering, transition table and guards. Orders, expense-orders and quotes
//! share one generic service driven by this trait.

pub mod machine;
pub mod transitions;

use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::models::{DocumentType, ExpenseOrderStatus, OrderStatus, ParseStatusError, QuoteStatus};
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::str::FromStr;

use crate::db::{EXPENSE_ORDERS_TABLE, JsonTable, ORDERS_TABLE, QUOTES_TABLE};

pub use machine::{Transition, evaluate_transition};
pub use transitions::{EXPENSE_TRANSITIONS, ORDER_TRANSITIONS, QUOTE_TRANSITIONS, TransitionTable};

/// Who may perform a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authority {
    Anyone,
    Privileged,
    /// Privileged user, or a requester holding an approved request
    PrivilegedOrGrant,
}

/// Extra conditions on entering a status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionGuard {
    /// Balance must be exactly zero
    pub requires_settled: bool,
    pub authority: Authority,
}

impl TransitionGuard {
    pub const OPEN: Self = Self {
        requires_settled: false,
        authority: Authority::Anyone,
    };
}

pub trait LifecycleStatus:
    Copy
    + Eq
    + Hash
    + Debug
    + Display
    + FromStr<Err = ParseStatusError>
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// Resource name used in audit entries and messages
    const RESOURCE: &'static str;
    const DOCUMENT_TYPE: DocumentType;
    const TABLE: JsonTable;
    const INITIAL: Self;

    fn transitions() -> &'static TransitionTable<Self>;

    fn wire(self) -> &'static str;

    /// Freely editable without privilege or grant
    fn is_editable(self) -> bool;

    fn accepts_payments(self) -> bool;

    fn guard(_target: Self) -> TransitionGuard {
        TransitionGuard::OPEN
    }

    fn is_terminal(self) -> bool {
        Self::transitions().is_terminal(self)
    }
}

impl LifecycleStatus for OrderStatus {
    const RESOURCE: &'static str = "order";
    const DOCUMENT_TYPE: DocumentType = DocumentType::Order;
    const TABLE: JsonTable = ORDERS_TABLE;
    const INITIAL: Self = OrderStatus::Draft;

    fn transitions() -> &'static TransitionTable<Self> {
        &ORDER_TRANSITIONS
    }

    fn wire(self) -> &'static str {
        self.as_str()
    }

    fn is_editable(self) -> bool {
        self == OrderStatus::Draft
    }

    // DELIVERED_ON_CREDIT is terminal for the workflow but still collects payments
    fn accepts_payments(self) -> bool {
        !matches!(
            self,
            OrderStatus::Cancelled | OrderStatus::Paid | OrderStatus::Delivered
        )
    }

    fn guard(target: Self) -> TransitionGuard {
        match target {
            OrderStatus::Paid => TransitionGuard {
                requires_settled: true,
                authority: Authority::Privileged,
            },
            OrderStatus::Delivered => TransitionGuard {
                requires_settled: true,
                authority: Authority::Anyone,
            },
            OrderStatus::DeliveredOnCredit => TransitionGuard {
                requires_settled: false,
                authority: Authority::PrivilegedOrGrant,
            },
            _ => TransitionGuard::OPEN,
        }
    }
}

impl LifecycleStatus for ExpenseOrderStatus {
    const RESOURCE: &'static str = "expense_order";
    const DOCUMENT_TYPE: DocumentType = DocumentType::Expense;
    const TABLE: JsonTable = EXPENSE_ORDERS_TABLE;
    const INITIAL: Self = ExpenseOrderStatus::Draft;

    fn transitions() -> &'static TransitionTable<Self> {
        &EXPENSE_TRANSITIONS
    }

    fn wire(self) -> &'static str {
        self.as_str()
    }

    fn is_editable(self) -> bool {
        matches!(self, ExpenseOrderStatus::Draft | ExpenseOrderStatus::Created)
    }

    fn accepts_payments(self) -> bool {
        !matches!(self, ExpenseOrderStatus::Cancelled | ExpenseOrderStatus::Paid)
    }

    fn guard(target: Self) -> TransitionGuard {
        match target {
            ExpenseOrderStatus::Authorized => TransitionGuard {
                requires_settled: false,
                authority: Authority::PrivilegedOrGrant,
            },
            ExpenseOrderStatus::Paid => TransitionGuard {
                requires_settled: true,
                authority: Authority::Privileged,
            },
            _ => TransitionGuard::OPEN,
        }
    }
}

impl LifecycleStatus for QuoteStatus {
    const RESOURCE: &'static str = "quote";
    const DOCUMENT_TYPE: DocumentType = DocumentType::Quote;
    const TABLE: JsonTable = QUOTES_TABLE;
    const INITIAL: Self = QuoteStatus::Draft;

    fn transitions() -> &'static TransitionTable<Self> {
        &QUOTE_TRANSITIONS
    }

    fn wire(self) -> &'static str {
        self.as_str()
    }

    fn is_editable(self) -> bool {
        self == QuoteStatus::Draft
    }

    fn accepts_payments(self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payments_accepted() {
        assert!(OrderStatus::Ready.accepts_payments());
        assert!(OrderStatus::DeliveredOnCredit.accepts_payments());
        assert!(!OrderStatus::Delivered.accepts_payments());
        assert!(!OrderStatus::Paid.accepts_payments());
        assert!(ExpenseOrderStatus::Authorized.accepts_payments());
        assert!(!ExpenseOrderStatus::Cancelled.accepts_payments());
        assert!(QuoteStatus::ALL.iter().all(|s| !s.accepts_payments()));
    }

    #[test]
    fn test_guards() {
        let paid = OrderStatus::guard(OrderStatus::Paid);
        assert!(paid.requires_settled);
        assert_eq!(paid.authority, Authority::Privileged);
        assert_eq!(
            OrderStatus::guard(OrderStatus::DeliveredOnCredit).authority,
            Authority::PrivilegedOrGrant
        );
        assert_eq!(OrderStatus::guard(OrderStatus::Confirmed), TransitionGuard::OPEN);
        for status in QuoteStatus::ALL {
            assert_eq!(QuoteStatus::guard(*status), TransitionGuard::OPEN);
        }
    }

    #[test]
    fn test_editable_and_terminal() {
        assert!(OrderStatus::Draft.is_editable());
        assert!(!OrderStatus::Confirmed.is_editable());
        assert!(ExpenseOrderStatus::Created.is_editable());
        assert!(OrderStatus::DeliveredOnCredit.is_terminal());
        assert!(!QuoteStatus::Sent.is_terminal());
    }
}
