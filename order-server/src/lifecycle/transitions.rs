//! Static transition tables
//!
//! Each lifecycle is a table of `from → [to…]` edges. A status with no
//! outgoing edges is terminal.

use shared::models::{ExpenseOrderStatus, OrderStatus, QuoteStatus};

/// Outgoing edges per status
#[derive(Debug)]
pub struct TransitionTable<S: 'static> {
    edges: &'static [(S, &'static [S])],
}

impl<S: Copy + Eq> TransitionTable<S> {
    pub const fn new(edges: &'static [(S, &'static [S])]) -> Self {
        Self { edges }
    }

    /// Statuses reachable in one step from `from`
    pub fn allowed(&self, from: S) -> &'static [S] {
        self.edges
            .iter()
            .find(|(status, _)| *status == from)
            .map(|(_, targets)| *targets)
            .unwrap_or(&[])
    }

    pub fn permits(&self, from: S, to: S) -> bool {
        self.allowed(from).contains(&to)
    }

    pub fn is_terminal(&self, status: S) -> bool {
        self.allowed(status).is_empty()
    }

    pub fn edges(&self) -> impl Iterator<Item = (S, &'static [S])> + '_ {
        self.edges.iter().copied()
    }
}

pub static ORDER_TRANSITIONS: TransitionTable<OrderStatus> = TransitionTable::new(&[
    (
        OrderStatus::Draft,
        &[OrderStatus::Confirmed, OrderStatus::Cancelled],
    ),
    (
        OrderStatus::Confirmed,
        &[OrderStatus::InProduction, OrderStatus::Cancelled],
    ),
    (
        OrderStatus::InProduction,
        &[OrderStatus::Ready, OrderStatus::Cancelled],
    ),
    (
        OrderStatus::Ready,
        &[
            OrderStatus::Delivered,
            OrderStatus::DeliveredOnCredit,
            OrderStatus::Paid,
            OrderStatus::Cancelled,
        ],
    ),
]);

pub static EXPENSE_TRANSITIONS: TransitionTable<ExpenseOrderStatus> = TransitionTable::new(&[
    (
        ExpenseOrderStatus::Draft,
        &[ExpenseOrderStatus::Created, ExpenseOrderStatus::Cancelled],
    ),
    (
        ExpenseOrderStatus::Created,
        &[ExpenseOrderStatus::Authorized, ExpenseOrderStatus::Cancelled],
    ),
    (
        ExpenseOrderStatus::Authorized,
        &[ExpenseOrderStatus::Paid, ExpenseOrderStatus::Cancelled],
    ),
]);

pub static QUOTE_TRANSITIONS: TransitionTable<QuoteStatus> = TransitionTable::new(&[
    (QuoteStatus::Draft, &[QuoteStatus::Sent, QuoteStatus::Cancelled]),
    (
        QuoteStatus::Sent,
        &[
            QuoteStatus::Accepted,
            QuoteStatus::Rejected,
            QuoteStatus::Cancelled,
        ],
    ),
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_terminal_states() {
        for status in [
            OrderStatus::Delivered,
            OrderStatus::DeliveredOnCredit,
            OrderStatus::Paid,
            OrderStatus::Cancelled,
        ] {
            assert!(ORDER_TRANSITIONS.is_terminal(status), "{status}");
        }
        assert!(!ORDER_TRANSITIONS.is_terminal(OrderStatus::Ready));
    }

    #[test]
    fn test_every_live_status_can_cancel() {
        for (from, _) in ORDER_TRANSITIONS.edges() {
            assert!(ORDER_TRANSITIONS.permits(from, OrderStatus::Cancelled));
        }
        for (from, _) in EXPENSE_TRANSITIONS.edges() {
            assert!(EXPENSE_TRANSITIONS.permits(from, ExpenseOrderStatus::Cancelled));
        }
    }

    #[test]
    fn test_no_skipping_steps() {
        assert!(!ORDER_TRANSITIONS.permits(OrderStatus::Draft, OrderStatus::Ready));
        assert!(!EXPENSE_TRANSITIONS.permits(ExpenseOrderStatus::Draft, ExpenseOrderStatus::Paid));
        assert!(QUOTE_TRANSITIONS.permits(QuoteStatus::Sent, QuoteStatus::Accepted));
        assert!(QUOTE_TRANSITIONS.is_terminal(QuoteStatus::Accepted));
    }
}
