//! End-to-end flows across the aggregate services and approval workflows

mod common;

use common::{T0, admin, bob, d, item, server, two_items};
use order_server::AppError;
use order_server::approval::GrantSweeper;
use shared::models::{ApprovalStatus, DocumentType, ExpenseOrderStatus, OrderStatus, QuoteStatus};
use shared::request::{NewApprovalRequest, NewDiscount, NewPayment, ReviewDecision};
use shared::util::{MILLIS_PER_MINUTE, MILLIS_PER_SECOND};

fn discount(amount: &str) -> NewDiscount {
    NewDiscount {
        amount: d(amount),
        reason: Some("loyalty".into()),
    }
}

fn payment(amount: &str) -> NewPayment {
    NewPayment {
        amount: d(amount),
        method: Default::default(),
        date: None,
        reference: None,
    }
}

#[test]
fn order_totals_and_discount_cap() {
    let srv = server();
    let orders = &srv.state.orders;

    let order = orders.create(&bob(), two_items()).unwrap();
    assert_eq!(order.subtotal, d("130"));
    assert_eq!(order.tax, d("24.70"));
    assert_eq!(order.total, d("154.70"));
    assert_eq!(order.balance, d("154.70"));

    orders
        .change_status(&bob(), &order.id, OrderStatus::Confirmed)
        .unwrap();

    let order = orders.add_discount(&admin(), &order.id, discount("20")).unwrap();
    assert_eq!(order.total, d("134.70"));
    assert_eq!(order.balance, d("134.70"));

    let err = orders
        .add_discount(&admin(), &order.id, discount("120"))
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(orders.get(&order.id).unwrap().total, d("134.70"));
}

#[test]
fn delivered_on_credit_needs_approval() {
    let srv = server();
    let orders = &srv.state.orders;
    let approvals = &srv.state.status_changes;

    let order = orders.create(&bob(), two_items()).unwrap();
    for status in [
        OrderStatus::Confirmed,
        OrderStatus::InProduction,
        OrderStatus::Ready,
    ] {
        orders.change_status(&bob(), &order.id, status).unwrap();
    }

    let err = orders
        .change_status(&bob(), &order.id, OrderStatus::DeliveredOnCredit)
        .unwrap_err();
    assert!(matches!(err, AppError::AuthorizationRequired(_)));

    let request = approvals
        .request(
            &bob(),
            &order.id,
            NewApprovalRequest {
                justification: Some("Regular customer, pays monthly".into()),
                target: Some("DELIVERED_ON_CREDIT".into()),
            },
        )
        .unwrap();

    // Still pending: no grant yet
    let err = orders
        .change_status(&bob(), &order.id, OrderStatus::DeliveredOnCredit)
        .unwrap_err();
    assert!(matches!(err, AppError::AuthorizationRequired(_)));

    approvals
        .approve(&admin(), &request.id, ReviewDecision::default())
        .unwrap();
    let order = orders
        .change_status(&bob(), &order.id, OrderStatus::DeliveredOnCredit)
        .unwrap();
    assert_eq!(order.status, OrderStatus::DeliveredOnCredit);
    assert_eq!(order.balance, d("154.70"));
    assert_eq!(
        approvals.get(&request.id).unwrap().status,
        ApprovalStatus::Approved
    );
}

#[test]
fn duplicate_pending_request_returns_existing_id() {
    let srv = server();
    let orders = &srv.state.orders;
    let edits = &srv.state.order_edits;

    let order = orders.create(&bob(), two_items()).unwrap();
    orders
        .change_status(&bob(), &order.id, OrderStatus::Confirmed)
        .unwrap();

    let first = edits
        .request(&bob(), &order.id, NewApprovalRequest::default())
        .unwrap();
    match edits
        .request(&bob(), &order.id, NewApprovalRequest::default())
        .unwrap_err()
    {
        AppError::DuplicatePending { existing_id } => assert_eq!(existing_id, first.id),
        other => panic!("unexpected error: {other:?}"),
    }

    // Another requester is not a duplicate
    edits
        .request(
            &order_server::RequestContext::new("carol"),
            &order.id,
            NewApprovalRequest::default(),
        )
        .unwrap();
    assert_eq!(edits.list_pending().unwrap().len(), 2);
}

#[test]
fn review_happens_exactly_once() {
    let srv = server();
    let orders = &srv.state.orders;
    let edits = &srv.state.order_edits;

    let order = orders.create(&bob(), two_items()).unwrap();
    orders
        .change_status(&bob(), &order.id, OrderStatus::Confirmed)
        .unwrap();
    let request = edits
        .request(&bob(), &order.id, NewApprovalRequest::default())
        .unwrap();

    let err = edits
        .approve(&bob(), &request.id, ReviewDecision::default())
        .unwrap_err();
    assert!(matches!(err, AppError::AuthorizationRequired(_)));

    edits
        .reject(&admin(), &request.id, ReviewDecision::default())
        .unwrap();
    let err = edits
        .approve(&admin(), &request.id, ReviewDecision::default())
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    let err = edits
        .reject(&admin(), &request.id, ReviewDecision::default())
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(
        edits.get(&request.id).unwrap().status,
        ApprovalStatus::Rejected
    );
}

#[test]
fn edit_grant_window_and_expiry() {
    let srv = server();
    let orders = &srv.state.orders;
    let edits = &srv.state.order_edits;

    let order = orders.create(&bob(), two_items()).unwrap();
    orders
        .change_status(&bob(), &order.id, OrderStatus::Confirmed)
        .unwrap();
    let request = edits
        .request(&bob(), &order.id, NewApprovalRequest::default())
        .unwrap();
    edits
        .approve(&admin(), &request.id, ReviewDecision::default())
        .unwrap();

    srv.clock
        .set(T0 + 4 * MILLIS_PER_MINUTE + 59 * MILLIS_PER_SECOND);
    assert!(edits.has_active_grant(&order.id, "bob", None).unwrap());
    // The grant is reusable inside its window
    orders
        .add_item(&bob(), &order.id, item("Screws", 10, "0.25"))
        .unwrap();
    orders.add_discount(&bob(), &order.id, discount("5")).unwrap();

    srv.clock.set(T0 + 5 * MILLIS_PER_MINUTE + MILLIS_PER_SECOND);
    assert!(!edits.has_active_grant(&order.id, "bob", None).unwrap());
    let err = orders
        .add_item(&bob(), &order.id, item("Late", 1, "1"))
        .unwrap_err();
    assert!(matches!(err, AppError::AuthorizationRequired(_)));

    let outcome = edits
        .expire_due(T0 + 5 * MILLIS_PER_MINUTE + MILLIS_PER_SECOND)
        .unwrap();
    assert_eq!(outcome.affected, 1);
    assert_eq!(edits.get(&request.id).unwrap().status, ApprovalStatus::Expired);
}

#[test]
fn expense_authorization_flow() {
    let srv = server();
    let expenses = &srv.state.expense_orders;
    let auths = &srv.state.expense_auths;

    let expense = expenses.create(&bob(), two_items()).unwrap();
    assert!(expense.number.starts_with("EXP-2026-"));

    // Only CREATED expense orders can ask for authorization
    let err = auths
        .request(&bob(), &expense.id, NewApprovalRequest::default())
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    expenses
        .change_status(&bob(), &expense.id, ExpenseOrderStatus::Created)
        .unwrap();
    let request = auths
        .request(&bob(), &expense.id, NewApprovalRequest::default())
        .unwrap();
    assert_eq!(request.target.as_deref(), Some("AUTHORIZED"));
    auths
        .approve(&admin(), &request.id, ReviewDecision::default())
        .unwrap();

    let expense = expenses
        .change_status(&bob(), &expense.id, ExpenseOrderStatus::Authorized)
        .unwrap();
    assert_eq!(expense.status, ExpenseOrderStatus::Authorized);

    // Paying out needs a settled balance and a privileged actor
    let err = expenses
        .change_status(&admin(), &expense.id, ExpenseOrderStatus::Paid)
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    expenses
        .add_payment(&bob(), &expense.id, payment("154.70"))
        .unwrap();
    let expense = expenses
        .change_status(&admin(), &expense.id, ExpenseOrderStatus::Paid)
        .unwrap();
    assert_eq!(expense.status, ExpenseOrderStatus::Paid);
}

#[test]
fn quote_converts_to_order() {
    let srv = server();
    let quotes = &srv.state.quotes;
    let orders = &srv.state.orders;

    let quote = quotes.create(&bob(), two_items()).unwrap();
    assert_eq!(quote.number, "COT-2026-0001");
    for status in [QuoteStatus::Sent, QuoteStatus::Accepted] {
        quotes.change_status(&bob(), &quote.id, status).unwrap();
    }

    let order = orders.convert_quote(&bob(), &quote.id).unwrap();
    assert_eq!(order.number, "ORD-2026-0001");
    assert_eq!(order.total, quote.total);
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.source_id.as_deref(), Some(quote.id.as_str()));
}

#[test]
fn sequence_rollover_through_service() {
    let srv = server();
    let sequences = &srv.state.sequences;

    for _ in 0..41 {
        sequences.next(DocumentType::Order, "ORD", 2026).unwrap();
    }
    assert_eq!(
        sequences.next(DocumentType::Order, "ORD", 2027).unwrap(),
        "ORD-2027-0001"
    );
    assert_eq!(
        sequences.next(DocumentType::WorkOrder, "OT", 2027).unwrap(),
        "OT-2027-0001"
    );
}

#[test]
fn expiry_scheduler_covers_every_workflow() {
    let srv = server();
    let scheduler = srv.state.expiry_scheduler();
    let report = scheduler.sweep_once();
    assert_eq!(report.failed_sweepers, 0);
    assert_eq!(srv.state.order_edits.name(), "order_edit");
}
