//! Financial invariants hold after any sequence of accepted mutations

mod common;

use common::{bob, item, server};
use order_server::finance::FinancialRecalculator;
use order_server::finance::money::round_money;
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::models::Order;
use shared::request::{NewAggregate, NewDiscount, NewPayment};

#[derive(Debug, Clone)]
enum Op {
    AddItem { quantity: i32, cents: i64 },
    Discount { cents: i64 },
    Pay { cents: i64 },
    RemoveFirstItem,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1..20i32, 1..50_000i64).prop_map(|(quantity, cents)| Op::AddItem { quantity, cents }),
        (1..20_000i64).prop_map(|cents| Op::Discount { cents }),
        (1..50_000i64).prop_map(|cents| Op::Pay { cents }),
        Just(Op::RemoveFirstItem),
    ]
}

fn assert_invariants(order: &Order) {
    let subtotal: Decimal = order.items.iter().map(|i| i.total).sum();
    let discounts: Decimal = order.discounts.iter().map(|d| d.amount).sum();
    let paid: Decimal = order.payments.iter().map(|p| p.amount).sum();

    assert_eq!(order.subtotal, subtotal);
    assert_eq!(order.tax, round_money(subtotal * order.tax_rate));
    assert_eq!(order.discount_amount, discounts);
    assert_eq!(order.total, order.subtotal + order.tax - order.discount_amount);
    assert_eq!(order.paid_amount, paid);
    assert_eq!(order.balance, order.total - order.paid_amount);
    assert!(order.discount_amount <= order.subtotal);
    assert!(order.paid_amount <= order.total);
    assert!(!order.items.is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn totals_stay_consistent(ops in prop::collection::vec(op(), 1..25)) {
        let srv = server();
        let orders = &srv.state.orders;
        let order = orders
            .create(
                &bob(),
                NewAggregate {
                    items: vec![item("Base", 1, "100")],
                    ..Default::default()
                },
            )
            .unwrap();
        let id = order.id;

        for op in ops {
            // Rejected mutations must leave the order untouched
            let before = orders.get(&id).unwrap();
            let result = match op {
                Op::AddItem { quantity, cents } => orders
                    .add_item(&bob(), &id, shared::request::NewItem {
                        description: "Part".into(),
                        quantity,
                        unit_price: Decimal::new(cents, 2),
                    })
                    .map(|_| ()),
                Op::Discount { cents } => orders
                    .add_discount(&bob(), &id, NewDiscount { amount: Decimal::new(cents, 2), reason: None })
                    .map(|_| ()),
                Op::Pay { cents } => orders
                    .add_payment(&bob(), &id, NewPayment {
                        amount: Decimal::new(cents, 2),
                        method: Default::default(),
                        date: None,
                        reference: None,
                    })
                    .map(|_| ()),
                Op::RemoveFirstItem => {
                    let first = before.items[0].id.clone();
                    orders.remove_item(&bob(), &id, &first).map(|_| ())
                }
            };

            let after = orders.get(&id).unwrap();
            if result.is_err() {
                prop_assert_eq!(&after, &before);
            }
            assert_invariants(&after);
        }
    }

    #[test]
    fn recalculation_is_idempotent(ops in prop::collection::vec(op(), 1..10)) {
        let srv = server();
        let orders = &srv.state.orders;
        let order = orders
            .create(&bob(), NewAggregate { items: vec![item("Base", 3, "33.33")], ..Default::default() })
            .unwrap();
        for op in ops {
            if let Op::AddItem { quantity, cents } = op {
                let _ = orders.add_item(&bob(), &order.id, shared::request::NewItem {
                    description: "Part".into(),
                    quantity,
                    unit_price: Decimal::new(cents, 2),
                });
            }
        }

        let stored = orders.get(&order.id).unwrap();
        let once = orders.recalculate(&order.id).unwrap();
        let twice = orders.recalculate(&order.id).unwrap();
        prop_assert_eq!(&once, &stored);
        prop_assert_eq!(&twice, &once);

        let mut in_memory = stored.clone();
        FinancialRecalculator::apply(&mut in_memory);
        prop_assert_eq!(in_memory, stored);
    }
}
