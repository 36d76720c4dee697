#![allow(dead_code)]

use order_server::core::{Config, ServerState};
use order_server::db::Store;
use order_server::services::ManualClock;
use order_server::RequestContext;
use rust_decimal::Decimal;
use shared::request::{NewAggregate, NewItem};
use std::sync::Arc;

/// 2026-09-21T...Z
pub const T0: i64 = 1_790_000_000_000;

pub struct TestServer {
    pub state: ServerState,
    pub clock: Arc<ManualClock>,
}

pub fn config() -> Config {
    let mut config = Config::with_overrides("./target/test-data", 0);
    config.admin_user_ids = vec!["admin".to_string()];
    config.default_tax_rate = Decimal::new(19, 2);
    config.edit_grant_minutes = 5;
    config.expiry_warning_secs = 60;
    config
}

/// Fully wired state on an in-memory store
///
/// The audit receiver is dropped; audit hooks then fail and are only logged.
pub fn server() -> TestServer {
    let clock = Arc::new(ManualClock::new(T0));
    let store = Store::open_in_memory().unwrap();
    let (state, _audit_rx) = ServerState::with_store(config(), store, clock.clone()).unwrap();
    TestServer { state, clock }
}

pub fn bob() -> RequestContext {
    RequestContext::new("bob")
}

pub fn admin() -> RequestContext {
    RequestContext::new("admin")
}

pub fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn item(description: &str, quantity: i32, unit_price: &str) -> NewItem {
    NewItem {
        description: description.to_string(),
        quantity,
        unit_price: d(unit_price),
    }
}

/// Two items: 2 × 50 + 1 × 30
pub fn two_items() -> NewAggregate {
    NewAggregate {
        items: vec![item("Oak shelf", 2, "50"), item("Brackets", 1, "30")],
        ..Default::default()
    }
}
