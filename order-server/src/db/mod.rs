//! Persistence
//!
//! A single embedded redb database holds every document table. See [`store`]
//! for the table layout and isolation notes.

pub mod store;

pub use store::{
    AUDIT_TABLE, EXPENSE_AUTH_REQUESTS_TABLE, EXPENSE_ORDERS_TABLE, JsonTable,
    ORDER_EDIT_REQUESTS_TABLE, ORDER_STATUS_CHANGE_REQUESTS_TABLE, ORDERS_TABLE, POLICIES_TABLE,
    QUOTES_TABLE, SEQUENCES_TABLE, DocReader, StorageError, StorageResult, Store, get_json, put_json,
    scan_json,
};
