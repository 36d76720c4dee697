//! redb-backed document store
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `sequences` | document type | `Sequence` | Year-scoped numbering |
//! | `orders` | order id | `Order` | Sales orders |
//! | `expense_orders` | expense-order id | `ExpenseOrder` | Purchase/expense orders |
//! | `quotes` | quote id | `Quote` | Quotes |
//! | `editable_status_policies` | status | `EditableStatusPolicy` | Edit-request policy |
//! | `order_edit_requests` | request id | `ApprovalRequest` | Order edit approvals |
//! | `order_status_change_requests` | request id | `ApprovalRequest` | Status change approvals |
//! | `expense_auth_requests` | request id | `ApprovalRequest` | Expense authorizations |
//! | `audit_log` | entry id | `AuditEntry` | Append-only audit trail |
//!
//! # Isolation
//!
//! redb allows a single write transaction at a time; `begin_write` blocks until
//! the previous writer commits or drops. Every read-modify-write in the server
//! runs inside one write transaction, so concurrent callers are serialized and
//! never observe each other's partial state. Dropping a transaction without
//! committing rolls it back.

use redb::{
    Database, ReadTransaction, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// JSON document table: key = id, value = JSON bytes
pub type JsonTable = TableDefinition<'static, &'static str, &'static [u8]>;

pub const SEQUENCES_TABLE: JsonTable = TableDefinition::new("sequences");
pub const ORDERS_TABLE: JsonTable = TableDefinition::new("orders");
pub const EXPENSE_ORDERS_TABLE: JsonTable = TableDefinition::new("expense_orders");
pub const QUOTES_TABLE: JsonTable = TableDefinition::new("quotes");
pub const POLICIES_TABLE: JsonTable = TableDefinition::new("editable_status_policies");
pub const ORDER_EDIT_REQUESTS_TABLE: JsonTable = TableDefinition::new("order_edit_requests");
pub const ORDER_STATUS_CHANGE_REQUESTS_TABLE: JsonTable =
    TableDefinition::new("order_status_change_requests");
pub const EXPENSE_AUTH_REQUESTS_TABLE: JsonTable = TableDefinition::new("expense_auth_requests");

/// Audit log: key = monotonically increasing id, value = JSON-serialized AuditEntry
pub const AUDIT_TABLE: TableDefinition<'static, u64, &'static [u8]> =
    TableDefinition::new("audit_log");

const JSON_TABLES: &[JsonTable] = &[
    SEQUENCES_TABLE,
    ORDERS_TABLE,
    EXPENSE_ORDERS_TABLE,
    QUOTES_TABLE,
    POLICIES_TABLE,
    ORDER_EDIT_REQUESTS_TABLE,
    ORDER_STATUS_CHANGE_REQUESTS_TABLE,
    EXPENSE_AUTH_REQUESTS_TABLE,
];

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Shared handle to the embedded database
#[derive(Clone)]
pub struct Store {
    db: Arc<Database>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

impl Store {
    /// Open or create the database file at `path`
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::init(Database::create(path)?)
    }

    /// Open a throwaway in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            for table in JSON_TABLES {
                let _ = write_txn.open_table(*table)?;
            }
            let _ = write_txn.open_table(AUDIT_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction (blocks while another writer is active)
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Begin a read-only snapshot
    pub fn begin_read(&self) -> StorageResult<ReadTransaction> {
        Ok(self.db.begin_read()?)
    }

    /// Read one document outside any write transaction
    pub fn read_json<T: DeserializeOwned>(
        &self,
        table: JsonTable,
        key: &str,
    ) -> StorageResult<Option<T>> {
        self.begin_read()?.get_doc(table, key)
    }

    /// Read every document in a table
    pub fn read_all_json<T: DeserializeOwned>(&self, table: JsonTable) -> StorageResult<Vec<T>> {
        self.begin_read()?.scan_docs(table)
    }
}

// ========== Transaction helpers ==========

/// Document lookups shared by read and write transactions
pub trait DocReader {
    fn get_doc<T: DeserializeOwned>(&self, table: JsonTable, key: &str) -> StorageResult<Option<T>>;

    fn scan_docs<T: DeserializeOwned>(&self, table: JsonTable) -> StorageResult<Vec<T>>;
}

impl DocReader for WriteTransaction {
    fn get_doc<T: DeserializeOwned>(&self, table: JsonTable, key: &str) -> StorageResult<Option<T>> {
        let table = self.open_table(table)?;
        decode(&table, key)
    }

    fn scan_docs<T: DeserializeOwned>(&self, table: JsonTable) -> StorageResult<Vec<T>> {
        let table = self.open_table(table)?;
        decode_all(&table)
    }
}

impl DocReader for ReadTransaction {
    fn get_doc<T: DeserializeOwned>(&self, table: JsonTable, key: &str) -> StorageResult<Option<T>> {
        let table = self.open_table(table)?;
        decode(&table, key)
    }

    fn scan_docs<T: DeserializeOwned>(&self, table: JsonTable) -> StorageResult<Vec<T>> {
        let table = self.open_table(table)?;
        decode_all(&table)
    }
}

/// Load a document inside a write transaction
pub fn get_json<T: DeserializeOwned>(
    txn: &WriteTransaction,
    table: JsonTable,
    key: &str,
) -> StorageResult<Option<T>> {
    txn.get_doc(table, key)
}

/// Load every document of a table inside a write transaction
pub fn scan_json<T: DeserializeOwned>(
    txn: &WriteTransaction,
    table: JsonTable,
) -> StorageResult<Vec<T>> {
    txn.scan_docs(table)
}

/// Insert or replace a document inside a write transaction
pub fn put_json<T: Serialize>(
    txn: &WriteTransaction,
    table: JsonTable,
    key: &str,
    value: &T,
) -> StorageResult<()> {
    let mut table = txn.open_table(table)?;
    let bytes = serde_json::to_vec(value)?;
    table.insert(key, bytes.as_slice())?;
    Ok(())
}

fn decode<T: DeserializeOwned>(
    table: &impl ReadableTable<&'static str, &'static [u8]>,
    key: &str,
) -> StorageResult<Option<T>> {
    match table.get(key)? {
        Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
        None => Ok(None),
    }
}

fn decode_all<T: DeserializeOwned>(
    table: &impl ReadableTable<&'static str, &'static [u8]>,
) -> StorageResult<Vec<T>> {
    let mut out = Vec::new();
    for result in table.iter()? {
        let (_key, value) = result?;
        out.push(serde_json::from_slice(value.value())?);
    }
    Ok(out)
}
