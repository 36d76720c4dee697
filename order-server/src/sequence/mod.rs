//! Document numbering
//!
//! One row per [`DocumentType`] holds the prefix, the year and the last number
//! issued. Issuing reads and updates that row inside a write transaction, so
//! concurrent callers always receive distinct, contiguous numbers. A number
//! issued for a new calendar year resets the counter to 1.

use shared::models::{DocumentType, Sequence, format_document_number};

use crate::db::{SEQUENCES_TABLE, Store, get_json, put_json};
use crate::utils::{AppError, AppResult};
use redb::WriteTransaction;

#[derive(Debug, Clone)]
pub struct SequenceGenerator {
    store: Store,
}

impl SequenceGenerator {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Issue the next number in its own transaction
    pub fn next(&self, document_type: DocumentType, prefix: &str, year: i32) -> AppResult<String> {
        let txn = self.store.begin_write()?;
        let number = Self::next_in(&txn, document_type, prefix, year)?;
        txn.commit()?;
        Ok(number)
    }

    /// Issue the next number inside the caller's transaction
    ///
    /// The number is only consumed if the caller commits.
    pub fn next_in(
        txn: &WriteTransaction,
        document_type: DocumentType,
        prefix: &str,
        year: i32,
    ) -> AppResult<String> {
        if prefix.trim().is_empty() {
            return Err(AppError::validation("sequence prefix must not be empty"));
        }

        let key = document_type.as_str();
        let row = match get_json::<Sequence>(txn, SEQUENCES_TABLE, key)? {
            None => Sequence {
                document_type,
                prefix: prefix.to_string(),
                year,
                last_number: 1,
            },
            Some(row) if row.year != year => {
                tracing::info!(
                    document_type = %document_type,
                    from = row.year,
                    to = year,
                    "Sequence year rolled over"
                );
                Sequence {
                    prefix: prefix.to_string(),
                    year,
                    last_number: 1,
                    ..row
                }
            }
            Some(row) => {
                let last_number = row.last_number.checked_add(1).ok_or_else(|| {
                    AppError::Conflict(format!("sequence {} exhausted for {}", key, year))
                })?;
                Sequence {
                    prefix: prefix.to_string(),
                    last_number,
                    ..row
                }
            }
        };
        put_json(txn, SEQUENCES_TABLE, key, &row)?;

        Ok(format_document_number(prefix, year, row.last_number))
    }

    /// Current row for a document type, if any number was ever issued
    pub fn current(&self, document_type: DocumentType) -> AppResult<Option<Sequence>> {
        Ok(self.store.read_json(SEQUENCES_TABLE, document_type.as_str())?)
    }

    pub fn list(&self) -> AppResult<Vec<Sequence>> {
        Ok(self.store.read_all_json(SEQUENCES_TABLE)?)
    }
}
