//! Audit log persistence

use redb::ReadableTable;
use shared::models::AuditEntry;

use super::service::AuditLogRequest;
use crate::db::{AUDIT_TABLE, StorageResult, Store};

/// Append-only audit table
#[derive(Debug, Clone)]
pub struct AuditStorage {
    store: Store,
}

impl AuditStorage {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Append an entry under the next id
    pub fn append(&self, req: AuditLogRequest) -> StorageResult<AuditEntry> {
        let txn = self.store.begin_write()?;
        let entry = {
            let mut table = txn.open_table(AUDIT_TABLE)?;
            let id = table.last()?.map(|(k, _)| k.value() + 1).unwrap_or(1);
            let entry = AuditEntry {
                id,
                action: req.action,
                resource_type: req.resource_type,
                resource_id: req.resource_id,
                actor_id: req.actor_id,
                before: req.before,
                after: req.after,
                timestamp: req.timestamp,
            };
            let bytes = serde_json::to_vec(&entry)?;
            table.insert(id, bytes.as_slice())?;
            entry
        };
        txn.commit()?;
        Ok(entry)
    }

    /// Entries for one resource, oldest first
    pub fn query_by_resource(&self, resource_id: &str) -> StorageResult<Vec<AuditEntry>> {
        let read_txn = self.store.begin_read()?;
        let table = read_txn.open_table(AUDIT_TABLE)?;
        let mut out = Vec::new();
        for result in table.iter()? {
            let (_id, value) = result?;
            let entry: AuditEntry = serde_json::from_slice(value.value())?;
            if entry.resource_id == resource_id {
                out.push(entry);
            }
        }
        Ok(out)
    }

    /// Most recent `limit` entries, newest first
    pub fn query_last(&self, limit: usize) -> StorageResult<Vec<AuditEntry>> {
        let read_txn = self.store.begin_read()?;
        let table = read_txn.open_table(AUDIT_TABLE)?;
        let mut out = Vec::with_capacity(limit);
        for result in table.iter()?.rev().take(limit) {
            let (_id, value) = result?;
            out.push(serde_json::from_slice(value.value())?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::AuditAction;

    fn request(resource_id: &str) -> AuditLogRequest {
        AuditLogRequest::new::<serde_json::Value>(
            AuditAction::Update,
            "order",
            resource_id,
            "alice",
            None,
            None,
            42,
        )
    }

    #[test]
    fn test_ids_are_sequential() {
        let storage = AuditStorage::new(Store::open_in_memory().unwrap());
        assert_eq!(storage.append(request("a")).unwrap().id, 1);
        assert_eq!(storage.append(request("b")).unwrap().id, 2);
        assert_eq!(storage.append(request("a")).unwrap().id, 3);

        let for_a = storage.query_by_resource("a").unwrap();
        assert_eq!(for_a.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 3]);

        let last = storage.query_last(2).unwrap();
        assert_eq!(last.iter().map(|e| e.id).collect::<Vec<_>>(), vec![3, 2]);
    }
}
