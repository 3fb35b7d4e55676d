//! Store seam for the durable recorder.
//!
//! The recorder writes through [`AuditStore`] so the Postgres repository and
//! the in-memory test store are interchangeable. The store is append-only by
//! construction: the trait exposes no update or delete.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{AuditRecord, NewAuditRecord};

/// Append-only destination for audit records.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Append one record, returning the stored row with its minted id and
    /// timestamp.
    async fn append(&self, input: NewAuditRecord) -> Result<AuditRecord, StoreError>;
}

/// In-memory audit store for development and testing.
///
/// Captures appended records for assertions and can simulate store failure to
/// exercise the fail-open path.
#[derive(Debug, Default)]
pub struct MemoryAuditStore {
    /// Whether append calls should fail.
    pub simulate_failure: bool,
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditStore {
    /// Create a working in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose appends always fail.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            records: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of all stored records, oldest first.
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().expect("store mutex poisoned").clone()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.lock().expect("store mutex poisoned").len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn append(&self, input: NewAuditRecord) -> Result<AuditRecord, StoreError> {
        if self.simulate_failure {
            return Err(StoreError::Unavailable("simulated store failure".to_string()));
        }

        let record = AuditRecord::from_new(Uuid::new_v4(), Utc::now(), input);
        self.records
            .lock()
            .expect("store mutex poisoned")
            .push(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuditAction, AuditContext, AuditStatus};

    fn sample_input() -> NewAuditRecord {
        NewAuditRecord::event(
            "noticia",
            AuditAction::Create,
            AuditStatus::Success,
            &AuditContext::system(),
        )
        .with_description("Criação em Notícia: Edital 04")
    }

    #[tokio::test]
    async fn test_memory_store_appends_and_mints_identity() {
        let store = MemoryAuditStore::new();

        let stored = store.append(sample_input()).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(stored.module, "noticia");
        assert_eq!(store.records()[0].id, stored.id);
    }

    #[tokio::test]
    async fn test_failing_store_returns_unavailable() {
        let store = MemoryAuditStore::failing();

        let result = store.append(sample_input()).await;

        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert!(store.is_empty());
    }
}
