//! Durable recorder with dual-sink writes.
//!
//! Sink 1 is the structured store behind the [`AuditStore`] seam; sink 2 is a
//! single line on the dedicated `audit` tracing target, always attempted
//! regardless of the store outcome. Neither sink failure ever reaches the
//! caller, and nothing is retried.

use domain::models::{AuditRecord, AuditStatus, NewAuditRecord};
use domain::services::AuditStore;
use persistence::repositories::AuditRecordRepository;
use sqlx::PgPool;
use std::sync::Arc;

/// Best-effort writer for normalized audit records.
#[derive(Clone)]
pub struct AuditRecorder {
    store: Arc<dyn AuditStore>,
}

impl AuditRecorder {
    /// Create a recorder over any store implementation.
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    /// Create a recorder backed by the Postgres repository.
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(Arc::new(AuditRecordRepository::new(pool)))
    }

    /// Write the record to both sinks.
    ///
    /// Returns the stored record when the structured store accepted it, `None`
    /// when that sink failed. The log sink is attempted either way. Never
    /// returns an error.
    pub async fn record(&self, input: NewAuditRecord) -> Option<AuditRecord> {
        let stored = match self.store.append(input.clone()).await {
            Ok(record) => {
                metrics::counter!("audit_records_written_total").increment(1);
                Some(record)
            }
            Err(e) => {
                metrics::counter!("audit_store_failures_total").increment(1);
                tracing::error!(
                    target: "audit",
                    error = %e,
                    payload = %render(&input),
                    "failed to persist audit record"
                );
                None
            }
        };

        log_sink(&input);
        stored
    }
}

/// Emit the record on the dedicated log channel, severity selected from its
/// status.
fn log_sink(record: &NewAuditRecord) {
    let context = render(record);
    match record.status {
        AuditStatus::Error => {
            tracing::error!(target: "audit", "Audit [{}] {}", record.action, context);
        }
        AuditStatus::Warning => {
            tracing::warn!(target: "audit", "Audit [{}] {}", record.action, context);
        }
        AuditStatus::Success => {
            tracing::info!(target: "audit", "Audit [{}] {}", record.action, context);
        }
    }
}

fn render(record: &NewAuditRecord) -> String {
    serde_json::to_string(record).unwrap_or_else(|_| format!("{:?}", record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::{AuditAction, AuditContext};
    use domain::services::MemoryAuditStore;

    fn sample() -> NewAuditRecord {
        NewAuditRecord::event(
            "auth",
            AuditAction::Login,
            AuditStatus::Success,
            &AuditContext::system(),
        )
        .with_description("Login em Autenticação")
    }

    #[tokio::test]
    async fn test_record_returns_stored_record() {
        let store = Arc::new(MemoryAuditStore::new());
        let recorder = AuditRecorder::new(store.clone());

        let stored = recorder.record(sample()).await;

        assert!(stored.is_some());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_record_survives_store_failure() {
        let store = Arc::new(MemoryAuditStore::failing());
        let recorder = AuditRecorder::new(store.clone());

        let stored = recorder.record(sample()).await;

        assert!(stored.is_none());
        assert!(store.is_empty());
    }
}
