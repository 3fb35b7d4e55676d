//! Entity-lifecycle interceptor.
//!
//! The persistence layer of the host application invokes these hooks after
//! each mutation. Two attachment styles share the same downstream path:
//! first-party types implement [`Auditable`] and use the generic methods;
//! vendor-owned types go through the `*_dyn` methods keyed by type name and
//! resolved via the registry fallback.
//!
//! Fail-open is the load-bearing property here: nothing that happens while
//! building or writing a record may disturb the mutation that triggered it.
//! Snapshot errors are logged and discarded at this boundary; sink errors are
//! handled inside the recorder.

use domain::models::{AttributeMap, AuditContext, AuditRecord};
use domain::registry::Auditable;
use domain::services::{changed_keys, extract_change_set, normalize_lifecycle, sanitize};
use domain::services::normalize::LifecycleEvent;
use domain::AuditError;

use crate::recorder::AuditRecorder;

/// Lifecycle hooks that emit audit records.
#[derive(Clone)]
pub struct AuditObserver {
    recorder: AuditRecorder,
}

impl AuditObserver {
    /// Create an observer writing through the given recorder.
    pub fn new(recorder: AuditRecorder) -> Self {
        Self { recorder }
    }

    /// Hook for a newly created entity. Always emits one record.
    pub async fn created<E: Auditable>(&self, entity: &E, ctx: &AuditContext) {
        match entity.audit_snapshot() {
            Ok(snapshot) => {
                let _ = self
                    .created_dyn(E::TYPE_NAME, entity.audit_id(), snapshot, ctx)
                    .await;
            }
            Err(e) => discard(E::TYPE_NAME, entity.audit_id(), "create", &e),
        }
    }

    /// Hook for an updated entity. `before` is the attribute snapshot captured
    /// prior to the mutation. Emits nothing when no semantic field changed.
    pub async fn updated<E: Auditable>(
        &self,
        entity: &E,
        before: AttributeMap,
        ctx: &AuditContext,
    ) {
        match entity.audit_snapshot() {
            Ok(after) => {
                let _ = self
                    .updated_dyn(E::TYPE_NAME, entity.audit_id(), before, after, ctx)
                    .await;
            }
            Err(e) => discard(E::TYPE_NAME, entity.audit_id(), "update", &e),
        }
    }

    /// Hook for a deleted entity. Always emits one record.
    pub async fn deleted<E: Auditable>(&self, entity: &E, ctx: &AuditContext) {
        match entity.audit_snapshot() {
            Ok(snapshot) => {
                let _ = self
                    .deleted_dyn(E::TYPE_NAME, entity.audit_id(), snapshot, ctx)
                    .await;
            }
            Err(e) => discard(E::TYPE_NAME, entity.audit_id(), "delete", &e),
        }
    }

    /// String-keyed create hook for externally-registered types.
    pub async fn created_dyn(
        &self,
        type_name: &str,
        entity_id: Option<String>,
        snapshot: AttributeMap,
        ctx: &AuditContext,
    ) -> Option<AuditRecord> {
        let after = sanitize(&snapshot);
        let record = normalize_lifecycle(
            LifecycleEvent::Created,
            type_name,
            entity_id,
            &snapshot,
            None,
            Some(after),
            ctx,
        );
        self.recorder.record(record).await
    }

    /// String-keyed update hook for externally-registered types.
    pub async fn updated_dyn(
        &self,
        type_name: &str,
        entity_id: Option<String>,
        before: AttributeMap,
        after: AttributeMap,
        ctx: &AuditContext,
    ) -> Option<AuditRecord> {
        let changed = changed_keys(&before, &after);
        let (before_payload, after_payload) = extract_change_set(&before, &after, &changed)?;

        let record = normalize_lifecycle(
            LifecycleEvent::Updated,
            type_name,
            entity_id,
            &after,
            Some(before_payload),
            Some(after_payload),
            ctx,
        );
        self.recorder.record(record).await
    }

    /// String-keyed delete hook for externally-registered types.
    pub async fn deleted_dyn(
        &self,
        type_name: &str,
        entity_id: Option<String>,
        snapshot: AttributeMap,
        ctx: &AuditContext,
    ) -> Option<AuditRecord> {
        let before = sanitize(&snapshot);
        let record = normalize_lifecycle(
            LifecycleEvent::Deleted,
            type_name,
            entity_id,
            &snapshot,
            Some(before),
            None,
            ctx,
        );
        self.recorder.record(record).await
    }
}

/// The single log-and-discard point for interceptor failures.
fn discard(type_name: &str, entity_id: Option<String>, action: &str, error: &AuditError) {
    tracing::error!(
        target: "audit",
        entity_type = type_name,
        entity_id = entity_id.as_deref().unwrap_or(""),
        action,
        error = %error,
        "audit emission failed"
    );
}
