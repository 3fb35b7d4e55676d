//! Domain models for the audit trail.

pub mod audit_record;
pub mod context;

pub use audit_record::{
    AttributeMap, AuditAction, AuditRecord, AuditStatus, ListAuditRecordsQuery, NewAuditRecord,
};
pub use context::{Actor, AuditContext, RequestInfo};
