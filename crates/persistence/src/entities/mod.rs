//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod audit_record;

pub use audit_record::AuditRecordEntity;
