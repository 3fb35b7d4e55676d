//! Domain layer for the audit trail backend.
//!
//! This crate contains:
//! - Audit record models and actor/request context types
//! - The entity descriptor registry and `Auditable` trait
//! - Sanitization, change-set extraction and record normalization
//! - The `AuditStore` seam used by the recorder

pub mod error;
pub mod models;
pub mod registry;
pub mod services;

pub use error::AuditError;
