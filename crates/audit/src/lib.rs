//! Audit pipeline service crate.
//!
//! Wires the domain building blocks into the running pipeline:
//! - [`recorder::AuditRecorder`]: dual-sink writer (structured store + log channel)
//! - [`observer::AuditObserver`]: entity-lifecycle interceptor
//! - [`events::AuditService`]: programmatic API for discrete events
//! - configuration loading and logging initialization
//!
//! Every path through this crate is fail-open: an audit failure is logged on
//! the `audit` diagnostic target and never reaches the business operation
//! that triggered it.

pub mod bootstrap;
pub mod config;
pub mod events;
pub mod logging;
pub mod observer;
pub mod recorder;

pub use bootstrap::{bootstrap, AuditPipeline};
pub use events::{AuditService, CrudEvent};
pub use observer::AuditObserver;
pub use recorder::AuditRecorder;

/// Tracing target shared by the audit log sink and its diagnostics.
pub const AUDIT_TARGET: &str = "audit";
