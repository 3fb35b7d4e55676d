//! Domain services for the audit trail.
//!
//! Pure building blocks of the pipeline: sanitization, change-set extraction,
//! record normalization, plus the store seam the recorder writes through.

pub mod changeset;
pub mod normalize;
pub mod sanitize;
pub mod store;

pub use changeset::{changed_keys, extract_change_set, EXCLUDED_FIELDS};
pub use normalize::{action_label, describe, module_label, normalize_lifecycle, LifecycleEvent};
pub use sanitize::{is_sensitive, sanitize, SENSITIVE_FIELDS};
pub use store::{AuditStore, MemoryAuditStore};
