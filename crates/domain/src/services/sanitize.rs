//! Sensitive-field sanitization.
//!
//! Attribute payloads pass through here before reaching any sink. Denylisted
//! keys are removed outright, never masked, so no trace of the value survives
//! in stored or logged output.

use crate::models::AttributeMap;

/// Field names whose values must never appear in audit output.
pub const SENSITIVE_FIELDS: [&str; 8] = [
    "password",
    "password_confirmation",
    "current_password",
    "remember_token",
    "token",
    "api_token",
    "secret",
    "senha",
];

/// Whether a field name is denylisted.
pub fn is_sensitive(field: &str) -> bool {
    SENSITIVE_FIELDS.contains(&field)
}

/// Return a copy of `attributes` with denylisted keys removed.
///
/// Idempotent; absent keys are no-ops.
pub fn sanitize(attributes: &AttributeMap) -> AttributeMap {
    attributes
        .iter()
        .filter(|(key, _)| !is_sensitive(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
