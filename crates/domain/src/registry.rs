//! Entity descriptor registry.
//!
//! Maps entity type names to the module tag and label field used when
//! normalizing lifecycle events. First-party types participate by implementing
//! [`Auditable`]; types the application does not own (vendor models) are
//! listed here and audited through the observer's string-keyed entry points.
//! Unlisted types resolve through a deterministic fallback: the module tag is
//! derived from the type name and the label field defaults to `name`.

use lazy_static::lazy_static;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

use crate::error::AuditError;
use crate::models::AttributeMap;

/// Default label field for types without an explicit registration.
pub const DEFAULT_LABEL_FIELD: &str = "name";

lazy_static! {
    /// Static registration table: type name -> (module tag, label field).
    static ref REGISTRY: HashMap<&'static str, (&'static str, &'static str)> = {
        let mut m = HashMap::new();
        // First-party entities with a module tag or label field that the
        // name-derivation fallback would get wrong.
        m.insert("Noticia", ("noticia", "titulo"));
        m.insert("Curso", ("curso", "nome"));
        m.insert("Turma", ("turma", "nome"));
        m.insert("User", ("usuario", "name"));
        m.insert("ReservaAlojamento", ("alojamento", "nome"));
        // Vendor-owned permission models, registered externally.
        m.insert("Role", ("perfil", "name"));
        m.insert("Permission", ("permissao", "name"));
        m
    };
}

/// Resolved audit configuration for an entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditedType {
    pub module: String,
    pub label_field: String,
}

/// Resolve the audit configuration for a type name.
///
/// Deterministic: the same type name always yields the same result, whether it
/// comes from the registry or the derivation fallback.
pub fn resolve(type_name: &str) -> AuditedType {
    match REGISTRY.get(base_name(type_name)) {
        Some((module, label_field)) => AuditedType {
            module: (*module).to_string(),
            label_field: (*label_field).to_string(),
        },
        None => AuditedType {
            module: derive_module(type_name),
            label_field: DEFAULT_LABEL_FIELD.to_string(),
        },
    }
}

/// Derive a module tag from a type name: strip any path prefix, then convert
/// PascalCase to snake_case.
pub fn derive_module(type_name: &str) -> String {
    let name = base_name(type_name);
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
            prev_lower = false;
        } else {
            out.push(ch);
            prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        }
    }
    out
}

fn base_name(type_name: &str) -> &str {
    type_name.rsplit("::").next().unwrap_or(type_name)
}

/// Behavior for entity types that participate in auditing.
///
/// Implementors only declare their type name and identifier; snapshots come
/// from the type's `Serialize` impl so audited fields stay in lockstep with
/// the persisted shape.
pub trait Auditable: Serialize {
    /// Bare type name, matching the registry key when one exists.
    const TYPE_NAME: &'static str;

    /// Identifier of this instance, if already assigned.
    fn audit_id(&self) -> Option<String>;

    /// Full attribute snapshot of the current state.
    fn audit_snapshot(&self) -> Result<AttributeMap, AuditError> {
        to_attribute_map(self)
    }
}

/// Serialize any value into an attribute map. Fails when the value does not
/// serialize to a JSON object.
pub fn to_attribute_map<T: Serialize + ?Sized>(value: &T) -> Result<AttributeMap, AuditError> {
    match serde_json::to_value(value)? {
        JsonValue::Object(map) => Ok(map),
        other => Err(AuditError::InvalidSnapshot(format!(
            "expected object, got {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
