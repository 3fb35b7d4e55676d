//! Record normalization for entity lifecycle events.
//!
//! Turns a (event, descriptor, snapshots, context) tuple into the uniform
//! insert shape. Module and label resolution go through the registry; the
//! description is composed from static display tables when the caller does
//! not supply one. Pure aside from reading the passed context.

use lazy_static::lazy_static;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

use crate::models::{AttributeMap, AuditAction, AuditContext, AuditStatus, NewAuditRecord};
use crate::registry;

/// Lifecycle transition of a persisted entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Created,
    Updated,
    Deleted,
}

impl LifecycleEvent {
    /// Audit action recorded for this transition.
    pub fn action(self) -> AuditAction {
        match self {
            LifecycleEvent::Created => AuditAction::Create,
            LifecycleEvent::Updated => AuditAction::Update,
            LifecycleEvent::Deleted => AuditAction::Delete,
        }
    }
}

lazy_static! {
    /// Module tag -> human display name.
    static ref MODULE_LABELS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("auth", "Autenticação");
        m.insert("sistema", "Sistema");
        m.insert("usuario", "Usuário");
        m.insert("noticia", "Notícia");
        m.insert("curso", "Curso");
        m.insert("turma", "Turma");
        m.insert("alojamento", "Alojamento");
        m.insert("perfil", "Perfil");
        m.insert("permissao", "Permissão");
        m
    };

    /// Action tag -> human display name.
    static ref ACTION_LABELS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("create", "Criação");
        m.insert("update", "Atualização");
        m.insert("delete", "Exclusão");
        m.insert("login", "Login");
        m.insert("login_failure", "Falha de login");
        m.insert("logout", "Logout");
        m.insert("access_denied", "Acesso negado");
        m.insert("error", "Erro");
        m
    };
}

/// Display name for a module tag, humanizing unknown tags.
pub fn module_label(module: &str) -> String {
    match MODULE_LABELS.get(module) {
        Some(label) => (*label).to_string(),
        None => humanize(module),
    }
}

/// Display name for an action, humanizing custom tags.
pub fn action_label(action: &AuditAction) -> String {
    let tag = action.to_string();
    match ACTION_LABELS.get(tag.as_str()) {
        Some(label) => (*label).to_string(),
        None => humanize(&tag),
    }
}

fn humanize(tag: &str) -> String {
    let spaced = tag.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Compose the default description: `"{Action} em {Module}: {Label}"`, with
/// the label segment omitted when empty.
pub fn describe(action: &AuditAction, module: &str, label: &str) -> String {
    if label.is_empty() {
        format!("{} em {}", action_label(action), module_label(module))
    } else {
        format!("{} em {}: {}", action_label(action), module_label(module), label)
    }
}

/// Best-effort human label: the configured label field's current value when
/// non-empty, else the entity id, else empty.
pub fn resolve_label(
    attributes: &AttributeMap,
    label_field: &str,
    entity_id: Option<&str>,
) -> String {
    match attributes.get(label_field) {
        Some(JsonValue::String(s)) if !s.is_empty() => s.clone(),
        Some(JsonValue::Null) | None => entity_id.unwrap_or_default().to_string(),
        Some(JsonValue::String(_)) => entity_id.unwrap_or_default().to_string(),
        Some(other) => other.to_string(),
    }
}

/// Build the insert shape for an entity lifecycle event.
///
/// `snapshot` is the entity's full attribute state at event time (current
/// state for create/update, last state for delete) and is used only for label
/// resolution; `before`/`after` are the already-sanitized payloads.
pub fn normalize_lifecycle(
    event: LifecycleEvent,
    type_name: &str,
    entity_id: Option<String>,
    snapshot: &AttributeMap,
    before: Option<AttributeMap>,
    after: Option<AttributeMap>,
    ctx: &AuditContext,
) -> NewAuditRecord {
    let audited = registry::resolve(type_name);
    let label = resolve_label(snapshot, &audited.label_field, entity_id.as_deref());
    let action = event.action();
    let description = describe(&action, &audited.module, &label);

    NewAuditRecord::event(audited.module, action, AuditStatus::Success, ctx)
        .with_description(description)
        .with_entity(type_name, entity_id, Some(label))
        .with_payloads(before, after)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Actor;
    use serde_json::json;
    use uuid::Uuid;

    fn attrs(pairs: &[(&str, serde_json::Value)]) -> AttributeMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_describe_with_and_without_label() {
        assert_eq!(
            describe(&AuditAction::Create, "noticia", "Edital 04"),
            "Criação em Notícia: Edital 04"
        );
        assert_eq!(describe(&AuditAction::Logout, "auth", ""), "Logout em Autenticação");
    }

    #[test]
    fn test_labels_humanize_unknown_tags() {
        assert_eq!(module_label("boletim_interno"), "Boletim interno");
        assert_eq!(
            action_label(&AuditAction::Custom("exportacao_csv".to_string())),
            "Exportacao csv"
        );
    }

    #[test]
    fn test_resolve_label_prefers_label_field() {
        let snapshot = attrs(&[("titulo", json!("Edital 04")), ("id", json!(7))]);
        assert_eq!(resolve_label(&snapshot, "titulo", Some("7")), "Edital 04");
    }

    #[test]
    fn test_resolve_label_falls_back_to_id_then_empty() {
        let snapshot = attrs(&[("titulo", json!(""))]);
        assert_eq!(resolve_label(&snapshot, "titulo", Some("7")), "7");
        assert_eq!(resolve_label(&snapshot, "nome", None), "");
    }

    #[test]
    fn test_resolve_label_stringifies_non_string_values() {
        let snapshot = attrs(&[("nome", json!(42))]);
        assert_eq!(resolve_label(&snapshot, "nome", None), "42");
    }

    #[test]
    fn test_normalize_created_record() {
        let snapshot = attrs(&[("titulo", json!("Edital 04")), ("corpo", json!("..."))]);
        let ctx = AuditContext::for_actor(Actor::user(Uuid::new_v4(), "Ana Souza"));

        let record = normalize_lifecycle(
            LifecycleEvent::Created,
            "Noticia",
            Some("12".to_string()),
            &snapshot,
            None,
            Some(snapshot.clone()),
            &ctx,
        );

        assert_eq!(record.module, "noticia");
        assert_eq!(record.action, AuditAction::Create);
        assert_eq!(record.status, AuditStatus::Success);
        assert_eq!(record.entity_type, Some("Noticia".to_string()));
        assert_eq!(record.entity_label, Some("Edital 04".to_string()));
        assert_eq!(record.description, "Criação em Notícia: Edital 04");
        assert!(record.before.is_none());
        assert!(record.after.is_some());
    }

    #[test]
    fn test_normalize_unregistered_type_derives_module() {
        let snapshot = attrs(&[("name", json!("BO 2024/17"))]);

        let record = normalize_lifecycle(
            LifecycleEvent::Deleted,
            "BoletimOcorrencia",
            Some("17".to_string()),
            &snapshot,
            Some(snapshot.clone()),
            None,
            &AuditContext::system(),
        );

        assert_eq!(record.module, "boletim_ocorrencia");
        assert_eq!(record.entity_label, Some("BO 2024/17".to_string()));
        assert_eq!(record.actor_name, Some("Sistema".to_string()));
    }
}
