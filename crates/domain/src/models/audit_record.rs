//! Audit record domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::str::FromStr;
use uuid::Uuid;

use crate::models::context::{AuditContext, SYSTEM_ACTOR_NAME};

/// Attribute snapshot of an entity, keyed by field name.
///
/// Values are opaque JSON so schema evolution on the audited side (scalars
/// becoming arrays, new columns) never breaks stored history.
pub type AttributeMap = serde_json::Map<String, JsonValue>;

/// Audited actions.
///
/// Lifecycle events use `Create`/`Update`/`Delete`; the programmatic event API
/// uses the remaining variants. Callers may supply any other tag via `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Login,
    LoginFailure,
    Logout,
    AccessDenied,
    Error,
    #[serde(untagged)]
    Custom(String),
}

impl FromStr for AuditAction {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "create" => AuditAction::Create,
            "update" => AuditAction::Update,
            "delete" => AuditAction::Delete,
            "login" => AuditAction::Login,
            "login_failure" => AuditAction::LoginFailure,
            "logout" => AuditAction::Logout,
            "access_denied" => AuditAction::AccessDenied,
            "error" => AuditAction::Error,
            other => AuditAction::Custom(other.to_string()),
        })
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
            AuditAction::Login => "login",
            AuditAction::LoginFailure => "login_failure",
            AuditAction::Logout => "logout",
            AuditAction::AccessDenied => "access_denied",
            AuditAction::Error => "error",
            AuditAction::Custom(tag) => tag,
        };
        write!(f, "{}", s)
    }
}

/// Outcome classification of an audited event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    Success,
    Warning,
    Error,
}

impl FromStr for AuditStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "success" => Ok(AuditStatus::Success),
            "warning" => Ok(AuditStatus::Warning),
            "error" => Ok(AuditStatus::Error),
            _ => Err(format!("Unknown audit status: {}", s)),
        }
    }
}

impl std::fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditStatus::Success => write!(f, "success"),
            AuditStatus::Warning => write!(f, "warning"),
            AuditStatus::Error => write!(f, "error"),
        }
    }
}

/// Input for appending a new audit record.
///
/// `id` and `created_at` are minted by the store; everything else is resolved
/// by the normalizer or the programmatic event API before the record reaches a
/// sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuditRecord {
    pub module: String,
    pub action: AuditAction,
    pub description: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub entity_label: Option<String>,
    pub before: Option<AttributeMap>,
    pub after: Option<AttributeMap>,
    pub status: AuditStatus,
    pub actor_id: Option<Uuid>,
    pub actor_name: Option<String>,
    pub actor_matricula: Option<String>,
    pub actor_email: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub url: Option<String>,
    pub method: Option<String>,
}

impl NewAuditRecord {
    /// Create a record for a non-entity event, resolving actor and request
    /// fields from the context. Anonymous contexts record the system sentinel
    /// as the actor name.
    pub fn event(
        module: impl Into<String>,
        action: AuditAction,
        status: AuditStatus,
        ctx: &AuditContext,
    ) -> Self {
        let (actor_id, actor_name, actor_matricula, actor_email) = match &ctx.actor {
            Some(actor) => (
                actor.id,
                Some(actor.display_name().to_string()),
                actor.matricula.clone(),
                actor.email.clone(),
            ),
            None => (None, Some(SYSTEM_ACTOR_NAME.to_string()), None, None),
        };

        let (ip_address, user_agent, url, method) = match &ctx.request {
            Some(req) => (
                req.ip_address.map(|ip| ip.to_string()),
                req.user_agent.clone(),
                req.url.clone(),
                req.method.clone(),
            ),
            None => (None, None, None, None),
        };

        Self {
            module: module.into(),
            action,
            description: String::new(),
            entity_type: None,
            entity_id: None,
            entity_label: None,
            before: None,
            after: None,
            status,
            actor_id,
            actor_name,
            actor_matricula,
            actor_email,
            ip_address,
            user_agent,
            url,
            method,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the affected entity.
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: Option<String>,
        entity_label: Option<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = entity_id;
        self.entity_label = entity_label;
        self
    }

    /// Set the before/after payloads. Callers must sanitize first.
    pub fn with_payloads(
        mut self,
        before: Option<AttributeMap>,
        after: Option<AttributeMap>,
    ) -> Self {
        self.before = before;
        self.after = after;
        self
    }
}

/// A persisted, immutable audit record.
///
/// Records are append-only: no update or delete path exists anywhere in the
/// subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub id: Uuid,
    pub module: String,
    pub action: AuditAction,
    pub description: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub entity_label: Option<String>,
    pub before: Option<AttributeMap>,
    pub after: Option<AttributeMap>,
    pub status: AuditStatus,
    pub actor_id: Option<Uuid>,
    pub actor_name: Option<String>,
    pub actor_matricula: Option<String>,
    pub actor_email: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub url: Option<String>,
    pub method: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuditRecord {
    /// Materialize a stored record from its insert shape.
    pub fn from_new(id: Uuid, created_at: DateTime<Utc>, input: NewAuditRecord) -> Self {
        Self {
            id,
            module: input.module,
            action: input.action,
            description: input.description,
            entity_type: input.entity_type,
            entity_id: input.entity_id,
            entity_label: input.entity_label,
            before: input.before,
            after: input.after,
            status: input.status,
            actor_id: input.actor_id,
            actor_name: input.actor_name,
            actor_matricula: input.actor_matricula,
            actor_email: input.actor_email,
            ip_address: input.ip_address,
            user_agent: input.user_agent,
            url: input.url,
            method: input.method,
            created_at,
        }
    }
}

/// Query parameters for listing audit records.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListAuditRecordsQuery {
    pub page: Option<i32>,
    pub per_page: Option<i32>,
    pub module: Option<String>,
    pub action: Option<String>,
    pub status: Option<String>,
    pub actor_id: Option<Uuid>,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::context::Actor;

    #[test]
    fn test_audit_action_display() {
        assert_eq!(AuditAction::Create.to_string(), "create");
        assert_eq!(AuditAction::LoginFailure.to_string(), "login_failure");
        assert_eq!(AuditAction::AccessDenied.to_string(), "access_denied");
        assert_eq!(
            AuditAction::Custom("exportacao".to_string()).to_string(),
            "exportacao"
        );
    }

    #[test]
    fn test_audit_action_from_str() {
        assert_eq!(AuditAction::from_str("delete").unwrap(), AuditAction::Delete);
        assert_eq!(AuditAction::from_str("logout").unwrap(), AuditAction::Logout);
        assert_eq!(
            AuditAction::from_str("exportacao").unwrap(),
            AuditAction::Custom("exportacao".to_string())
        );
    }

    #[test]
    fn test_audit_status_round_trip() {
        assert_eq!(AuditStatus::from_str("warning").unwrap(), AuditStatus::Warning);
        assert_eq!(AuditStatus::Warning.to_string(), "warning");
        assert!(AuditStatus::from_str("fatal").is_err());
    }

    #[test]
    fn test_event_resolves_actor_from_context() {
        let user_id = Uuid::new_v4();
        let ctx = AuditContext::for_actor(
            Actor::user(user_id, "Ana Souza").with_matricula("98765-4"),
        );

        let record =
            NewAuditRecord::event("auth", AuditAction::Login, AuditStatus::Success, &ctx);

        assert_eq!(record.actor_id, Some(user_id));
        assert_eq!(record.actor_name, Some("Ana Souza".to_string()));
        assert_eq!(record.actor_matricula, Some("98765-4".to_string()));
    }

    #[test]
    fn test_event_records_system_sentinel_without_actor() {
        let record = NewAuditRecord::event(
            "auth",
            AuditAction::Logout,
            AuditStatus::Success,
            &AuditContext::system(),
        );

        assert_eq!(record.actor_id, None);
        assert_eq!(record.actor_name, Some("Sistema".to_string()));
    }
}
