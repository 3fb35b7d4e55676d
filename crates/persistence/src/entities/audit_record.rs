//! Audit record entity.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database entity for audit records.
#[derive(Debug, Clone, FromRow)]
pub struct AuditRecordEntity {
    /// Unique identifier.
    pub id: Uuid,

    /// Functional area tag (e.g. "auth", "noticia").
    pub module: String,

    /// Action performed.
    pub action: String,

    /// Human-readable summary.
    pub description: String,

    /// Fully-qualified type name of the affected entity, if any.
    pub entity_type: Option<String>,

    /// Identifier of the affected entity instance.
    pub entity_id: Option<String>,

    /// Best-effort human label for the entity.
    pub entity_label: Option<String>,

    /// Changed fields before the mutation (sanitized).
    pub before: Option<serde_json::Value>,

    /// Changed fields after the mutation (sanitized).
    pub after: Option<serde_json::Value>,

    /// Outcome: success, warning or error.
    pub status: String,

    /// ID of the acting principal.
    pub actor_id: Option<Uuid>,

    /// Display name of the acting principal.
    pub actor_name: Option<String>,

    /// Badge number of the acting principal.
    pub actor_matricula: Option<String>,

    /// Contact address of the acting principal.
    pub actor_email: Option<String>,

    /// Origin IP address of the request.
    pub ip_address: Option<String>,

    /// User agent of the request.
    pub user_agent: Option<String>,

    /// Target URL of the request.
    pub url: Option<String>,

    /// HTTP verb of the request.
    pub method: Option<String>,

    /// Timestamp when the record was created. Immutable.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_record_entity_creation() {
        let now = Utc::now();
        let entity = AuditRecordEntity {
            id: Uuid::new_v4(),
            module: "noticia".to_string(),
            action: "update".to_string(),
            description: "Atualização em Notícia: Edital 04".to_string(),
            entity_type: Some("Noticia".to_string()),
            entity_id: Some("12".to_string()),
            entity_label: Some("Edital 04".to_string()),
            before: Some(serde_json::json!({"titulo": "X"})),
            after: Some(serde_json::json!({"titulo": "Y"})),
            status: "success".to_string(),
            actor_id: Some(Uuid::new_v4()),
            actor_name: Some("Ana Souza".to_string()),
            actor_matricula: Some("98765-4".to_string()),
            actor_email: Some("ana@example.com".to_string()),
            ip_address: Some("192.168.1.1".to_string()),
            user_agent: Some("Mozilla/5.0".to_string()),
            url: Some("/noticias/12".to_string()),
            method: Some("PUT".to_string()),
            created_at: now,
        };

        assert_eq!(entity.module, "noticia");
        assert_eq!(entity.action, "update");
        assert_eq!(entity.status, "success");
    }
}
