//! Audit record repository for database operations.
//!
//! Append-only by design: the repository exposes insert and read queries but
//! no update or delete.

use async_trait::async_trait;
use domain::error::StoreError;
use domain::models::{AuditAction, AuditRecord, AuditStatus, ListAuditRecordsQuery, NewAuditRecord};
use domain::services::AuditStore;
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::AuditRecordEntity;
use crate::metrics::QueryTimer;

/// Helper struct for building dynamic WHERE clauses from audit record filters.
/// Tracks conditions and parameter positions to avoid code duplication.
struct AuditRecordFilterBuilder {
    conditions: Vec<String>,
    param_count: i32,
}

impl AuditRecordFilterBuilder {
    /// Build filter conditions from a query.
    fn build(query: &ListAuditRecordsQuery) -> Self {
        let mut conditions = Vec::new();
        let mut param_count = 0;

        if query.module.is_some() {
            param_count += 1;
            conditions.push(format!("module = ${}", param_count));
        }

        if query.action.is_some() {
            param_count += 1;
            conditions.push(format!("action = ${}", param_count));
        }

        if query.status.is_some() {
            param_count += 1;
            conditions.push(format!("status = ${}", param_count));
        }

        if query.actor_id.is_some() {
            param_count += 1;
            conditions.push(format!("actor_id = ${}", param_count));
        }

        if query.entity_type.is_some() {
            param_count += 1;
            conditions.push(format!("entity_type = ${}", param_count));
        }

        if query.entity_id.is_some() {
            param_count += 1;
            conditions.push(format!("entity_id = ${}", param_count));
        }

        if query.from.is_some() {
            param_count += 1;
            conditions.push(format!("created_at >= ${}", param_count));
        }

        if query.to.is_some() {
            param_count += 1;
            conditions.push(format!("created_at <= ${}", param_count));
        }

        Self {
            conditions,
            param_count,
        }
    }

    /// Get the WHERE clause as a string.
    fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            "TRUE".to_string()
        } else {
            self.conditions.join(" AND ")
        }
    }

    /// Get the current parameter count.
    fn param_count(&self) -> i32 {
        self.param_count
    }
}

/// Macro to bind query filter parameters to a SQLx builder.
/// This avoids code duplication for binding optional query parameters.
macro_rules! bind_query_filters {
    ($builder:expr, $query:expr) => {{
        let mut b = $builder;
        if let Some(ref module) = $query.module {
            b = b.bind(module);
        }
        if let Some(ref action) = $query.action {
            b = b.bind(action);
        }
        if let Some(ref status) = $query.status {
            b = b.bind(status);
        }
        if let Some(ref actor_id) = $query.actor_id {
            b = b.bind(actor_id);
        }
        if let Some(ref entity_type) = $query.entity_type {
            b = b.bind(entity_type);
        }
        if let Some(ref entity_id) = $query.entity_id {
            b = b.bind(entity_id);
        }
        if let Some(ref from) = $query.from {
            b = b.bind(from);
        }
        if let Some(ref to) = $query.to {
            b = b.bind(to);
        }
        b
    }};
}

const RECORD_COLUMNS: &str = "id, module, action, description, entity_type, entity_id, \
     entity_label, before, after, status, actor_id, actor_name, actor_matricula, \
     actor_email, ip_address::text, user_agent, url, method, created_at";

/// Repository for audit record database operations.
#[derive(Clone)]
pub struct AuditRecordRepository {
    pool: PgPool,
}

impl AuditRecordRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new audit record.
    pub async fn insert(&self, input: NewAuditRecord) -> Result<AuditRecord, sqlx::Error> {
        let timer = QueryTimer::new("insert_audit_record");

        let before_json = input.before.as_ref().map(|m| JsonValue::Object(m.clone()));
        let after_json = input.after.as_ref().map(|m| JsonValue::Object(m.clone()));

        let query = format!(
            r#"
            INSERT INTO audit_records (
                module, action, description, entity_type, entity_id, entity_label,
                before, after, status, actor_id, actor_name, actor_matricula,
                actor_email, ip_address, user_agent, url, method
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14::inet, $15, $16, $17)
            RETURNING {}
            "#,
            RECORD_COLUMNS
        );

        let entity = sqlx::query_as::<_, AuditRecordEntity>(&query)
            .bind(&input.module)
            .bind(input.action.to_string())
            .bind(&input.description)
            .bind(&input.entity_type)
            .bind(&input.entity_id)
            .bind(&input.entity_label)
            .bind(before_json)
            .bind(after_json)
            .bind(input.status.to_string())
            .bind(input.actor_id)
            .bind(&input.actor_name)
            .bind(&input.actor_matricula)
            .bind(&input.actor_email)
            .bind(&input.ip_address)
            .bind(&input.user_agent)
            .bind(&input.url)
            .bind(&input.method)
            .fetch_one(&self.pool)
            .await?;

        timer.record();
        Ok(entity_to_domain(entity))
    }

    /// Find an audit record by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<AuditRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM audit_records WHERE id = $1",
            RECORD_COLUMNS
        );

        let entity = sqlx::query_as::<_, AuditRecordEntity>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(entity.map(entity_to_domain))
    }

    /// List audit records with pagination and filtering.
    pub async fn list(
        &self,
        query: &ListAuditRecordsQuery,
    ) -> Result<(Vec<AuditRecord>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_audit_records");

        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(50).clamp(1, 100);
        let offset = ((page - 1) * per_page) as i64;

        let filter = AuditRecordFilterBuilder::build(query);
        let where_clause = filter.where_clause();
        let param_count = filter.param_count();

        let count_query = format!("SELECT COUNT(*) FROM audit_records WHERE {}", where_clause);

        let count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        let count_builder = bind_query_filters!(count_builder, query);
        let total: i64 = count_builder.fetch_one(&self.pool).await?;

        let list_query = format!(
            r#"
            SELECT {}
            FROM audit_records
            WHERE {}
            ORDER BY created_at DESC
            LIMIT ${} OFFSET ${}
            "#,
            RECORD_COLUMNS,
            where_clause,
            param_count + 1,
            param_count + 2
        );

        let list_builder = sqlx::query_as::<_, AuditRecordEntity>(&list_query);
        let list_builder = bind_query_filters!(list_builder, query);
        let entities = list_builder
            .bind(per_page as i64)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let records = entities.into_iter().map(entity_to_domain).collect();

        timer.record();
        Ok((records, total))
    }

    /// Count all audit records.
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audit_records")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[async_trait]
impl AuditStore for AuditRecordRepository {
    async fn append(&self, input: NewAuditRecord) -> Result<AuditRecord, StoreError> {
        self.insert(input)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))
    }
}

/// Convert entity to domain model.
fn entity_to_domain(entity: AuditRecordEntity) -> AuditRecord {
    let action = entity
        .action
        .parse::<AuditAction>()
        .unwrap_or(AuditAction::Error);
    let status = entity
        .status
        .parse::<AuditStatus>()
        .unwrap_or(AuditStatus::Success);

    let as_map = |value: Option<JsonValue>| match value {
        Some(JsonValue::Object(map)) => Some(map),
        _ => None,
    };

    AuditRecord {
        id: entity.id,
        module: entity.module,
        action,
        description: entity.description,
        entity_type: entity.entity_type,
        entity_id: entity.entity_id,
        entity_label: entity.entity_label,
        before: as_map(entity.before),
        after: as_map(entity.after),
        status,
        actor_id: entity.actor_id,
        actor_name: entity.actor_name,
        actor_matricula: entity.actor_matricula,
        actor_email: entity.actor_email,
        ip_address: entity.ip_address,
        user_agent: entity.user_agent,
        url: entity.url,
        method: entity.method,
        created_at: entity.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_entity_to_domain_conversion() {
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
            actor_matricula: None,
            actor_email: None,
            ip_address: Some("192.168.1.1".to_string()),
            user_agent: Some("Mozilla/5.0".to_string()),
            url: Some("/noticias/12".to_string()),
            method: Some("PUT".to_string()),
            created_at: Utc::now(),
        };

        let record = entity_to_domain(entity);

        assert_eq!(record.action, AuditAction::Update);
        assert_eq!(record.status, AuditStatus::Success);
        assert_eq!(record.module, "noticia");
        assert_eq!(record.before.unwrap()["titulo"], serde_json::json!("X"));
        assert_eq!(record.after.unwrap()["titulo"], serde_json::json!("Y"));
    }

    #[test]
    fn test_entity_to_domain_custom_action_and_bad_status() {
        let entity = AuditRecordEntity {
            id: Uuid::new_v4(),
            module: "relatorio".to_string(),
            action: "exportacao".to_string(),
            description: "Exportacao em Relatorio".to_string(),
            entity_type: None,
            entity_id: None,
            entity_label: None,
            before: None,
            after: None,
            status: "unknown".to_string(),
            actor_id: None,
            actor_name: Some("Sistema".to_string()),
            actor_matricula: None,
            actor_email: None,
            ip_address: None,
            user_agent: None,
            url: None,
            method: None,
            created_at: Utc::now(),
        };

        let record = entity_to_domain(entity);

        assert_eq!(record.action, AuditAction::Custom("exportacao".to_string()));
        assert_eq!(record.status, AuditStatus::Success);
        assert!(record.before.is_none());
    }

    #[test]
    fn test_filter_builder_composes_conditions() {
        let query = ListAuditRecordsQuery {
            module: Some("noticia".to_string()),
            entity_type: Some("Noticia".to_string()),
            entity_id: Some("12".to_string()),
            ..Default::default()
        };

        let filter = AuditRecordFilterBuilder::build(&query);
        assert_eq!(filter.param_count(), 3);
        assert_eq!(
            filter.where_clause(),
            "module = $1 AND entity_type = $2 AND entity_id = $3"
        );
    }

    #[test]
    fn test_filter_builder_without_filters() {
        let filter = AuditRecordFilterBuilder::build(&ListAuditRecordsQuery::default());
        assert_eq!(filter.param_count(), 0);
        assert_eq!(filter.where_clause(), "TRUE");
    }
}
