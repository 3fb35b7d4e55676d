//! Programmatic event API.
//!
//! Direct-call interface for discrete events with no entity-lifecycle hook:
//! authentication, authorization denials, uncaught errors and ad-hoc CRUD
//! records emitted from application code. Everything funnels into the same
//! normalizer conventions and the same dual-sink recorder.

use domain::models::{
    AttributeMap, AuditAction, AuditContext, AuditRecord, AuditStatus, NewAuditRecord,
};
use domain::services::normalize::describe;
use domain::services::sanitize;

use crate::recorder::AuditRecorder;

/// Module tag for authentication events.
pub const AUTH_MODULE: &str = "auth";

/// Module tag for system-level errors.
pub const SYSTEM_MODULE: &str = "sistema";

/// Fields tried, in order, when inferring a CRUD label.
const LABEL_FIELDS: [&str; 4] = ["nome", "name", "titulo", "title"];

/// Ad-hoc CRUD event description, built fluently by the caller.
#[derive(Debug, Clone)]
pub struct CrudEvent {
    action: AuditAction,
    module: String,
    entity_type: Option<String>,
    entity_id: Option<String>,
    attributes: Option<AttributeMap>,
    label: Option<String>,
    extra: Option<AttributeMap>,
    before: Option<AttributeMap>,
    after: Option<AttributeMap>,
    description: Option<String>,
}

impl CrudEvent {
    /// Start a CRUD event for the given action and module.
    pub fn new(action: AuditAction, module: impl Into<String>) -> Self {
        Self {
            action,
            module: module.into(),
            entity_type: None,
            entity_id: None,
            attributes: None,
            label: None,
            extra: None,
            before: None,
            after: None,
            description: None,
        }
    }

    /// Set the affected entity.
    pub fn on_entity(mut self, entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Attach the entity's current attributes, used for label inference.
    pub fn with_attributes(mut self, attributes: AttributeMap) -> Self {
        self.attributes = Some(attributes);
        self
    }

    /// Supply the label explicitly, skipping inference.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Extra fields merged into the `after` payload.
    pub fn with_extra(mut self, extra: AttributeMap) -> Self {
        self.extra = Some(extra);
        self
    }

    /// Set the before payload.
    pub fn with_before(mut self, before: AttributeMap) -> Self {
        self.before = Some(before);
        self
    }

    /// Set the after payload.
    pub fn with_after(mut self, after: AttributeMap) -> Self {
        self.after = Some(after);
        self
    }

    /// Use this description verbatim instead of the composed default.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Explicit label, else the first non-empty label-like attribute, else the
    /// entity id, else empty.
    fn resolve_label(&self) -> String {
        if let Some(label) = &self.label {
            return label.clone();
        }
        if let Some(attrs) = &self.attributes {
            for field in LABEL_FIELDS {
                if let Some(serde_json::Value::String(s)) = attrs.get(field) {
                    if !s.is_empty() {
                        return s.clone();
                    }
                }
            }
        }
        self.entity_id.clone().unwrap_or_default()
    }
}

/// Direct-call recording interface.
#[derive(Clone)]
pub struct AuditService {
    recorder: AuditRecorder,
}

impl AuditService {
    /// Create a service writing through the given recorder.
    pub fn new(recorder: AuditRecorder) -> Self {
        Self { recorder }
    }

    /// Record a successful login.
    pub async fn record_login(&self, ctx: &AuditContext) -> Option<AuditRecord> {
        let label = actor_label(ctx);
        let record =
            NewAuditRecord::event(AUTH_MODULE, AuditAction::Login, AuditStatus::Success, ctx)
                .with_description(describe(&AuditAction::Login, AUTH_MODULE, &label));
        self.recorder.record(record).await
    }

    /// Record a failed login attempt with the failure reason.
    pub async fn record_login_failure(
        &self,
        reason: &str,
        ctx: &AuditContext,
    ) -> Option<AuditRecord> {
        let record = NewAuditRecord::event(
            AUTH_MODULE,
            AuditAction::LoginFailure,
            AuditStatus::Warning,
            ctx,
        )
        .with_description(format!("Falha de login: {}", reason));
        self.recorder.record(record).await
    }

    /// Record a logout.
    pub async fn record_logout(&self, ctx: &AuditContext) -> Option<AuditRecord> {
        let label = actor_label(ctx);
        let record =
            NewAuditRecord::event(AUTH_MODULE, AuditAction::Logout, AuditStatus::Success, ctx)
                .with_description(describe(&AuditAction::Logout, AUTH_MODULE, &label));
        self.recorder.record(record).await
    }

    /// Record an authorization denial for a named resource.
    pub async fn record_access_denied(
        &self,
        resource: &str,
        ctx: &AuditContext,
    ) -> Option<AuditRecord> {
        let record = NewAuditRecord::event(
            AUTH_MODULE,
            AuditAction::AccessDenied,
            AuditStatus::Warning,
            ctx,
        )
        .with_description(format!("Acesso negado: {}", resource));
        self.recorder.record(record).await
    }

    /// Record an application error with its surrounding context.
    pub async fn record_error(
        &self,
        error: &dyn std::error::Error,
        context: &str,
        ctx: &AuditContext,
    ) -> Option<AuditRecord> {
        let record = NewAuditRecord::event(
            SYSTEM_MODULE,
            AuditAction::Error,
            AuditStatus::Error,
            ctx,
        )
        .with_description(format!("{}: {}", context, error));
        self.recorder.record(record).await
    }

    /// Record an ad-hoc CRUD event.
    ///
    /// Payloads are sanitized here; extra fields are merged into `after`.
    pub async fn record_crud(&self, event: CrudEvent, ctx: &AuditContext) -> Option<AuditRecord> {
        let label = event.resolve_label();
        let description = match &event.description {
            Some(d) => d.clone(),
            None => describe(&event.action, &event.module, &label),
        };

        let before = event.before.as_ref().map(sanitize);
        let mut after = event.after.as_ref().map(sanitize);
        if let Some(extra) = &event.extra {
            let merged = after.get_or_insert_with(AttributeMap::new);
            for (key, value) in sanitize(extra) {
                merged.insert(key, value);
            }
        }

        let mut record = NewAuditRecord::event(
            event.module.clone(),
            event.action.clone(),
            AuditStatus::Success,
            ctx,
        )
        .with_description(description)
        .with_payloads(before, after);

        if let Some(entity_type) = &event.entity_type {
            record = record.with_entity(
                entity_type.clone(),
                event.entity_id.clone(),
                Some(label),
            );
        }

        self.recorder.record(record).await
    }
}

fn actor_label(ctx: &AuditContext) -> String {
    ctx.actor
        .as_ref()
        .map(|actor| actor.display_name().to_string())
        .unwrap_or_default()
}
