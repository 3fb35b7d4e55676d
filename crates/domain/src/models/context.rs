//! Actor and request context passed explicitly into the audit pipeline.
//!
//! The pipeline never reads ambient globals; whoever triggers an audited
//! mutation hands an [`AuditContext`] down the call chain. An empty context is
//! valid and is recorded as the system actor.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use uuid::Uuid;

/// Sentinel name recorded when no authenticated actor is present.
pub const SYSTEM_ACTOR_NAME: &str = "Sistema";

/// The acting principal behind an audited event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    /// Secondary identifier (badge/matricula).
    pub matricula: Option<String>,
    pub email: Option<String>,
}

impl Actor {
    /// Create an authenticated user actor.
    pub fn user(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: Some(name.into()),
            matricula: None,
            email: None,
        }
    }

    /// Set the badge number.
    pub fn with_matricula(mut self, matricula: impl Into<String>) -> Self {
        self.matricula = Some(matricula.into());
        self
    }

    /// Set the contact address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Display name, falling back to the system sentinel.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(SYSTEM_ACTOR_NAME)
    }
}

/// Best-effort request context captured at the web boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestInfo {
    pub ip_address: Option<IpAddr>,
    pub user_agent: Option<String>,
    pub url: Option<String>,
    pub method: Option<String>,
}

impl RequestInfo {
    /// Create request info from the usual HTTP fields.
    pub fn new(
        ip_address: Option<IpAddr>,
        user_agent: Option<String>,
        url: Option<String>,
        method: Option<String>,
    ) -> Self {
        Self {
            ip_address,
            user_agent,
            url,
            method,
        }
    }
}

/// Everything the normalizer needs to attribute an event.
#[derive(Debug, Clone, Default)]
pub struct AuditContext {
    pub actor: Option<Actor>,
    pub request: Option<RequestInfo>,
}

impl AuditContext {
    /// Context for an unattended system operation (no actor, no request).
    pub fn system() -> Self {
        Self::default()
    }

    /// Context for an authenticated actor.
    pub fn for_actor(actor: Actor) -> Self {
        Self {
            actor: Some(actor),
            request: None,
        }
    }

    /// Attach request info.
    pub fn with_request(mut self, request: RequestInfo) -> Self {
        self.request = Some(request);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_display_name_falls_back_to_sentinel() {
        let anonymous = Actor {
            id: None,
            name: None,
            matricula: None,
            email: None,
        };
        assert_eq!(anonymous.display_name(), SYSTEM_ACTOR_NAME);

        let user = Actor::user(Uuid::new_v4(), "Ana Souza");
        assert_eq!(user.display_name(), "Ana Souza");
    }

    #[test]
    fn test_actor_builder() {
        let actor = Actor::user(Uuid::new_v4(), "Carlos Lima")
            .with_matricula("12345-6")
            .with_email("carlos@example.com");

        assert_eq!(actor.matricula, Some("12345-6".to_string()));
        assert_eq!(actor.email, Some("carlos@example.com".to_string()));
    }

    #[test]
    fn test_system_context_is_empty() {
        let ctx = AuditContext::system();
        assert!(ctx.actor.is_none());
        assert!(ctx.request.is_none());
    }
}
