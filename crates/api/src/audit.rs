//! Best-effort audit trail writes.
//!
//! An audit failure is logged and swallowed: the action it describes has
//! already happened and is not rolled back.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use careerdesk_core::audit::redact_sensitive_fields;
use careerdesk_core::types::DbId;
use careerdesk_db::models::audit::CreateAuditLog;
use careerdesk_db::stores::AuditStore;

/// Client details attached to audit entries.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl<S: Send + Sync> FromRequestParts<S> for RequestMeta {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        // First hop of X-Forwarded-For is the client.
        let ip_address = header("x-forwarded-for")
            .and_then(|v| v.split(',').next().map(|s| s.trim().to_string()))
            .filter(|s| !s.is_empty())
            .or_else(|| header("x-real-ip"));

        Ok(RequestMeta {
            ip_address,
            user_agent: header("user-agent"),
        })
    }
}

/// A pending audit entry.
pub struct AuditEvent<'a> {
    pub actor: Option<DbId>,
    pub action: &'a str,
    pub resource: &'a str,
    pub resource_id: Option<String>,
    pub details: serde_json::Value,
}

/// Append `event`, redacting sensitive detail keys first.
pub async fn record(store: &dyn AuditStore, event: AuditEvent<'_>, meta: &RequestMeta) {
    let entry = CreateAuditLog {
        user_id: event.actor,
        action: event.action.to_string(),
        resource: event.resource.to_string(),
        resource_id: event.resource_id,
        details: redact_sensitive_fields(&event.details),
        ip_address: meta.ip_address.clone(),
        user_agent: meta.user_agent.clone(),
    };

    if let Err(e) = store.append(entry).await {
        tracing::warn!(
            action = event.action,
            resource = event.resource,
            error = %e,
            "Failed to append audit entry",
        );
    }
}
