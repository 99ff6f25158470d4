//! Route definitions for the `/admin` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::{admin, audit};
use crate::state::AppState;

/// Routes mounted at `/admin`. Each handler enforces its own permission.
///
/// ```text
/// GET    /users/{id}/roles           -> list_user_roles
/// POST   /users/{id}/roles           -> grant_role
/// DELETE /users/{id}/roles/{role}    -> revoke_role
/// GET    /audit-logs                 -> query_audit_logs
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/users/{id}/roles",
            get(admin::list_user_roles).post(admin::grant_role),
        )
        .route("/users/{id}/roles/{role}", delete(admin::revoke_role))
        .route("/audit-logs", get(audit::query_audit_logs))
}
