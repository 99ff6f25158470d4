pub mod admin;
pub mod auth;
pub mod health;
pub mod two_factor;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                          login (public)
/// /auth/refresh                        refresh (public)
/// /auth/logout                         logout (requires auth)
/// /auth/roles                          caller's roles (always 200)
/// /auth/permission-check               caller's permission check
///
/// /auth/2fa/status                     enrollment state (requires auth)
/// /auth/2fa/setup                      start enrollment (requires auth)
/// /auth/2fa/verify                     confirm enrollment (requires auth)
/// /auth/2fa/disable                    disable (requires auth)
///
/// /admin/users/{id}/roles              list, grant (users:manage)
/// /admin/users/{id}/roles/{role}       revoke (users:manage)
/// /admin/audit-logs                    query (audit_logs:read)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router().nest("/2fa", two_factor::router()))
        .nest("/admin", admin::router())
}
