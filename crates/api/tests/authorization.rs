//! Permission enforcement on admin routes (`RequirePermission`).
//!
//! Only denial paths are exercised here; they never reach the database.
//! Granted paths live in `admin_api.rs`.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get, get_auth, post_json_auth, token_for, MemoryStore};
use serde_json::json;

#[tokio::test]
async fn admin_routes_require_identity() {
    let app = common::build_memory_app(MemoryStore::new());

    for uri in ["/api/v1/admin/users/1/roles", "/api/v1/admin/audit-logs"] {
        let response = get(app.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
    }
}

#[tokio::test]
async fn role_management_requires_users_manage() {
    let store = MemoryStore::new();
    store.grant("admin", "users:manage");
    store.grant("support", "users:read");
    let app = common::build_memory_app(store.clone());
    let token = token_for(5, &["user", "support"]);

    let response = get_auth(app.clone(), "/api/v1/admin/users/1/roles", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
    assert_eq!(json["error"], "Permission 'users:manage' required");

    let response = post_json_auth(
        app.clone(),
        "/api/v1/admin/users/1/roles",
        &token,
        json!({ "role": "admin" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app, "/api/v1/admin/users/1/roles/user", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    assert!(store.audit_entries().is_empty(), "denied requests change nothing");
}

#[tokio::test]
async fn audit_log_requires_audit_logs_read() {
    let store = MemoryStore::new();
    store.grant("support", "audit_logs:read");
    let app = common::build_memory_app(store.clone());

    let response = get_auth(app, "/api/v1/admin/audit-logs", &token_for(5, &["editor"])).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(response).await["error"],
        "Permission 'audit_logs:read' required"
    );
}

#[tokio::test]
async fn store_failure_denies_even_super_admin() {
    let store = MemoryStore::new();
    store.grant("super_admin", "users:manage");
    store.fail_access(true);
    let app = common::build_memory_app(store.clone());

    let response = get_auth(
        app,
        "/api/v1/admin/users/1/roles",
        &token_for(1, &["super_admin"]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(store.grant_lookups(), 1);
}
