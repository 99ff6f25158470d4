//! HTTP-level tests for `/auth/roles` and `/auth/permission-check`.
//!
//! Runs against the in-memory store so lookups can be counted.

mod common;

use axum::http::StatusCode;
use common::{body_json, expired_token_for, get, get_auth, token_for, MemoryStore};
use serde_json::json;

// ---------------------------------------------------------------------------
// GET /auth/roles
// ---------------------------------------------------------------------------

#[tokio::test]
async fn roles_without_identity_is_empty_and_ok() {
    let store = MemoryStore::new();
    let app = common::build_memory_app(store.clone());

    let response = get(app, "/api/v1/auth/roles").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "roles": [] }));
    assert_eq!(store.role_lookups(), 0);
}

#[tokio::test]
async fn roles_from_valid_token_skip_the_store() {
    let store = MemoryStore::new();
    store.add_identity(1, "alice", true);
    store.set_roles(1, &["user"]);
    let app = common::build_memory_app(store.clone());

    let response = get_auth(app, "/api/v1/auth/roles", &token_for(1, &["admin"])).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "roles": ["admin"] }));
    assert_eq!(store.role_lookups(), 0, "token claim must be trusted as-is");
}

#[tokio::test]
async fn roles_from_token_without_known_roles_cost_one_lookup() {
    let store = MemoryStore::new();
    store.add_identity(1, "alice", true);
    store.set_roles(1, &["editor", "user"]);
    let app = common::build_memory_app(store.clone());

    let response = get_auth(app, "/api/v1/auth/roles", &token_for(1, &["root"])).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "roles": ["user", "editor"] }));
    assert_eq!(store.role_lookups(), 1);
}

#[tokio::test]
async fn roles_with_expired_token_are_empty() {
    let store = MemoryStore::new();
    store.add_identity(1, "alice", true);
    store.set_roles(1, &["admin"]);
    let app = common::build_memory_app(store.clone());

    let response = get_auth(app, "/api/v1/auth/roles", &expired_token_for(1, &["admin"])).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "roles": [] }));
}

#[tokio::test]
async fn inactive_identity_resolves_no_roles_from_store() {
    let store = MemoryStore::new();
    store.add_identity(1, "gone", false);
    store.set_roles(1, &["admin"]);
    let app = common::build_memory_app(store.clone());

    let response = get_auth(app, "/api/v1/auth/roles", &token_for(1, &[])).await;

    assert_eq!(body_json(response).await, json!({ "roles": [] }));
    assert_eq!(store.role_lookups(), 1);
}

#[tokio::test]
async fn roles_store_failure_fails_closed() {
    let store = MemoryStore::new();
    store.add_identity(1, "alice", true);
    store.set_roles(1, &["admin"]);
    store.fail_access(true);
    let app = common::build_memory_app(store.clone());

    let response = get_auth(app, "/api/v1/auth/roles", &token_for(1, &[])).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "roles": [] }));
}

// ---------------------------------------------------------------------------
// GET /auth/permission-check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn permission_check_without_identity_is_401_false() {
    let app = common::build_memory_app(MemoryStore::new());

    let response = get(app, "/api/v1/auth/permission-check?permissionId=users:read").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await, json!({ "hasPermission": false }));
}

#[tokio::test]
async fn permission_check_without_id_is_400_false() {
    let app = common::build_memory_app(MemoryStore::new());
    let token = token_for(1, &["admin"]);

    let response = get_auth(app.clone(), "/api/v1/auth/permission-check", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "hasPermission": false }));

    let response = get_auth(app, "/api/v1/auth/permission-check?permissionId=", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "hasPermission": false }));
}

#[tokio::test]
async fn permission_granted_through_any_held_role() {
    let store = MemoryStore::new();
    store.grant("support", "audit_logs:read");
    let app = common::build_memory_app(store.clone());
    let token = token_for(1, &["user", "support"]);

    let response = get_auth(
        app,
        "/api/v1/auth/permission-check?permissionId=audit_logs:read",
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "hasPermission": true }));
    assert_eq!(store.grant_lookups(), 1);
}

#[tokio::test]
async fn unknown_permission_is_false_for_every_identity() {
    let store = MemoryStore::new();
    store.grant("super_admin", "users:manage");
    let app = common::build_memory_app(store.clone());

    for roles in [&["user"][..], &["super_admin"][..], &["admin", "editor"][..]] {
        let response = get_auth(
            app.clone(),
            "/api/v1/auth/permission-check?permissionId=spaceships:launch",
            &token_for(7, roles),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "hasPermission": false }));
    }
}

#[tokio::test]
async fn malformed_permission_id_is_false() {
    let store = MemoryStore::new();
    let app = common::build_memory_app(store.clone());

    let response = get_auth(
        app,
        "/api/v1/auth/permission-check?permissionId=DROP%20TABLE",
        &token_for(1, &["admin"]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "hasPermission": false }));
    assert_eq!(store.grant_lookups(), 0);
}

#[tokio::test]
async fn permission_store_failure_is_false_not_error() {
    let store = MemoryStore::new();
    store.grant("admin", "users:manage");
    store.fail_access(true);
    let app = common::build_memory_app(store.clone());

    let response = get_auth(
        app,
        "/api/v1/auth/permission-check?permissionId=users:manage",
        &token_for(1, &["admin"]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "hasPermission": false }));
}
