//! Handlers for role and permission queries about the caller.
//!
//! Both endpoints answer every caller with their documented body; a caller
//! that cannot be resolved, or a failing store, gets the empty/`false`
//! answer and never an error payload.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use careerdesk_core::roles::role_names;
use serde::{Deserialize, Serialize};

use crate::auth::checker::PermissionChecker;
use crate::auth::resolver::RoleResolver;
use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RolesResponse {
    pub roles: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionCheckParams {
    pub permission_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionCheckResponse {
    pub has_permission: bool,
}

/// GET /api/v1/auth/roles
///
/// Role names held by the caller. Always 200; `[]` when unauthenticated.
pub async fn roles(
    State(state): State<AppState>,
    auth: Result<AuthUser, AppError>,
) -> Json<RolesResponse> {
    let Ok(user) = auth else {
        return Json(RolesResponse { roles: Vec::new() });
    };

    let roles = RoleResolver::new(state.access.as_ref(), &state.config.jwt)
        .resolve(user.user_id, user.token.as_deref())
        .await;

    Json(RolesResponse {
        roles: role_names(&roles),
    })
}

/// GET /api/v1/auth/permission-check?permissionId=X
///
/// 401 without an identity and 400 without `permissionId`, both with
/// `hasPermission: false`.
pub async fn permission_check(
    State(state): State<AppState>,
    auth: Result<AuthUser, AppError>,
    Query(params): Query<PermissionCheckParams>,
) -> (StatusCode, Json<PermissionCheckResponse>) {
    let denied = |status| (status, Json(PermissionCheckResponse { has_permission: false }));

    let Ok(user) = auth else {
        return denied(StatusCode::UNAUTHORIZED);
    };
    let Some(permission_id) = params.permission_id.filter(|p| !p.trim().is_empty()) else {
        return denied(StatusCode::BAD_REQUEST);
    };

    let has_permission = PermissionChecker::new(state.access.as_ref(), &state.config.jwt)
        .has_permission(user.user_id, user.token.as_deref(), permission_id.trim())
        .await;

    (StatusCode::OK, Json(PermissionCheckResponse { has_permission }))
}
