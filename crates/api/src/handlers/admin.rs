//! Handlers for `/admin/users/{id}/roles`. All require `users:manage`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use careerdesk_core::audit::{actions, resources};
use careerdesk_core::error::CoreError;
use careerdesk_core::roles::RoleName;
use careerdesk_core::types::DbId;
use careerdesk_db::models::role::UserRoleAssignment;
use careerdesk_db::repositories::{RoleRepo, UserRepo};
use serde::Deserialize;
use serde_json::json;

use crate::audit::{record, AuditEvent, RequestMeta};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{ManageUsers, RequirePermission};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /admin/users/{id}/roles`.
#[derive(Debug, Deserialize)]
pub struct GrantRoleRequest {
    pub role: String,
}

fn parse_role(name: &str) -> AppResult<RoleName> {
    name.parse::<RoleName>()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))
}

async fn ensure_user_exists(state: &AppState, user_id: DbId) -> AppResult<()> {
    UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;
    Ok(())
}

/// GET /api/v1/admin/users/{id}/roles
pub async fn list_user_roles(
    State(state): State<AppState>,
    _admin: RequirePermission<ManageUsers>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<UserRoleAssignment>>>> {
    ensure_user_exists(&state, user_id).await?;
    let assignments = RoleRepo::assignments_for_user(&state.pool, user_id).await?;
    Ok(Json(DataResponse { data: assignments }))
}

/// POST /api/v1/admin/users/{id}/roles
///
/// 201 when the role is newly granted, 200 when it was already held.
pub async fn grant_role(
    State(state): State<AppState>,
    admin: RequirePermission<ManageUsers>,
    meta: RequestMeta,
    Path(user_id): Path<DbId>,
    Json(input): Json<GrantRoleRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Vec<UserRoleAssignment>>>)> {
    let role = parse_role(&input.role)?;
    ensure_user_exists(&state, user_id).await?;

    let actor = admin.user().user_id;
    let granted = RoleRepo::assign_to_user(&state.pool, user_id, role, Some(actor)).await?;
    if granted {
        tracing::info!(actor, user_id, role = %role, "Role granted");
        record(
            state.audit.as_ref(),
            AuditEvent {
                actor: Some(actor),
                action: actions::ROLE_GRANT,
                resource: resources::USER_ROLE,
                resource_id: Some(user_id.to_string()),
                details: json!({ "role": role.as_str() }),
            },
            &meta,
        )
        .await;
    }

    let assignments = RoleRepo::assignments_for_user(&state.pool, user_id).await?;
    let status = if granted {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(DataResponse { data: assignments })))
}

/// DELETE /api/v1/admin/users/{id}/roles/{role}
pub async fn revoke_role(
    State(state): State<AppState>,
    admin: RequirePermission<ManageUsers>,
    meta: RequestMeta,
    Path((user_id, role_name)): Path<(DbId, String)>,
) -> AppResult<StatusCode> {
    let role = parse_role(&role_name)?;

    let actor = admin.user().user_id;
    if !RoleRepo::revoke_from_user(&state.pool, user_id, role).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "UserRole",
            id: user_id,
        }));
    }

    tracing::info!(actor, user_id, role = %role, "Role revoked");
    record(
        state.audit.as_ref(),
        AuditEvent {
            actor: Some(actor),
            action: actions::ROLE_REVOKE,
            resource: resources::USER_ROLE,
            resource_id: Some(user_id.to_string()),
            details: json!({ "role": role.as_str() }),
        },
        &meta,
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
