//! Permission-based access control extractors.
//!
//! [`RequirePermission`] wraps [`AuthUser`] and rejects callers whose roles
//! do not grant the permission named by its marker type, enforcing
//! authorization at the type level in route handlers.

use std::marker::PhantomData;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use careerdesk_core::error::CoreError;
use careerdesk_core::permissions::{AUDIT_LOGS_READ, USERS_MANAGE};

use super::auth::AuthUser;
use crate::auth::checker::PermissionChecker;
use crate::error::AppError;
use crate::state::AppState;

/// A permission that can guard a route.
pub trait PermissionKey: Send + Sync + 'static {
    const ID: &'static str;
}

/// `users:manage`
pub struct ManageUsers;

impl PermissionKey for ManageUsers {
    const ID: &'static str = USERS_MANAGE;
}

/// `audit_logs:read`
pub struct ReadAuditLogs;

impl PermissionKey for ReadAuditLogs {
    const ID: &'static str = AUDIT_LOGS_READ;
}

/// Requires permission `P`. 401 without an identity, 403 without the grant.
///
/// ```ignore
/// async fn admin_only(RequirePermission(user, ..): RequirePermission<ManageUsers>) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequirePermission<P: PermissionKey>(pub AuthUser, pub PhantomData<P>);

impl<P: PermissionKey> RequirePermission<P> {
    pub fn user(&self) -> &AuthUser {
        &self.0
    }
}

impl<P: PermissionKey> FromRequestParts<AppState> for RequirePermission<P> {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        let allowed = PermissionChecker::new(state.access.as_ref(), &state.config.jwt)
            .has_permission(user.user_id, user.token.as_deref(), P::ID)
            .await;
        if !allowed {
            tracing::info!(user_id = user.user_id, permission = P::ID, "Permission denied");
            return Err(AppError::Core(CoreError::Forbidden(format!(
                "Permission '{}' required",
                P::ID
            ))));
        }
        Ok(RequirePermission(user, PhantomData))
    }
}
