//! Permission checks: does any role held by an identity grant a permission?

use careerdesk_core::permissions::parse_permission_id;
use careerdesk_core::policy::{FailClosed, GuardedOperation};
use careerdesk_core::roles::role_names;
use careerdesk_core::types::DbId;
use careerdesk_db::stores::AccessStore;

use crate::auth::jwt::JwtConfig;
use crate::auth::resolver::RoleResolver;

/// Decides permission checks on top of a [`RoleResolver`].
pub struct PermissionChecker<'a> {
    resolver: RoleResolver<'a>,
    store: &'a dyn AccessStore,
}

impl<'a> PermissionChecker<'a> {
    pub fn new(store: &'a dyn AccessStore, jwt: &'a JwtConfig) -> Self {
        Self {
            resolver: RoleResolver::new(store, jwt),
            store,
        }
    }

    /// Whether `user_id` holds `permission_id` through any of its roles.
    ///
    /// Malformed or unknown ids, an empty role set, and store failures are
    /// all `false`.
    pub async fn has_permission(
        &self,
        user_id: DbId,
        token: Option<&str>,
        permission_id: &str,
    ) -> bool {
        if parse_permission_id(permission_id).is_none() {
            tracing::debug!(user_id, permission_id, "Malformed permission id, denying");
            return false;
        }

        let roles = self.resolver.resolve(user_id, token).await;
        if roles.is_empty() {
            return false;
        }

        let granted = self
            .store
            .any_role_grants(&role_names(&roles), permission_id)
            .await
            .or_fail_closed(GuardedOperation::CheckPermission);
        tracing::debug!(user_id, permission_id, granted, "Permission checked");
        granted
    }
}
