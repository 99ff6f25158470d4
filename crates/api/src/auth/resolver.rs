//! Role resolution for an authenticated identity.
//!
//! A valid access token for the same identity whose `roles` claim names at
//! least one known role is trusted as-is. Anything else costs exactly one
//! store lookup, which also filters out inactive identities.
//!
//! The fast path is the one exception to "an inactive identity holds no
//! roles": a token issued before deactivation keeps its claimed roles until
//! it expires, so the window is bounded by the access token lifetime
//! (`ACCESS_TOKEN_TTL_MINS`). Session cookies and every store lookup see the
//! deactivation immediately.

use careerdesk_core::policy::{FailClosed, GuardedOperation};
use careerdesk_core::roles::{parse_role_set, RoleSet};
use careerdesk_core::types::DbId;
use careerdesk_db::stores::AccessStore;

use crate::auth::jwt::{validate_token, JwtConfig};

/// Resolves the [`RoleSet`] of an identity.
pub struct RoleResolver<'a> {
    store: &'a dyn AccessStore,
    jwt: &'a JwtConfig,
}

impl<'a> RoleResolver<'a> {
    pub fn new(store: &'a dyn AccessStore, jwt: &'a JwtConfig) -> Self {
        Self { store, jwt }
    }

    /// Roles held by `user_id`.
    ///
    /// Never fails: store errors resolve to the empty set.
    pub async fn resolve(&self, user_id: DbId, token: Option<&str>) -> RoleSet {
        if let Some(roles) = token.and_then(|t| self.roles_from_token(user_id, t)) {
            tracing::debug!(user_id, count = roles.len(), "Roles resolved from token");
            return roles;
        }

        let names = self
            .store
            .active_role_names(user_id)
            .await
            .or_fail_closed(GuardedOperation::ResolveRoles);
        let roles = parse_role_set(names);
        tracing::debug!(user_id, count = roles.len(), "Roles resolved from store");
        roles
    }

    /// The fast path. `None` means "ask the store".
    fn roles_from_token(&self, user_id: DbId, token: &str) -> Option<RoleSet> {
        let claims = match validate_token(token, self.jwt) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(user_id, error = %e, "Token unusable for role resolution");
                return None;
            }
        };
        if claims.sub != user_id {
            tracing::debug!(user_id, sub = claims.sub, "Token subject mismatch");
            return None;
        }
        let roles = parse_role_set(&claims.roles);
        (!roles.is_empty()).then_some(roles)
    }
}
