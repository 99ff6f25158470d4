//! Store traits consumed by the authorization layer.
//!
//! Handlers and services hold `Arc<dyn …Store>` so tests can substitute an
//! in-memory double and observe exactly which lookups happen. [`PgStore`]
//! is the production implementation and delegates to the repositories.

use async_trait::async_trait;
use careerdesk_core::types::DbId;

use crate::models::audit::CreateAuditLog;
use crate::models::two_factor::UserTwoFactor;
use crate::models::user::Identity;
use crate::repositories::{AuditLogRepo, PermissionRepo, RoleRepo, TwoFactorRepo, UserRepo};
use crate::DbPool;

/// Identity and role/permission reads.
#[async_trait]
pub trait AccessStore: Send + Sync {
    /// Look up an identity by id, active or not.
    async fn find_identity(&self, user_id: DbId) -> Result<Option<Identity>, sqlx::Error>;

    /// Role names held by an active identity. Missing or inactive
    /// identities yield an empty list.
    async fn active_role_names(&self, user_id: DbId) -> Result<Vec<String>, sqlx::Error>;

    /// Whether any of `role_names` has an edge to `permission_id`.
    async fn any_role_grants(
        &self,
        role_names: &[String],
        permission_id: &str,
    ) -> Result<bool, sqlx::Error>;
}

/// Two-factor enrollment persistence. Each write is a conditional
/// transition that reports whether it applied.
#[async_trait]
pub trait TwoFactorStore: Send + Sync {
    async fn find_two_factor(&self, user_id: DbId) -> Result<Option<UserTwoFactor>, sqlx::Error>;

    /// Replace or create a pending enrollment. `false` if already enabled.
    async fn save_pending(
        &self,
        user_id: DbId,
        secret: &str,
        backup_code_hashes: &[String],
    ) -> Result<bool, sqlx::Error>;

    /// Pending-with-`secret` to enabled. `false` if the row moved on.
    async fn enable(&self, user_id: DbId, secret: &str, step: i64) -> Result<bool, sqlx::Error>;

    /// Record a used step. `false` if `step` is not newer than the last one.
    async fn advance_step(&self, user_id: DbId, step: i64) -> Result<bool, sqlx::Error>;

    /// Remove a backup code hash. `false` if it was not there.
    async fn consume_backup_code(&self, user_id: DbId, code_hash: &str) -> Result<bool, sqlx::Error>;

    /// Delete the enrollment.
    async fn remove_two_factor(&self, user_id: DbId) -> Result<bool, sqlx::Error>;
}

/// Append-only audit sink.
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn append(&self, entry: CreateAuditLog) -> Result<(), sqlx::Error>;
}

/// PostgreSQL-backed implementation of every store trait.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessStore for PgStore {
    async fn find_identity(&self, user_id: DbId) -> Result<Option<Identity>, sqlx::Error> {
        UserRepo::find_identity(&self.pool, user_id).await
    }

    async fn active_role_names(&self, user_id: DbId) -> Result<Vec<String>, sqlx::Error> {
        RoleRepo::active_names_for_user(&self.pool, user_id).await
    }

    async fn any_role_grants(
        &self,
        role_names: &[String],
        permission_id: &str,
    ) -> Result<bool, sqlx::Error> {
        PermissionRepo::any_role_grants(&self.pool, role_names, permission_id).await
    }
}

#[async_trait]
impl TwoFactorStore for PgStore {
    async fn find_two_factor(&self, user_id: DbId) -> Result<Option<UserTwoFactor>, sqlx::Error> {
        TwoFactorRepo::find(&self.pool, user_id).await
    }

    async fn save_pending(
        &self,
        user_id: DbId,
        secret: &str,
        backup_code_hashes: &[String],
    ) -> Result<bool, sqlx::Error> {
        TwoFactorRepo::save_pending(&self.pool, user_id, secret, backup_code_hashes).await
    }

    async fn enable(&self, user_id: DbId, secret: &str, step: i64) -> Result<bool, sqlx::Error> {
        TwoFactorRepo::enable(&self.pool, user_id, secret, step).await
    }

    async fn advance_step(&self, user_id: DbId, step: i64) -> Result<bool, sqlx::Error> {
        TwoFactorRepo::advance_step(&self.pool, user_id, step).await
    }

    async fn consume_backup_code(&self, user_id: DbId, code_hash: &str) -> Result<bool, sqlx::Error> {
        TwoFactorRepo::consume_backup_code(&self.pool, user_id, code_hash).await
    }

    async fn remove_two_factor(&self, user_id: DbId) -> Result<bool, sqlx::Error> {
        TwoFactorRepo::delete(&self.pool, user_id).await
    }
}

#[async_trait]
impl AuditStore for PgStore {
    async fn append(&self, entry: CreateAuditLog) -> Result<(), sqlx::Error> {
        AuditLogRepo::insert(&self.pool, &entry).await.map(|_| ())
    }
}
