//! Repository for the `roles` and `user_roles` tables.

use careerdesk_core::roles::RoleName;
use careerdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::role::{Role, UserRoleAssignment};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, created_at, updated_at";

/// Provides role lookups and user-role assignment.
pub struct RoleRepo;

impl RoleRepo {
    /// Find a role by name.
    pub async fn find_by_name(pool: &PgPool, name: RoleName) -> Result<Option<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles WHERE name = $1");
        sqlx::query_as::<_, Role>(&query)
            .bind(name.as_str())
            .fetch_optional(pool)
            .await
    }

    /// List all roles ordered by ID ascending.
    pub async fn list(pool: &PgPool) -> Result<Vec<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles ORDER BY id ASC");
        sqlx::query_as::<_, Role>(&query).fetch_all(pool).await
    }

    /// Role names held by a user, but only while the user exists and is active.
    ///
    /// Missing and deactivated users both yield an empty list in one query.
    pub async fn active_names_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT r.name
             FROM user_roles ur
             JOIN roles r ON r.id = ur.role_id
             JOIN users u ON u.id = ur.user_id
             WHERE ur.user_id = $1 AND u.is_active = true
             ORDER BY r.id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// All role assignments for a user, regardless of the user's active flag.
    pub async fn assignments_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<UserRoleAssignment>, sqlx::Error> {
        sqlx::query_as::<_, UserRoleAssignment>(
            "SELECT ur.user_id, ur.role_id, r.name AS role_name, ur.granted_by, ur.created_at
             FROM user_roles ur
             JOIN roles r ON r.id = ur.role_id
             WHERE ur.user_id = $1
             ORDER BY r.id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Grant a role to a user. Returns `false` if the user already held it.
    pub async fn assign_to_user(
        pool: &PgPool,
        user_id: DbId,
        role: RoleName,
        granted_by: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO user_roles (user_id, role_id, granted_by)
             SELECT $1, r.id, $3 FROM roles r WHERE r.name = $2
             ON CONFLICT (user_id, role_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(role.as_str())
        .bind(granted_by)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a role from a user. Returns `true` if a row was deleted.
    pub async fn revoke_from_user(
        pool: &PgPool,
        user_id: DbId,
        role: RoleName,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM user_roles ur
             USING roles r
             WHERE ur.role_id = r.id AND ur.user_id = $1 AND r.name = $2",
        )
        .bind(user_id)
        .bind(role.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
