//! Repository for the `role_permissions` grant edges.

use sqlx::PgPool;

/// Read-only access to role grants.
pub struct PermissionRepo;

impl PermissionRepo {
    /// Whether any of the named roles has an edge to `permission_id`.
    ///
    /// Unknown permission ids and unknown role names simply match nothing.
    pub async fn any_role_grants(
        pool: &PgPool,
        role_names: &[String],
        permission_id: &str,
    ) -> Result<bool, sqlx::Error> {
        if role_names.is_empty() {
            return Ok(false);
        }
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                SELECT 1
                FROM role_permissions rp
                JOIN roles r ON r.id = rp.role_id
                WHERE r.name = ANY($1) AND rp.permission_id = $2
             )",
        )
        .bind(role_names)
        .bind(permission_id)
        .fetch_one(pool)
        .await
    }
}
