//! Role and user-role assignment models.

use careerdesk_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A role row from the `roles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Role {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A role held by a user, joined with its name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserRoleAssignment {
    pub user_id: DbId,
    pub role_id: DbId,
    pub role_name: String,
    pub granted_by: Option<DbId>,
    pub created_at: Timestamp,
}
