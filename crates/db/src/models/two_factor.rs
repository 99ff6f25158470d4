//! Two-factor enrollment row.

use careerdesk_core::two_factor::{TwoFactorError, TwoFactorStatus};
use careerdesk_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from `user_two_factor`. Never serialized: it holds the secret.
#[derive(Debug, Clone, FromRow)]
pub struct UserTwoFactor {
    pub user_id: DbId,
    pub secret: String,
    pub status: String,
    pub backup_code_hashes: Vec<String>,
    pub last_used_step: Option<i64>,
    pub enabled_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserTwoFactor {
    /// Parsed status column.
    pub fn status(&self) -> Result<TwoFactorStatus, TwoFactorError> {
        self.status.parse()
    }
}
