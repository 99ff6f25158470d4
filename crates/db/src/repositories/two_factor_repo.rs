//! Repository for the `user_two_factor` table.
//!
//! Every state transition is a single conditional statement, so two
//! requests racing on the same identity cannot both win.

use careerdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::two_factor::UserTwoFactor;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "user_id, secret, status, backup_code_hashes, last_used_step, \
                        enabled_at, created_at, updated_at";

/// Provides the two-factor enrollment transitions.
pub struct TwoFactorRepo;

impl TwoFactorRepo {
    /// Find the enrollment row for a user. `None` means unconfigured.
    pub async fn find(pool: &PgPool, user_id: DbId) -> Result<Option<UserTwoFactor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_two_factor WHERE user_id = $1");
        sqlx::query_as::<_, UserTwoFactor>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Store a new pending secret, replacing any earlier pending one.
    ///
    /// Returns `false` (and changes nothing) if the user is already enabled.
    pub async fn save_pending(
        pool: &PgPool,
        user_id: DbId,
        secret: &str,
        backup_code_hashes: &[String],
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO user_two_factor (user_id, secret, status, backup_code_hashes)
             VALUES ($1, $2, 'pending', $3)
             ON CONFLICT (user_id) DO UPDATE SET
                secret = EXCLUDED.secret,
                backup_code_hashes = EXCLUDED.backup_code_hashes,
                last_used_step = NULL
             WHERE user_two_factor.status = 'pending'",
        )
        .bind(user_id)
        .bind(secret)
        .bind(backup_code_hashes)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Promote a pending enrollment to enabled.
    ///
    /// Only succeeds if the row is still pending with `secret`, so a verify
    /// racing a fresh setup cannot enable the replaced secret.
    pub async fn enable(
        pool: &PgPool,
        user_id: DbId,
        secret: &str,
        step: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_two_factor SET
                status = 'enabled',
                enabled_at = NOW(),
                last_used_step = $3
             WHERE user_id = $1 AND status = 'pending' AND secret = $2",
        )
        .bind(user_id)
        .bind(secret)
        .bind(step)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record a code's step as used. Returns `false` if the step is not newer
    /// than the last one accepted (a replay).
    pub async fn advance_step(pool: &PgPool, user_id: DbId, step: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_two_factor SET last_used_step = $2
             WHERE user_id = $1
               AND status = 'enabled'
               AND (last_used_step IS NULL OR last_used_step < $2)",
        )
        .bind(user_id)
        .bind(step)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a backup code hash. Returns `false` if it was not present.
    pub async fn consume_backup_code(
        pool: &PgPool,
        user_id: DbId,
        code_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_two_factor SET backup_code_hashes = array_remove(backup_code_hashes, $2)
             WHERE user_id = $1 AND status = 'enabled' AND $2 = ANY(backup_code_hashes)",
        )
        .bind(user_id)
        .bind(code_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete the enrollment, returning the user to unconfigured.
    pub async fn delete(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_two_factor WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
