//! `user_sessions`: opaque session tokens, stored as digests.
//!
//! A session is live while it is unrevoked, unexpired, and its owner is
//! active. Deactivating a user therefore ends every session at once without
//! touching the session rows.

use careerdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::session::{CreateSession, UserSession};

const COLUMNS: &str = "s.id, s.user_id, s.refresh_token_hash, s.expires_at, s.is_revoked, \
                       s.user_agent, s.ip_address, s.created_at, s.updated_at";

const LIVE: &str = "s.refresh_token_hash = $1
                    AND s.is_revoked = false
                    AND s.expires_at > NOW()
                    AND u.id = s.user_id
                    AND u.is_active = true";

pub struct SessionRepo;

impl SessionRepo {
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<UserSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_sessions AS s
                (user_id, refresh_token_hash, expires_at, user_agent, ip_address)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(input.user_id)
            .bind(&input.refresh_token_hash)
            .bind(input.expires_at)
            .bind(&input.user_agent)
            .bind(&input.ip_address)
            .fetch_one(pool)
            .await
    }

    /// The live session whose token digests to `token_hash`.
    pub async fn find_live(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_sessions s, users u WHERE {LIVE}");
        sqlx::query_as::<_, UserSession>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Revoke a live session and return its owner, in one statement.
    ///
    /// Of two concurrent calls with the same token, exactly one gets `Some`.
    pub async fn consume(pool: &PgPool, token_hash: &str) -> Result<Option<DbId>, sqlx::Error> {
        let query = format!(
            "UPDATE user_sessions s SET is_revoked = true
             FROM users u
             WHERE {LIVE}
             RETURNING s.user_id"
        );
        sqlx::query_scalar::<_, DbId>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Revoke every unrevoked session of a user. Returns how many were revoked.
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_sessions SET is_revoked = true
             WHERE user_id = $1 AND is_revoked = false",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
