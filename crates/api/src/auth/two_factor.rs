//! TOTP enrollment and verification on top of a [`TwoFactorStore`].
//!
//! Every transition is a single conditional write in the store, so two
//! concurrent requests for the same identity cannot both apply. A failed
//! operation never changes the stored state.

use careerdesk_core::two_factor::{
    build_totp, generate_backup_codes, generate_secret, hash_backup_code, looks_like_totp_code,
    matching_step, unix_now, TwoFactorError, TwoFactorState, TwoFactorStatus,
};
use careerdesk_core::types::DbId;
use careerdesk_db::models::two_factor::UserTwoFactor;
use careerdesk_db::models::user::Identity;
use careerdesk_db::stores::TwoFactorStore;
use serde::Serialize;

use crate::config::TwoFactorConfig;

/// What a freshly started enrollment hands back to the client, once.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub secret: String,
    pub otp_auth_url: String,
    pub backup_codes: Vec<String>,
}

/// Which kind of code satisfied a login challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeMethod {
    Totp,
    BackupCode,
}

pub struct TwoFactorService<'a> {
    store: &'a dyn TwoFactorStore,
    config: &'a TwoFactorConfig,
}

fn store_error(e: sqlx::Error) -> TwoFactorError {
    TwoFactorError::Store(e.to_string())
}

impl<'a> TwoFactorService<'a> {
    pub fn new(store: &'a dyn TwoFactorStore, config: &'a TwoFactorConfig) -> Self {
        Self { store, config }
    }

    async fn load(
        &self,
        user_id: DbId,
    ) -> Result<Option<(UserTwoFactor, TwoFactorStatus)>, TwoFactorError> {
        match self.store.find_two_factor(user_id).await.map_err(store_error)? {
            Some(row) => {
                let status = row.status()?;
                Ok(Some((row, status)))
            }
            None => Ok(None),
        }
    }

    /// Current state, `Unconfigured` when there is no row.
    pub async fn state(&self, user_id: DbId) -> Result<TwoFactorState, TwoFactorError> {
        let status = self.load(user_id).await?.map(|(_, status)| status);
        Ok(TwoFactorState::from(status))
    }

    /// Start (or restart) enrollment: fresh secret and backup codes, stored
    /// as `pending`. A previous pending secret stops verifying.
    pub async fn setup(&self, identity: &Identity) -> Result<Enrollment, TwoFactorError> {
        if let Some((_, TwoFactorStatus::Enabled)) = self.load(identity.id).await? {
            return Err(TwoFactorError::AlreadyEnabled);
        }

        let secret = generate_secret();
        let otp_auth_url = build_totp(&secret, &self.config.issuer, &identity.email)?.get_url();
        let backup_codes = generate_backup_codes(self.config.backup_code_count);
        let hashes: Vec<String> = backup_codes.iter().map(|c| hash_backup_code(c)).collect();

        let applied = self
            .store
            .save_pending(identity.id, &secret, &hashes)
            .await
            .map_err(store_error)?;
        if !applied {
            // Enabled between the read and the write.
            return Err(TwoFactorError::AlreadyEnabled);
        }

        tracing::info!(user_id = identity.id, "Two-factor enrollment pending");
        Ok(Enrollment {
            secret,
            otp_auth_url,
            backup_codes,
        })
    }

    /// Confirm a pending enrollment with a code from the authenticator.
    pub async fn verify(&self, identity: &Identity, code: &str) -> Result<(), TwoFactorError> {
        let (row, status) = self
            .load(identity.id)
            .await?
            .ok_or(TwoFactorError::NotConfigured)?;
        if status != TwoFactorStatus::Pending {
            return Err(TwoFactorError::NotPending);
        }

        let totp = build_totp(&row.secret, &self.config.issuer, &identity.email)?;
        let step = matching_step(&totp, code.trim(), unix_now()).ok_or_else(|| {
            tracing::debug!(user_id = identity.id, "Enrollment code rejected");
            TwoFactorError::InvalidCode
        })?;

        let applied = self
            .store
            .enable(identity.id, &row.secret, step)
            .await
            .map_err(store_error)?;
        if !applied {
            // The pending secret was replaced or confirmed concurrently.
            return Err(TwoFactorError::InvalidCode);
        }

        tracing::info!(user_id = identity.id, "Two-factor enabled");
        Ok(())
    }

    /// Check a second factor for an enabled identity.
    ///
    /// Six-digit codes are TOTP and must belong to a step newer than the last
    /// accepted one. Anything else is tried as a backup code, which is
    /// consumed on success.
    pub async fn authenticate(
        &self,
        identity: &Identity,
        code: &str,
    ) -> Result<ChallengeMethod, TwoFactorError> {
        let (row, status) = self
            .load(identity.id)
            .await?
            .ok_or(TwoFactorError::NotConfigured)?;
        if status != TwoFactorStatus::Enabled {
            return Err(TwoFactorError::NotConfigured);
        }

        let code = code.trim();
        if looks_like_totp_code(code) {
            let totp = build_totp(&row.secret, &self.config.issuer, &identity.email)?;
            let step = matching_step(&totp, code, unix_now()).ok_or(TwoFactorError::InvalidCode)?;

            if row.last_used_step.is_some_and(|last| step <= last) {
                tracing::warn!(user_id = identity.id, step, "Replayed two-factor code");
                return Err(TwoFactorError::InvalidCode);
            }
            let applied = self
                .store
                .advance_step(identity.id, step)
                .await
                .map_err(store_error)?;
            if !applied {
                return Err(TwoFactorError::InvalidCode);
            }
            return Ok(ChallengeMethod::Totp);
        }

        let consumed = self
            .store
            .consume_backup_code(identity.id, &hash_backup_code(code))
            .await
            .map_err(store_error)?;
        if !consumed {
            return Err(TwoFactorError::InvalidCode);
        }
        tracing::info!(user_id = identity.id, "Backup code redeemed");
        Ok(ChallengeMethod::BackupCode)
    }

    /// Turn two-factor off after a successful challenge.
    pub async fn disable(&self, identity: &Identity, code: &str) -> Result<(), TwoFactorError> {
        self.authenticate(identity, code).await?;
        self.store
            .remove_two_factor(identity.id)
            .await
            .map_err(store_error)?;
        tracing::info!(user_id = identity.id, "Two-factor disabled");
        Ok(())
    }
}
