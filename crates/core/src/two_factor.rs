//! TOTP two-factor enrollment rules.
//!
//! Per-identity state machine:
//!
//! ```text
//! unconfigured --setup--> pending --verify--> enabled
//!                  ^         |
//!                  +--setup--+   (replaces the pending secret)
//! ```
//!
//! Codes are SHA-1, 6 digits, 30 second steps with one step of tolerance on
//! either side. Accepted steps are remembered so a code cannot be replayed.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use totp_rs::{Algorithm, Secret, TOTP};

use crate::hashing::sha256_hex;

/// Number of digits in a one-time code.
pub const CODE_DIGITS: usize = 6;
/// Seconds per TOTP step.
pub const STEP_SECS: u64 = 30;
/// Steps of clock drift tolerated on either side of "now".
pub const SKEW_STEPS: i64 = 1;
/// Backup codes issued per enrollment when not configured otherwise.
pub const DEFAULT_BACKUP_CODE_COUNT: usize = 10;

const BACKUP_CODE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Persisted enrollment status. A missing row means unconfigured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwoFactorStatus {
    Pending,
    Enabled,
}

impl TwoFactorStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TwoFactorStatus::Pending => "pending",
            TwoFactorStatus::Enabled => "enabled",
        }
    }
}

impl fmt::Display for TwoFactorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TwoFactorStatus {
    type Err = TwoFactorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TwoFactorStatus::Pending),
            "enabled" => Ok(TwoFactorStatus::Enabled),
            other => Err(TwoFactorError::Corrupt(format!("unknown status '{other}'"))),
        }
    }
}

/// Full state of an identity, including the implicit unconfigured state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwoFactorState {
    Unconfigured,
    Pending,
    Enabled,
}

impl TwoFactorState {
    pub fn as_str(self) -> &'static str {
        match self {
            TwoFactorState::Unconfigured => "unconfigured",
            TwoFactorState::Pending => "pending",
            TwoFactorState::Enabled => "enabled",
        }
    }
}

impl From<Option<TwoFactorStatus>> for TwoFactorState {
    fn from(status: Option<TwoFactorStatus>) -> Self {
        match status {
            None => TwoFactorState::Unconfigured,
            Some(TwoFactorStatus::Pending) => TwoFactorState::Pending,
            Some(TwoFactorStatus::Enabled) => TwoFactorState::Enabled,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TwoFactorError {
    #[error("two-factor authentication is not configured")]
    NotConfigured,

    #[error("no two-factor enrollment is pending")]
    NotPending,

    #[error("two-factor authentication is already enabled")]
    AlreadyEnabled,

    /// Deliberately says nothing about why the code failed.
    #[error("invalid verification code")]
    InvalidCode,

    #[error("corrupt two-factor record: {0}")]
    Corrupt(String),

    #[error("two-factor store error: {0}")]
    Store(String),
}

/// Generate a fresh 160-bit secret, base32 encoded.
pub fn generate_secret() -> String {
    Secret::generate_secret().to_encoded().to_string()
}

/// Build a TOTP verifier/URL generator for a stored base32 secret.
///
/// `skew` is zero here; [`matching_step`] walks the tolerance window itself
/// so it can report which step matched.
pub fn build_totp(secret_base32: &str, issuer: &str, account: &str) -> Result<TOTP, TwoFactorError> {
    let bytes = Secret::Encoded(secret_base32.to_string())
        .to_bytes()
        .map_err(|e| TwoFactorError::Corrupt(format!("secret: {e:?}")))?;

    TOTP::new(
        Algorithm::SHA1,
        CODE_DIGITS,
        0,
        STEP_SECS,
        bytes,
        Some(otpauth_label(issuer)),
        otpauth_label(account),
    )
    .map_err(|e| TwoFactorError::Corrupt(format!("totp: {e:?}")))
}

/// `:` separates issuer and account in otpauth URLs.
fn otpauth_label(value: &str) -> String {
    value.replace(':', "_")
}

/// Current Unix time in seconds.
pub fn unix_now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

/// Step index of a Unix time.
pub fn step_of(unix_secs: u64) -> i64 {
    (unix_secs / STEP_SECS) as i64
}

/// Whether `code` has the shape of a one-time code (6 ASCII digits).
pub fn looks_like_totp_code(code: &str) -> bool {
    code.len() == CODE_DIGITS && code.bytes().all(|b| b.is_ascii_digit())
}

/// Find the step within the tolerance window at which `code` is valid.
///
/// The current step is tried first, then the previous and next ones.
pub fn matching_step(totp: &TOTP, code: &str, now_unix: u64) -> Option<i64> {
    if !looks_like_totp_code(code) {
        return None;
    }
    let current = now_unix as i64;
    let offsets = std::iter::once(0).chain((1..=SKEW_STEPS).flat_map(|n| [-n, n]));

    for offset in offsets {
        let t = current + offset * STEP_SECS as i64;
        if t < 0 {
            continue;
        }
        if totp.check(code, t as u64) {
            return Some(step_of(t as u64));
        }
    }
    None
}

/// Generate `count` backup codes shaped `XXXX-XXXX`.
pub fn generate_backup_codes(count: usize) -> Vec<String> {
    let mut rng = rand::rng();
    (0..count)
        .map(|_| {
            let raw: String = (0..8)
                .map(|_| {
                    let idx = rng.random_range(0..BACKUP_CODE_ALPHABET.len());
                    BACKUP_CODE_ALPHABET[idx] as char
                })
                .collect();
            format!("{}-{}", &raw[..4], &raw[4..])
        })
        .collect()
}

/// Canonical form of a user-typed backup code.
pub fn normalize_backup_code(code: &str) -> String {
    code.chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Digest stored in place of a backup code.
pub fn hash_backup_code(code: &str) -> String {
    sha256_hex(normalize_backup_code(code).as_bytes())
}
