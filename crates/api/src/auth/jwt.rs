//! Access tokens and session tokens.
//!
//! Access tokens are short-lived HS256 JWTs issued by this service. Their
//! `roles` claim is what the role resolver trusts on its fast path, so a
//! token is only accepted when signature, issuer, and expiry all check out.
//!
//! Session tokens are opaque and long-lived. The client keeps the plaintext
//! (cookie or refresh body); the database only ever sees its digest.

use careerdesk_core::hashing::hash_token;
use careerdesk_core::types::DbId;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `iss` claim written into and required from every access token.
pub const TOKEN_ISSUER: &str = "careerdesk-access";

/// Clock skew tolerated when checking `exp`, in seconds.
const EXPIRY_LEEWAY_SECS: u64 = 5;

/// Payload of an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Identity the token was issued to.
    pub sub: DbId,
    /// Role names held at issue time. Older tokens may omit the claim.
    #[serde(default)]
    pub roles: Vec<String>,
    pub iss: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HS256 signing secret.
    pub secret: String,
    pub access_token_expiry_mins: i64,
    pub session_expiry_days: i64,
}

impl JwtConfig {
    /// Reads `ACCESS_TOKEN_SECRET` (required), `ACCESS_TOKEN_TTL_MINS`
    /// (default 15) and `SESSION_TTL_DAYS` (default 7).
    ///
    /// # Panics
    ///
    /// On a missing or empty secret, or a non-numeric lifetime.
    pub fn from_env() -> Self {
        let secret = std::env::var("ACCESS_TOKEN_SECRET")
            .expect("ACCESS_TOKEN_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "ACCESS_TOKEN_SECRET must not be empty");

        Self {
            secret,
            access_token_expiry_mins: env_i64("ACCESS_TOKEN_TTL_MINS", 15),
            session_expiry_days: env_i64("SESSION_TTL_DAYS", 7),
        }
    }

    /// Access token lifetime in seconds, as reported to clients.
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::days(self.session_expiry_days)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        // `sub` is numeric, which jsonwebtoken does not count as present.
        // The resolver compares it against the caller instead.
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation.leeway = EXPIRY_LEEWAY_SECS;
        validation
    }
}

fn env_i64(key: &str, default: i64) -> i64 {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a whole number, got '{raw}'")),
        Err(_) => default,
    }
}

/// Sign an access token for `user_id` carrying `roles`.
pub fn generate_access_token(
    user_id: DbId,
    roles: &[String],
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let issued_at = Utc::now();
    let claims = Claims {
        sub: user_id,
        roles: roles.to_vec(),
        iss: TOKEN_ISSUER.to_string(),
        exp: (issued_at + Duration::minutes(config.access_token_expiry_mins)).timestamp(),
        iat: issued_at.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Decode an access token, checking signature, issuer, and expiry.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &config.validation(),
    )
    .map(|data| data.claims)
}

/// A fresh session token and the digest to persist for it.
pub fn generate_session_token() -> (String, String) {
    let plaintext = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
    let digest = hash_token(&plaintext);
    (plaintext, digest)
}
