use crate::auth::jwt::JwtConfig;
use careerdesk_core::two_factor::DEFAULT_BACKUP_CODE_COUNT;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Session cookie settings.
    pub session: SessionConfig,
    /// Two-factor enrollment settings.
    pub two_factor: TwoFactorConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            session: SessionConfig::from_env(),
            two_factor: TwoFactorConfig::from_env(),
        }
    }
}

/// Opaque session cookie settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Cookie carrying the opaque session token.
    pub cookie_name: String,
    /// Whether the cookie is marked `Secure` (HTTPS only).
    pub cookie_secure: bool,
}

impl SessionConfig {
    /// | Env Var                 | Default   |
    /// |-------------------------|-----------|
    /// | `SESSION_COOKIE_NAME`   | `session` |
    /// | `SESSION_COOKIE_SECURE` | `true`    |
    pub fn from_env() -> Self {
        let cookie_name =
            std::env::var("SESSION_COOKIE_NAME").unwrap_or_else(|_| "session".into());

        let cookie_secure: bool = std::env::var("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("SESSION_COOKIE_SECURE must be true or false");

        Self {
            cookie_name,
            cookie_secure,
        }
    }
}

/// TOTP enrollment settings.
#[derive(Debug, Clone)]
pub struct TwoFactorConfig {
    /// Issuer shown by authenticator apps.
    pub issuer: String,
    /// Backup codes generated per setup.
    pub backup_code_count: usize,
}

impl TwoFactorConfig {
    /// | Env Var                   | Default      |
    /// |---------------------------|--------------|
    /// | `TOTP_ISSUER`             | `CareerDesk` |
    /// | `TOTP_BACKUP_CODE_COUNT`  | `10`         |
    pub fn from_env() -> Self {
        let issuer = std::env::var("TOTP_ISSUER").unwrap_or_else(|_| "CareerDesk".into());

        let backup_code_count: usize = std::env::var("TOTP_BACKUP_CODE_COUNT")
            .unwrap_or_else(|_| DEFAULT_BACKUP_CODE_COUNT.to_string())
            .parse()
            .expect("TOTP_BACKUP_CODE_COUNT must be a valid usize");

        Self {
            issuer,
            backup_code_count,
        }
    }
}
