//! Handlers for the `/auth` session resource (login, refresh, logout).

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use careerdesk_core::audit::{actions, resources};
use careerdesk_core::error::CoreError;
use careerdesk_core::hashing::hash_token;
use careerdesk_core::policy::{FailClosed, GuardedOperation};
use careerdesk_core::roles::{parse_role_set, role_names};
use careerdesk_core::two_factor::{TwoFactorError, TwoFactorState};
use careerdesk_core::types::DbId;
use careerdesk_db::models::session::CreateSession;
use careerdesk_db::models::user::{Identity, User};
use careerdesk_db::repositories::{SessionRepo, UserRepo};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::audit::{record, AuditEvent, RequestMeta};
use crate::auth::jwt::{generate_access_token, generate_session_token};
use crate::auth::password::{burn_verification, verify_password};
use crate::auth::two_factor::{ChallengeMethod, TwoFactorService};
use crate::config::SessionConfig;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Maximum consecutive failed login attempts before locking the account.
const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Duration in minutes to lock an account after exceeding failed attempts.
const LOCK_DURATION_MINS: i32 = 15;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// TOTP or backup code; required once two-factor is enabled.
    pub totp_code: Option<String>,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Opaque session token; also set as the session cookie.
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Public user info embedded in [`AuthResponse`].
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with username + password (+ second factor when enabled).
/// Returns tokens and sets the session cookie.
pub async fn login(
    State(state): State<AppState>,
    meta: RequestMeta,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let invalid_credentials =
        || AppError::Core(CoreError::Unauthorized("Invalid username or password".into()));

    // 1. Find user by username.
    let Some(user) = UserRepo::find_by_username(&state.pool, &input.username).await? else {
        burn_verification(&input.password);
        return Err(invalid_credentials());
    };

    // 2. Check if the account is active.
    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    // 3. Check if the account is temporarily locked.
    if user.locked_until.is_some_and(|until| until > Utc::now()) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is temporarily locked. Try again later.".into(),
        )));
    }

    // 4. Verify password.
    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        record_failed_attempt(&state, &user).await?;
        return Err(invalid_credentials());
    }

    // 5. Second factor, when enabled.
    let identity = Identity::from(&user);
    let two_factor = TwoFactorService::new(state.two_factor.as_ref(), &state.config.two_factor);
    if two_factor.state(user.id).await? == TwoFactorState::Enabled {
        let Some(code) = input.totp_code.as_deref().filter(|c| !c.trim().is_empty()) else {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Two-factor code required".into(),
            )));
        };
        match two_factor.authenticate(&identity, code).await {
            Ok(ChallengeMethod::Totp) => {}
            Ok(ChallengeMethod::BackupCode) => {
                record(
                    state.audit.as_ref(),
                    AuditEvent {
                        actor: Some(user.id),
                        action: actions::BACKUP_CODE_REDEEM,
                        resource: resources::TWO_FACTOR,
                        resource_id: Some(user.id.to_string()),
                        details: json!({}),
                    },
                    &meta,
                )
                .await;
            }
            Err(TwoFactorError::InvalidCode) => {
                record_failed_attempt(&state, &user).await?;
                return Err(AppError::Core(CoreError::Unauthorized(
                    "Invalid two-factor code".into(),
                )));
            }
            Err(e) => return Err(e.into()),
        }
    }

    // 6. On success: reset failed count, set last_login_at.
    UserRepo::mark_login_succeeded(&state.pool, user.id).await?;

    record(
        state.audit.as_ref(),
        AuditEvent {
            actor: Some(user.id),
            action: actions::LOGIN,
            resource: resources::SESSION,
            resource_id: None,
            details: json!({ "username": user.username }),
        },
        &meta,
    )
    .await;

    // 7. Generate tokens and create session.
    issue_session(&state, &identity, &meta).await
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid session token for new tokens (rotation).
pub async fn refresh(
    State(state): State<AppState>,
    meta: RequestMeta,
    Json(input): Json<RefreshRequest>,
) -> AppResult<impl IntoResponse> {
    // Revoking and reading the owner is one statement, so only one
    // concurrent refresh of the same token wins.
    let user_id = SessionRepo::consume(&state.pool, &hash_token(&input.refresh_token))
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    let identity = UserRepo::find_identity(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    if !identity.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    issue_session(&state, &identity, &meta).await
}

/// POST /api/v1/auth/logout
///
/// Revoke all sessions for the caller and clear the session cookie.
pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
    meta: RequestMeta,
) -> AppResult<impl IntoResponse> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, auth_user.user_id).await?;

    record(
        state.audit.as_ref(),
        AuditEvent {
            actor: Some(auth_user.user_id),
            action: actions::LOGOUT,
            resource: resources::SESSION,
            resource_id: None,
            details: json!({ "revoked_sessions": revoked }),
        },
        &meta,
    )
    .await;

    Ok((
        [(SET_COOKIE, clear_session_cookie(&state.config.session))],
        StatusCode::NO_CONTENT,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Count a failed attempt; the repository locks the account at the threshold.
async fn record_failed_attempt(state: &AppState, user: &User) -> AppResult<()> {
    let (failures, locked_until) = UserRepo::register_failed_login(
        &state.pool,
        user.id,
        MAX_FAILED_ATTEMPTS,
        LOCK_DURATION_MINS,
    )
    .await?;
    if failures >= MAX_FAILED_ATTEMPTS {
        tracing::warn!(
            user_id = user.id,
            failures,
            ?locked_until,
            "Account locked after failed logins",
        );
    }
    Ok(())
}

/// Generate access + session tokens, persist the session row, and build the
/// response with the session cookie set.
async fn issue_session(
    state: &AppState,
    identity: &Identity,
    meta: &RequestMeta,
) -> AppResult<impl IntoResponse> {
    let names = state
        .access
        .active_role_names(identity.id)
        .await
        .or_fail_closed(GuardedOperation::ResolveRoles);
    let roles = role_names(&parse_role_set(names));

    let access_token = generate_access_token(identity.id, &roles, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (session_token, session_hash) = generate_session_token();
    let expires_at = Utc::now() + state.config.jwt.session_ttl();

    let session_input = CreateSession {
        user_id: identity.id,
        refresh_token_hash: session_hash,
        expires_at,
        user_agent: meta.user_agent.clone(),
        ip_address: meta.ip_address.clone(),
    };
    SessionRepo::create(&state.pool, &session_input).await?;

    let cookie = session_cookie(
        &state.config.session,
        &session_token,
        state.config.jwt.session_ttl().num_seconds(),
    );

    let body = AuthResponse {
        access_token,
        refresh_token: session_token,
        expires_in: state.config.jwt.access_ttl_secs(),
        user: UserInfo {
            id: identity.id,
            username: identity.username.clone(),
            email: identity.email.clone(),
            roles,
        },
    };

    Ok(([(SET_COOKIE, cookie)], Json(body)))
}

/// `Set-Cookie` value carrying the session token.
pub fn session_cookie(config: &SessionConfig, token: &str, max_age_secs: i64) -> String {
    let secure = if config.cookie_secure { "; Secure" } else { "" };
    format!(
        "{}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}{secure}",
        config.cookie_name
    )
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(config: &SessionConfig) -> String {
    session_cookie(config, "", 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secure: bool) -> SessionConfig {
        SessionConfig {
            cookie_name: "session".into(),
            cookie_secure: secure,
        }
    }

    #[test]
    fn session_cookie_is_http_only() {
        let cookie = session_cookie(&config(true), "abc", 60);
        assert_eq!(
            cookie,
            "session=abc; Path=/; HttpOnly; SameSite=Lax; Max-Age=60; Secure"
        );
    }

    #[test]
    fn cleared_cookie_expires_immediately() {
        let cookie = clear_session_cookie(&config(false));
        assert_eq!(cookie, "session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    }
}
