//! Handlers for `/auth/2fa` (setup, verify, disable, status).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use careerdesk_core::audit::{actions, resources};
use careerdesk_core::error::CoreError;
use careerdesk_core::two_factor::TwoFactorError;
use careerdesk_db::models::user::Identity;
use careerdesk_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::audit::{record, AuditEvent, RequestMeta};
use crate::auth::password::verify_password;
use crate::auth::two_factor::{Enrollment, TwoFactorService};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct DisableRequest {
    pub password: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub state: &'static str,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The caller's identity, which must exist and be active.
async fn active_identity(state: &AppState, user: &AuthUser) -> AppResult<Identity> {
    let identity = state
        .access
        .find_identity(user.user_id)
        .await
        .map_err(|e| TwoFactorError::Store(e.to_string()))?
        .ok_or_else(AppError::unauthenticated)?;

    if !identity.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }
    Ok(identity)
}

fn service(state: &AppState) -> TwoFactorService<'_> {
    TwoFactorService::new(state.two_factor.as_ref(), &state.config.two_factor)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/auth/2fa/status
pub async fn status(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<StatusResponse>> {
    let current = service(&state).state(user.user_id).await?;
    Ok(Json(StatusResponse {
        state: current.as_str(),
    }))
}

/// POST /api/v1/auth/2fa/setup
///
/// Start enrollment. Returns the secret, otpauth URL, and backup codes; this
/// is the only time the backup codes are shown.
pub async fn setup(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<Enrollment>> {
    let identity = active_identity(&state, &user).await?;
    let enrollment = service(&state).setup(&identity).await?;
    Ok(Json(enrollment))
}

/// POST /api/v1/auth/2fa/verify
///
/// Confirm the pending enrollment with a current code.
pub async fn verify(
    State(state): State<AppState>,
    user: AuthUser,
    meta: RequestMeta,
    Json(input): Json<VerifyRequest>,
) -> AppResult<Json<SuccessResponse>> {
    let identity = active_identity(&state, &user).await?;
    service(&state).verify(&identity, &input.token).await?;

    record(
        state.audit.as_ref(),
        AuditEvent {
            actor: Some(identity.id),
            action: actions::TWO_FACTOR_ENABLE,
            resource: resources::TWO_FACTOR,
            resource_id: Some(identity.id.to_string()),
            details: json!({}),
        },
        &meta,
    )
    .await;

    Ok(Json(SuccessResponse { success: true }))
}

/// POST /api/v1/auth/2fa/disable
///
/// Requires the account password and a current code (or backup code).
pub async fn disable(
    State(state): State<AppState>,
    user: AuthUser,
    meta: RequestMeta,
    Json(input): Json<DisableRequest>,
) -> AppResult<StatusCode> {
    let identity = active_identity(&state, &user).await?;

    let account = UserRepo::find_by_id(&state.pool, identity.id)
        .await?
        .ok_or_else(AppError::unauthenticated)?;
    let password_valid = verify_password(&input.password, &account.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid password".into(),
        )));
    }

    service(&state).disable(&identity, &input.code).await?;

    record(
        state.audit.as_ref(),
        AuditEvent {
            actor: Some(identity.id),
            action: actions::TWO_FACTOR_DISABLE,
            resource: resources::TWO_FACTOR,
            resource_id: Some(identity.id.to_string()),
            details: json!({}),
        },
        &meta,
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
