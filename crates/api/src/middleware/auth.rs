//! Identity extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use careerdesk_core::hashing::hash_token;
use careerdesk_core::types::DbId;
use careerdesk_db::repositories::SessionRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The authenticated caller.
///
/// Resolved from a valid `Authorization: Bearer <jwt>` first, then from the
/// opaque session cookie. Handlers that must answer unauthenticated callers
/// take `Result<AuthUser, AppError>` instead.
///
/// A Bearer token is accepted on its signature and expiry alone, so an
/// identity deactivated after issue stays authenticated until the token
/// expires. The session cookie path requires an active owner.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id.
    pub user_id: DbId,
    /// The validated access token, when the caller presented one. Carries
    /// the roles claim used by the resolver's fast path.
    pub token: Option<String>,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(token) = bearer_token(parts) {
            match validate_token(token, &state.config.jwt) {
                Ok(claims) => {
                    return Ok(AuthUser {
                        user_id: claims.sub,
                        token: Some(token.to_string()),
                    })
                }
                Err(e) => tracing::debug!(error = %e, "Bearer token rejected"),
            }
        }

        let Some(session_token) = cookie_value(parts, &state.config.session.cookie_name) else {
            return Err(AppError::unauthenticated());
        };

        let session = SessionRepo::find_live(&state.pool, &hash_token(session_token))
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Session lookup failed");
                AppError::unauthenticated()
            })?
            .ok_or_else(AppError::unauthenticated)?;

        Ok(AuthUser {
            user_id: session.user_id,
            token: None,
        })
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Value of the cookie called `name`, across all `Cookie` headers.
pub fn cookie_value<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|v| !v.is_empty())
}
