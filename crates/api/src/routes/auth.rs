//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{access, auth};
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /login              -> login
/// POST /refresh            -> refresh
/// POST /logout             -> logout (requires auth)
/// GET  /roles              -> roles
/// GET  /permission-check   -> permission_check
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        .route("/roles", get(access::roles))
        .route("/permission-check", get(access::permission_check))
}
