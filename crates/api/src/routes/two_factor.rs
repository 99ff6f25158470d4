//! Route definitions for `/auth/2fa`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::two_factor;
use crate::state::AppState;

/// Routes mounted at `/auth/2fa`. All require an identity.
///
/// ```text
/// GET  /status   -> status
/// POST /setup    -> setup
/// POST /verify   -> verify
/// POST /disable  -> disable
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/status", get(two_factor::status))
        .route("/setup", post(two_factor::setup))
        .route("/verify", post(two_factor::verify))
        .route("/disable", post(two_factor::disable))
}
