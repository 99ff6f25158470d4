use std::time::Instant;

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when every dependency answered, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Round trip of the database probe, when it succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_latency_ms: Option<u64>,
}

/// GET /health
///
/// Always 200 so load balancers can tell "process up, database down" apart
/// from "process gone".
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let started = Instant::now();
    let probe = careerdesk_db::health_check(&state.pool).await;

    let db_latency_ms = match &probe {
        Ok(()) => Some(started.elapsed().as_millis() as u64),
        Err(e) => {
            tracing::warn!(error = %e, "Database health probe failed");
            None
        }
    };

    Json(HealthResponse {
        status: if probe.is_ok() { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy: probe.is_ok(),
        db_latency_ms,
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
