use std::sync::Arc;

use careerdesk_db::stores::{AccessStore, AuditStore, TwoFactorStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (sessions, login, admin reads).
    pub pool: careerdesk_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Identity and role/permission reads used by the resolver and checker.
    pub access: Arc<dyn AccessStore>,
    /// Two-factor enrollment persistence.
    pub two_factor: Arc<dyn TwoFactorStore>,
    /// Append-only audit sink.
    pub audit: Arc<dyn AuditStore>,
}

impl AppState {
    /// State backed entirely by PostgreSQL.
    pub fn with_pg_stores(pool: careerdesk_db::DbPool, config: ServerConfig) -> Self {
        let store = Arc::new(careerdesk_db::stores::PgStore::new(pool.clone()));
        Self {
            pool,
            config: Arc::new(config),
            access: store.clone(),
            two_factor: store.clone(),
            audit: store,
        }
    }
}
