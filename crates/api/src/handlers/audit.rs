//! Handler for reading the audit log. Requires `audit_logs:read`.

use axum::extract::{Query, State};
use axum::Json;
use careerdesk_db::models::audit::{AuditLogPage, AuditQuery};
use careerdesk_db::repositories::AuditLogRepo;

use crate::error::AppResult;
use crate::middleware::rbac::{ReadAuditLogs, RequirePermission};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/audit-logs
///
/// Filters: `user_id`, `action`, `resource`, `from`, `to` (RFC 3339),
/// `limit`, `offset`. Newest first.
pub async fn query_audit_logs(
    State(state): State<AppState>,
    _reader: RequirePermission<ReadAuditLogs>,
    Query(params): Query<AuditQuery>,
) -> AppResult<Json<DataResponse<AuditLogPage>>> {
    let items = AuditLogRepo::query(&state.pool, &params).await?;
    let total = AuditLogRepo::count(&state.pool, &params).await?;

    Ok(Json(DataResponse {
        data: AuditLogPage { items, total },
    }))
}
