//! Repository for the append-only `audit_logs` table.

use careerdesk_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::audit::{AuditLog, AuditQuery, CreateAuditLog};

/// Column list for `audit_logs` SELECT queries.
const COLUMNS: &str = "\
    id, user_id, action, resource, resource_id, details, \
    ip_address, user_agent, created_at";

/// Default and maximum page sizes for [`AuditLogRepo::query`].
const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 500;

/// Provides append and query operations for audit logs. There is no update
/// or delete: the table rejects both.
pub struct AuditLogRepo;

impl AuditLogRepo {
    /// Append one entry.
    pub async fn insert(pool: &PgPool, entry: &CreateAuditLog) -> Result<AuditLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO audit_logs (user_id, action, resource, resource_id, details, ip_address, user_agent)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(entry.user_id)
            .bind(&entry.action)
            .bind(&entry.resource)
            .bind(&entry.resource_id)
            .bind(&entry.details)
            .bind(&entry.ip_address)
            .bind(&entry.user_agent)
            .fetch_one(pool)
            .await
    }

    /// Query audit logs with filtering and pagination, newest first.
    pub async fn query(pool: &PgPool, params: &AuditQuery) -> Result<Vec<AuditLog>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = params.offset.unwrap_or(0).max(0);

        let (where_clause, bind_values, next_idx) = build_audit_filter(params);
        let query = format!(
            "SELECT {COLUMNS} FROM audit_logs {where_clause} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${next_idx} OFFSET ${}",
            next_idx + 1
        );

        let mut q = sqlx::query_as::<_, AuditLog>(&query);
        for value in bind_values {
            q = match value {
                BindValue::BigInt(v) => q.bind(v),
                BindValue::Text(v) => q.bind(v),
                BindValue::Timestamp(v) => q.bind(v),
            };
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count audit logs matching the given filter (for pagination metadata).
    pub async fn count(pool: &PgPool, params: &AuditQuery) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_audit_filter(params);
        let query = format!("SELECT COUNT(*)::BIGINT FROM audit_logs {where_clause}");

        let mut q = sqlx::query_scalar::<_, i64>(&query);
        for value in bind_values {
            q = match value {
                BindValue::BigInt(v) => q.bind(v),
                BindValue::Text(v) => q.bind(v),
                BindValue::Timestamp(v) => q.bind(v),
            };
        }
        q.fetch_one(pool).await
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built audit log queries.
enum BindValue {
    BigInt(DbId),
    Text(String),
    Timestamp(Timestamp),
}

/// Build the WHERE clause, its bind values in order, and the next free
/// placeholder index.
fn build_audit_filter(params: &AuditQuery) -> (String, Vec<BindValue>, usize) {
    let mut conditions: Vec<String> = Vec::new();
    let mut values: Vec<BindValue> = Vec::new();

    if let Some(user_id) = params.user_id {
        values.push(BindValue::BigInt(user_id));
        conditions.push(format!("user_id = ${}", values.len()));
    }
    if let Some(action) = &params.action {
        values.push(BindValue::Text(action.clone()));
        conditions.push(format!("action = ${}", values.len()));
    }
    if let Some(resource) = &params.resource {
        values.push(BindValue::Text(resource.clone()));
        conditions.push(format!("resource = ${}", values.len()));
    }
    if let Some(from) = params.from {
        values.push(BindValue::Timestamp(from));
        conditions.push(format!("created_at >= ${}", values.len()));
    }
    if let Some(to) = params.to {
        values.push(BindValue::Timestamp(to));
        conditions.push(format!("created_at <= ${}", values.len()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    let next_idx = values.len() + 1;
    (where_clause, values, next_idx)
}
