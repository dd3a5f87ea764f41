//! Audit log operations

use shared::models::AuditEntry;
use shared::util::now_millis;
use sqlx::PgPool;

use super::BoxError;

/// Write an audit log entry
pub async fn log(
    pool: &PgPool,
    admin_id: i64,
    action: &str,
    resource: &str,
    resource_id: Option<i64>,
    detail: Option<&serde_json::Value>,
) -> Result<(), BoxError> {
    sqlx::query(
        "INSERT INTO audit_logs (admin_id, action, resource, resource_id, detail, created_at) VALUES ($1, $2, $3, $4, $5, $6)"
    )
    .bind(admin_id)
    .bind(action)
    .bind(resource)
    .bind(resource_id)
    .bind(detail)
    .bind(now_millis())
    .execute(pool)
    .await?;
    Ok(())
}

/// Newest first
pub async fn query(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<AuditEntry>, BoxError> {
    let rows: Vec<AuditEntry> = sqlx::query_as(
        "SELECT id, admin_id, action, resource, resource_id, detail, created_at FROM audit_logs ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
