//! Audit log endpoint

use axum::Json;
use axum::extract::{Query, State};
use shared::models::{AuditEntry, AuditQuery};

use crate::api::{ApiResult, internal};
use crate::db;
use crate::state::AppState;

/// GET /api/admin/audit
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> ApiResult<Vec<AuditEntry>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let offset = query.offset.unwrap_or(0).max(0);

    let entries = db::audit::query(&state.pool, limit, offset)
        .await
        .map_err(internal)?;
    Ok(Json(entries))
}
