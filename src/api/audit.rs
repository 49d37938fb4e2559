use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::db::AuditEntryRow;

/// GET /audit
///
/// The most recent entries, newest first.
pub async fn list_entries(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<AuditEntryRow>>>, ApiError> {
    let entries = state.audit_service().recent().await?;
    Ok(Json(ApiResponse::success(entries)))
}
