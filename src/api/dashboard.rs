use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::services::DashboardSummary;

/// GET /dashboard
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<DashboardSummary>>, ApiError> {
    let summary = state.dashboard_service().summary().await?;
    Ok(Json(ApiResponse::success(summary)))
}
