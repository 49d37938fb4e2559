//! School settings and whole-database maintenance.

use axum::{
    Json,
    extract::State,
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use super::access::Caller;
use super::{ApiError, ApiResponse, AppState};
use crate::db::repositories::settings::SettingsFields;
use crate::domain::lenient;
use crate::entities::settings;
use crate::services::{MaintenanceError, Snapshot};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRequest {
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub school_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub supervisor_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub logo_path: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub daily_closing_time: Option<String>,
}

impl From<SettingsRequest> for SettingsFields {
    fn from(req: SettingsRequest) -> Self {
        Self {
            school_name: req.school_name,
            supervisor_name: req.supervisor_name,
            logo_path: req.logo_path,
            daily_closing_time: req.daily_closing_time,
        }
    }
}

impl From<MaintenanceError> for ApiError {
    fn from(err: MaintenanceError) -> Self {
        Self::internal(format!("{err}: {}", err.detail()))
    }
}

/// GET /settings
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<settings::Model>>, ApiError> {
    let current = state.settings_service().get().await?;
    Ok(Json(ApiResponse::success(current)))
}

/// PUT /settings
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Json(payload): Json<SettingsRequest>,
) -> Result<Json<ApiResponse<settings::Model>>, ApiError> {
    let updated = state
        .settings_service()
        .update(&caller.actor(), payload.into())
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

/// GET /settings/backup
///
/// Responds with the bare snapshot so the downloaded file can be posted
/// back to `/settings/restore` unchanged.
pub async fn backup(
    State(state): State<Arc<AppState>>,
    caller: Caller,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.maintenance_service().backup(&caller.actor()).await?;
    let filename = format!(
        "attachment; filename=\"clinic-backup-{}.json\"",
        chrono::Utc::now().format("%Y-%m-%d")
    );
    Ok(([(header::CONTENT_DISPOSITION, filename)], Json(snapshot)))
}

/// POST /settings/restore
pub async fn restore(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Json(snapshot): Json<Snapshot>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .maintenance_service()
        .restore(&caller.actor(), snapshot)
        .await?;
    Ok(Json(ApiResponse::ok()))
}

/// DELETE /settings/reset-year
pub async fn reset_year(
    State(state): State<Arc<AppState>>,
    caller: Caller,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .maintenance_service()
        .reset_year(&caller.actor())
        .await?;
    Ok(Json(ApiResponse::ok()))
}
