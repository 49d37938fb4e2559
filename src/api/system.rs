//! Process health probes.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

use super::{ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub struct HealthLiveResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReadyResponse {
    pub ready: bool,
    pub database: bool,
    pub version: &'static str,
    pub uptime_secs: u64,
}

/// `GET /api/system/health/live`
pub async fn health_live() -> impl IntoResponse {
    Json(ApiResponse::success(HealthLiveResponse { status: "alive" }))
}

/// `GET /api/system/health/ready`
///
/// Ready once the database answers.
pub async fn health_ready(State(state): State<Arc<AppState>>) -> Response {
    let database = state.store().ping().await.is_ok();
    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ApiResponse::success(HealthReadyResponse {
            ready: database,
            database,
            version: env!("CARGO_PKG_VERSION"),
            uptime_secs: state.start_time.elapsed().as_secs(),
        })),
    )
        .into_response()
}
