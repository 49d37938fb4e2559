use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::access::Caller;
use super::validation::{optional_text, required_id, required_text};
use super::{ApiError, ApiResponse, AppState, CreatedResponse};
use crate::db::repositories::visit::{NewVisit, VisitRow};
use crate::domain::{lenient, timestamp_now};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRequest {
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub student_id: Option<i32>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub diagnosis: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub treatment: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub parac_syrup: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub parac_tab: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub hyoscine: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub referred: bool,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub referral_time: Option<String>,
}

/// GET /visits
pub async fn list_visits(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<VisitRow>>>, ApiError> {
    let visits = state.visit_service().list().await?;
    Ok(Json(ApiResponse::success(visits)))
}

/// POST /visits
pub async fn create_visit(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Json(payload): Json<VisitRequest>,
) -> Result<Json<ApiResponse<CreatedResponse>>, ApiError> {
    let visit = NewVisit {
        student_id: required_id(payload.student_id, "studentId")?,
        diagnosis: required_text(payload.diagnosis, "Diagnosis")?,
        treatment: required_text(payload.treatment, "Treatment")?,
        parac_syrup: payload.parac_syrup,
        parac_tab: payload.parac_tab,
        hyoscine: payload.hyoscine,
        referred: payload.referred,
        referral_time: optional_text(payload.referral_time),
        date_time: timestamp_now(),
        created_by_user_id: Some(caller.identity.id),
    };

    let id = state.visit_service().create(&caller.actor(), visit).await?;
    Ok(Json(ApiResponse::success(CreatedResponse { id })))
}

/// PUT /visits/{id}/whatsapp
pub async fn mark_notified(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .visit_service()
        .mark_notified(&caller.actor(), id)
        .await?;
    Ok(Json(ApiResponse::ok()))
}

/// DELETE /visits/{id}
pub async fn delete_visit(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.visit_service().delete(&caller.actor(), id).await?;
    Ok(Json(ApiResponse::ok()))
}
