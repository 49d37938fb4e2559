use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::access::Caller;
use super::validation::{optional_text, required_id, required_text};
use super::{ApiError, ApiResponse, AppState, CreatedResponse};
use crate::db::repositories::special_case::{NewSpecialCase, SpecialCaseRow};
use crate::domain::lenient;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialCaseRequest {
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub student_id: Option<i32>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub follow_up_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub follow_up_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub symptoms: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub services: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub recommendations: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub referred: bool,
}

/// GET /special-cases
pub async fn list_special_cases(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<SpecialCaseRow>>>, ApiError> {
    let cases = state.special_case_service().list().await?;
    Ok(Json(ApiResponse::success(cases)))
}

/// POST /special-cases
pub async fn create_special_case(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Json(payload): Json<SpecialCaseRequest>,
) -> Result<Json<ApiResponse<CreatedResponse>>, ApiError> {
    let case = NewSpecialCase {
        student_id: required_id(payload.student_id, "studentId")?,
        follow_up_date: required_text(payload.follow_up_date, "Follow-up date")?,
        follow_up_type: required_text(payload.follow_up_type, "Follow-up type")?,
        symptoms: required_text(payload.symptoms, "Symptoms")?,
        services: required_text(payload.services, "Services")?,
        recommendations: optional_text(payload.recommendations),
        referred: payload.referred,
        created_by_user_id: Some(caller.identity.id),
    };

    let id = state
        .special_case_service()
        .create(&caller.actor(), case)
        .await?;
    Ok(Json(ApiResponse::success(CreatedResponse { id })))
}

/// PUT /special-cases/{id}/whatsapp
pub async fn mark_notified(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .special_case_service()
        .mark_notified(&caller.actor(), id)
        .await?;
    Ok(Json(ApiResponse::ok()))
}

/// DELETE /special-cases/{id}
pub async fn delete_special_case(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .special_case_service()
        .delete(&caller.actor(), id)
        .await?;
    Ok(Json(ApiResponse::ok()))
}
