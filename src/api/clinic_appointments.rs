use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::access::Caller;
use super::validation::{required_id, required_text};
use super::{ApiError, ApiResponse, AppState, CreatedResponse};
use crate::db::repositories::clinic_appointment::{ClinicAppointmentRow, NewClinicAppointment};
use crate::domain::lenient;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicAppointmentRequest {
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub student_id: Option<i32>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub health_problem: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub clinic_name: Option<String>,
}

/// GET /clinic-appointments
pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ClinicAppointmentRow>>>, ApiError> {
    let appointments = state.clinic_appointment_service().list().await?;
    Ok(Json(ApiResponse::success(appointments)))
}

/// POST /clinic-appointments
pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Json(payload): Json<ClinicAppointmentRequest>,
) -> Result<Json<ApiResponse<CreatedResponse>>, ApiError> {
    let appointment = NewClinicAppointment {
        student_id: required_id(payload.student_id, "studentId")?,
        date: required_text(payload.date, "Date")?,
        health_problem: required_text(payload.health_problem, "Health problem")?,
        clinic_name: required_text(payload.clinic_name, "Clinic name")?,
        created_by_user_id: Some(caller.identity.id),
    };

    let id = state
        .clinic_appointment_service()
        .create(&caller.actor(), appointment)
        .await?;
    Ok(Json(ApiResponse::success(CreatedResponse { id })))
}

/// PUT /clinic-appointments/{id}/whatsapp
pub async fn mark_notified(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .clinic_appointment_service()
        .mark_notified(&caller.actor(), id)
        .await?;
    Ok(Json(ApiResponse::ok()))
}

/// DELETE /clinic-appointments/{id}
pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .clinic_appointment_service()
        .delete(&caller.actor(), id)
        .await?;
    Ok(Json(ApiResponse::ok()))
}
