use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use super::access::Caller;
use super::validation::{optional_text, required_text, validate_student_name};
use super::{ApiError, ApiResponse, AppState, CountResponse, CreatedResponse};
use crate::db::repositories::student::StudentFields;
use crate::domain::lenient;
use crate::entities::students;
use crate::roster::{self, RosterEntry, RosterError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub grade: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_special_case: bool,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub chronic_condition: Option<String>,
}

impl StudentRequest {
    fn into_fields(self) -> Result<StudentFields, ApiError> {
        Ok(StudentFields {
            name: validate_student_name(&self.name)?.to_string(),
            grade: required_text(self.grade, "Grade")?,
            phone: optional_text(self.phone),
            is_special_case: self.is_special_case,
            chronic_condition: optional_text(self.chronic_condition),
        })
    }
}

impl From<RosterError> for ApiError {
    fn from(err: RosterError) -> Self {
        Self::validation(err.to_string())
    }
}

/// GET /students
pub async fn list_students(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<students::Model>>>, ApiError> {
    let students = state.student_service().list().await?;
    Ok(Json(ApiResponse::success(students)))
}

/// POST /students
pub async fn create_student(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Json(payload): Json<StudentRequest>,
) -> Result<Json<ApiResponse<CreatedResponse>>, ApiError> {
    let id = state
        .student_service()
        .create(&caller.actor(), payload.into_fields()?)
        .await?;
    Ok(Json(ApiResponse::success(CreatedResponse { id })))
}

/// PUT /students/{id}
pub async fn update_student(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<i32>,
    Json(payload): Json<StudentRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .student_service()
        .update(&caller.actor(), id, payload.into_fields()?)
        .await?;
    Ok(Json(ApiResponse::ok()))
}

/// DELETE /students/{id}
pub async fn delete_student(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.student_service().delete(&caller.actor(), id).await?;
    Ok(Json(ApiResponse::ok()))
}

/// DELETE /students
pub async fn delete_all_students(
    State(state): State<Arc<AppState>>,
    caller: Caller,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.student_service().delete_all(&caller.actor()).await?;
    Ok(Json(ApiResponse::success(CountResponse { count })))
}

/// POST /students/bulk
///
/// Body is a JSON array of `{name, grade?, phone?}`.
pub async fn bulk_import(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Json(payload): Json<Vec<RosterEntry>>,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let candidates: Vec<RosterEntry> = payload
        .into_iter()
        .filter_map(RosterEntry::normalized)
        .collect();

    let count = state
        .student_service()
        .bulk_import(&caller.actor(), candidates)
        .await?;
    Ok(Json(ApiResponse::success(CountResponse { count })))
}

/// POST /students/import
///
/// Body is a CSV roster; see [`roster::parse`].
pub async fn import_roster(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    body: Bytes,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let candidates = roster::parse(&body)?;
    let count = state
        .student_service()
        .bulk_import(&caller.actor(), candidates)
        .await?;
    Ok(Json(ApiResponse::success(CountResponse { count })))
}

/// GET /students/export
pub async fn export_roster(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let students = state.student_service().list().await?;
    let csv = roster::export(&students).map_err(|e| ApiError::internal(e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"students.csv\"",
            ),
        ],
        csv,
    ))
}
