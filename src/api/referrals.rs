use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::access::Caller;
use super::validation::{optional_text, required_id, required_text};
use super::{ApiError, ApiResponse, AppState, CreatedResponse};
use crate::db::repositories::referral::{NewReferral, ReferralRow};
use crate::domain::{lenient, timestamp_now};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralRequest {
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub student_id: Option<i32>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub reason: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub destination: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub age: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub history: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub referral_time: Option<String>,
}

/// GET /referrals
pub async fn list_referrals(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ReferralRow>>>, ApiError> {
    let referrals = state.referral_service().list().await?;
    Ok(Json(ApiResponse::success(referrals)))
}

/// POST /referrals
pub async fn create_referral(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Json(payload): Json<ReferralRequest>,
) -> Result<Json<ApiResponse<CreatedResponse>>, ApiError> {
    let referral = NewReferral {
        student_id: required_id(payload.student_id, "studentId")?,
        reason: required_text(payload.reason, "Reason")?,
        destination: required_text(payload.destination, "Destination")?,
        age: optional_text(payload.age),
        gender: optional_text(payload.gender),
        history: optional_text(payload.history),
        referral_time: optional_text(payload.referral_time),
        date_time: timestamp_now(),
        created_by_user_id: Some(caller.identity.id),
    };

    let id = state
        .referral_service()
        .create(&caller.actor(), referral)
        .await?;
    Ok(Json(ApiResponse::success(CreatedResponse { id })))
}

/// PUT /referrals/{id}/whatsapp
pub async fn mark_notified(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .referral_service()
        .mark_notified(&caller.actor(), id)
        .await?;
    Ok(Json(ApiResponse::ok()))
}

/// DELETE /referrals/{id}
pub async fn delete_referral(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.referral_service().delete(&caller.actor(), id).await?;
    Ok(Json(ApiResponse::ok()))
}
