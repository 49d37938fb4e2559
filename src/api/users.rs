use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::access::Caller;
use super::{ApiError, ApiResponse, AppState, CreatedResponse};
use crate::db::UserSummary;
use crate::domain::{Role, lenient};
use crate::services::NewUser;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub role: Role,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub password: String,
}

/// GET /users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<UserSummary>>>, ApiError> {
    let users = state.auth_service().list_users().await?;
    Ok(Json(ApiResponse::success(users)))
}

/// POST /users
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Json(payload): Json<NewUser>,
) -> Result<Json<ApiResponse<CreatedResponse>>, ApiError> {
    let id = state
        .auth_service()
        .create_user(&caller.actor(), payload)
        .await?;
    Ok(Json(ApiResponse::success(CreatedResponse { id })))
}

/// PUT /users/{id}
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .auth_service()
        .update_user(&caller.actor(), id, payload.role, payload.is_active)
        .await?;
    Ok(Json(ApiResponse::ok()))
}

/// PUT /users/{id}/reset-password
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<i32>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .auth_service()
        .reset_password(&caller.actor(), id, &payload.password)
        .await?;
    Ok(Json(ApiResponse::ok()))
}
