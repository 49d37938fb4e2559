use axum::{Json, extract::State};
use serde::Deserialize;
use std::sync::Arc;

use super::access::{Caller, ClientAddress};
use super::{ApiError, ApiResponse, AppState};
use crate::domain::Identity;
use crate::services::{AuthError, LoginResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::Unauthorized(err.to_string()),
            AuthError::Locked | AuthError::Inactive => Self::Forbidden(err.to_string()),
            AuthError::UserNotFound(id) => Self::not_found("User", id),
            AuthError::Validation(msg) => Self::validation(msg),
            AuthError::Conflict(msg) => Self::Conflict(msg),
            AuthError::Database(msg) => Self::DatabaseError(msg),
            AuthError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    ClientAddress(address): ClientAddress,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResult>>, ApiError> {
    if payload.username.trim().is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let result = state
        .auth_service()
        .login(payload.username.trim(), &payload.password, &address)
        .await?;

    Ok(Json(ApiResponse::success(result)))
}

/// GET /auth/me
pub async fn me(caller: Caller) -> Json<ApiResponse<Identity>> {
    Json(ApiResponse::success(caller.identity))
}
