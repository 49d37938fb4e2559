//! Domain service for authentication and user management.
//!
//! Handles the login state machine (existence, lockout, active flag,
//! password) and administrator-driven account maintenance.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::UserSummary;
use crate::domain::{Actor, Identity, Role};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password. Deliberately indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account locked due to too many failed attempts")]
    Locked,

    #[error("Account is inactive")]
    Inactive,

    #[error("User {0} not found")]
    UserNotFound(i32),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => {
                Self::Conflict("Username already exists".to_string())
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Successful login: a session token plus who it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub token: String,
    pub user: Identity,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Runs the login checks in order: existence, lockout, active flag,
    /// password. Every outcome is audited.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for unknown users and wrong
    /// passwords, [`AuthError::Locked`] once the failure counter reaches the
    /// threshold and [`AuthError::Inactive`] for deactivated accounts.
    async fn login(
        &self,
        username: &str,
        password: &str,
        address: &str,
    ) -> Result<LoginResult, AuthError>;

    /// Lists accounts without password hashes.
    async fn list_users(&self) -> Result<Vec<UserSummary>, AuthError>;

    /// Creates an active account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Conflict`] if the username is taken and
    /// [`AuthError::Validation`] for blank usernames or short passwords.
    async fn create_user(&self, actor: &Actor, user: NewUser) -> Result<i32, AuthError>;

    /// Changes role and active flag.
    async fn update_user(
        &self,
        actor: &Actor,
        id: i32,
        role: Role,
        is_active: bool,
    ) -> Result<(), AuthError>;

    /// Sets a new password and clears the failed-login counter.
    async fn reset_password(&self, actor: &Actor, id: i32, password: &str)
    -> Result<(), AuthError>;
}
