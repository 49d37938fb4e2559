//! Error type shared by the record-keeping services.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    /// A foreign-key constraint refused the change.
    #[error("{0}")]
    Referential(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl RecordError {
    #[must_use]
    pub const fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound { entity, id }
    }

    /// Replaces the generic referential message with one that names the cause.
    #[must_use]
    pub fn explain_referential(self, message: &str) -> Self {
        match self {
            Self::Referential(_) => Self::Referential(message.to_string()),
            other => other,
        }
    }
}

impl From<DbErr> for RecordError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                Self::Referential("The change conflicts with related records".to_string())
            }
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                Self::Conflict("A record with the same key already exists".to_string())
            }
            _ => Self::Database(err.to_string()),
        }
    }
}
