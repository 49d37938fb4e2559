//! Domain service for whole-database operations: backup, restore and the
//! year-end reset.

use thiserror::Error;

use crate::domain::Actor;
use crate::services::snapshot::Snapshot;

/// Errors specific to maintenance operations.
///
/// The detail is logged server-side; only the operation name is shown to
/// clients.
#[derive(Debug, Error)]
pub enum MaintenanceError {
    #[error("{operation} failed")]
    Failed {
        operation: &'static str,
        detail: String,
    },
}

impl MaintenanceError {
    pub fn failed(operation: &'static str, detail: impl ToString) -> Self {
        Self::Failed {
            operation,
            detail: detail.to_string(),
        }
    }

    #[must_use]
    pub fn detail(&self) -> &str {
        match self {
            Self::Failed { detail, .. } => detail,
        }
    }
}

/// Domain service trait for maintenance operations. Admin only.
#[async_trait::async_trait]
pub trait MaintenanceService: Send + Sync {
    /// Reads every record table into a [`Snapshot`].
    async fn backup(&self, actor: &Actor) -> Result<Snapshot, MaintenanceError>;

    /// Replaces students, their records and the settings row with the
    /// snapshot, keeping the original ids. All or nothing.
    async fn restore(&self, actor: &Actor, snapshot: Snapshot) -> Result<(), MaintenanceError>;

    /// Deletes students and their records. Users, settings and the audit
    /// trail are kept.
    async fn reset_year(&self, actor: &Actor) -> Result<(), MaintenanceError>;
}
