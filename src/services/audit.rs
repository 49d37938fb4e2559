//! Append-only audit trail.
//!
//! Every mutating service call records exactly one entry through [`record`],
//! on the same connection or transaction as the mutation. A failed audit
//! insert is returned to the caller, which drops its transaction.

use sea_orm::{ConnectionTrait, DbErr};
use tracing::debug;

use crate::db::repositories::audit::{AuditRepository, NewAuditEntry};
use crate::db::{AuditEntryRow, Store};
use crate::domain::{Actor, AuditAction, timestamp_now};

/// Entries returned by [`AuditService::recent`].
pub const RECENT_LIMIT: u64 = 500;

pub async fn record<C: ConnectionTrait>(
    conn: &C,
    actor: &Actor,
    action: AuditAction,
    table: &str,
    record_id: Option<i32>,
) -> Result<(), DbErr> {
    AuditRepository::new(conn)
        .insert(NewAuditEntry {
            user_id: actor.user_id,
            action_type: action.as_str(),
            table_name: table,
            record_id,
            date_time: timestamp_now(),
            ip_address: &actor.address,
        })
        .await?;

    metrics::counter!("clinicdesk_audit_entries_total", "action" => action.as_str())
        .increment(1);
    debug!(action = %action, table, ?record_id, user_id = ?actor.user_id, "Audit entry recorded");

    Ok(())
}

/// Read side of the audit trail.
pub struct AuditService {
    store: Store,
}

impl AuditService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Newest first, bounded to [`RECENT_LIMIT`].
    pub async fn recent(&self) -> Result<Vec<AuditEntryRow>, DbErr> {
        self.store.audit().list_recent(RECENT_LIMIT).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::temp_store;
    use crate::domain::audit::tables;

    #[tokio::test]
    async fn entries_list_newest_first_with_username() {
        let store = temp_store().await;

        record(
            &store.conn,
            &Actor::new(None, "10.0.0.9"),
            AuditAction::LoginFailedUserNotFound,
            tables::USERS,
            None,
        )
        .await
        .unwrap();
        record(
            &store.conn,
            &Actor::new(Some(1), "10.0.0.1"),
            AuditAction::UpdateSettings,
            tables::SETTINGS,
            Some(1),
        )
        .await
        .unwrap();

        let entries = AuditService::new(store).recent().await.unwrap();
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].action_type, "UPDATE_SETTINGS");
        assert_eq!(entries[0].username.as_deref(), Some("admin"));
        assert_eq!(entries[0].record_id, Some(1));

        assert_eq!(entries[1].action_type, "LOGIN_FAILED_USER_NOT_FOUND");
        assert_eq!(entries[1].username, None);
        assert_eq!(entries[1].ip_address, "10.0.0.9");
    }

    #[tokio::test]
    async fn listing_is_capped() {
        let store = temp_store().await;
        let actor = Actor::cli();
        for _ in 0..(RECENT_LIMIT + 5) {
            record(&store.conn, &actor, AuditAction::BackupData, tables::ALL, None)
                .await
                .unwrap();
        }

        let entries = AuditService::new(store).recent().await.unwrap();
        assert_eq!(entries.len() as u64, RECENT_LIMIT);
    }
}
