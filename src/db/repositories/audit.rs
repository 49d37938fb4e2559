use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, FromQueryResult, JoinType,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::Serialize;

use crate::entities::{audit_logs, prelude::*, users};

#[derive(Debug, Clone)]
pub struct NewAuditEntry<'e> {
    pub user_id: Option<i32>,
    pub action_type: &'e str,
    pub table_name: &'e str,
    pub record_id: Option<i32>,
    pub date_time: String,
    pub ip_address: &'e str,
}

/// Audit entry with the acting user's name, when there was one.
#[derive(Debug, Clone, Serialize, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntryRow {
    pub id: i32,
    pub user_id: Option<i32>,
    pub action_type: String,
    pub table_name: String,
    pub record_id: Option<i32>,
    pub date_time: String,
    pub ip_address: String,
    pub username: Option<String>,
}

pub struct AuditRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> AuditRepository<'a, C> {
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn insert(&self, entry: NewAuditEntry<'_>) -> Result<i32, DbErr> {
        let model = audit_logs::ActiveModel {
            user_id: Set(entry.user_id),
            action_type: Set(entry.action_type.to_string()),
            table_name: Set(entry.table_name.to_string()),
            record_id: Set(entry.record_id),
            date_time: Set(entry.date_time),
            ip_address: Set(entry.ip_address.to_string()),
            ..Default::default()
        }
        .insert(self.conn)
        .await?;

        Ok(model.id)
    }

    /// Newest first, at most `limit` entries.
    pub async fn list_recent(&self, limit: u64) -> Result<Vec<AuditEntryRow>, DbErr> {
        AuditLogs::find()
            .column_as(users::Column::Username, "username")
            .join(JoinType::LeftJoin, audit_logs::Relation::User.def())
            .order_by_desc(audit_logs::Column::DateTime)
            .order_by_desc(audit_logs::Column::Id)
            .limit(limit)
            .into_model::<AuditEntryRow>()
            .all(self.conn)
            .await
    }
}
