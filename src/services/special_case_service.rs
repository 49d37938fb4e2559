//! Follow-ups for students with chronic conditions.

use async_trait::async_trait;
use sea_orm::TransactionTrait;

use crate::db::Store;
use crate::db::repositories::special_case::{
    NewSpecialCase, SpecialCaseRepository, SpecialCaseRow,
};
use crate::domain::audit::tables;
use crate::domain::{Actor, AuditAction};
use crate::services::audit;
use crate::services::error::RecordError;

#[async_trait]
pub trait SpecialCaseService: Send + Sync {
    async fn list(&self) -> Result<Vec<SpecialCaseRow>, RecordError>;

    async fn create(&self, actor: &Actor, case: NewSpecialCase) -> Result<i32, RecordError>;

    async fn mark_notified(&self, actor: &Actor, id: i32) -> Result<(), RecordError>;

    async fn delete(&self, actor: &Actor, id: i32) -> Result<(), RecordError>;
}

pub struct SeaOrmSpecialCaseService {
    store: Store,
}

impl SeaOrmSpecialCaseService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SpecialCaseService for SeaOrmSpecialCaseService {
    async fn list(&self) -> Result<Vec<SpecialCaseRow>, RecordError> {
        Ok(self.store.special_cases().list().await?)
    }

    async fn create(&self, actor: &Actor, case: NewSpecialCase) -> Result<i32, RecordError> {
        let txn = self.store.conn.begin().await?;
        let id = SpecialCaseRepository::new(&txn)
            .insert(case)
            .await
            .map_err(|e| {
                RecordError::from(e).explain_referential("The selected student does not exist")
            })?;
        audit::record(
            &txn,
            actor,
            AuditAction::CreateSpecialCase,
            tables::SPECIAL_CASES,
            Some(id),
        )
        .await?;
        txn.commit().await?;
        Ok(id)
    }

    async fn mark_notified(&self, actor: &Actor, id: i32) -> Result<(), RecordError> {
        let txn = self.store.conn.begin().await?;
        if !SpecialCaseRepository::new(&txn).mark_notified(id).await? {
            return Err(RecordError::not_found("Special case", id));
        }
        audit::record(
            &txn,
            actor,
            AuditAction::WhatsappNotified,
            tables::SPECIAL_CASES,
            Some(id),
        )
        .await?;
        txn.commit().await?;
        Ok(())
    }

    async fn delete(&self, actor: &Actor, id: i32) -> Result<(), RecordError> {
        let txn = self.store.conn.begin().await?;
        if !SpecialCaseRepository::new(&txn).delete(id).await? {
            return Err(RecordError::not_found("Special case", id));
        }
        audit::record(
            &txn,
            actor,
            AuditAction::DeleteSpecialCase,
            tables::SPECIAL_CASES,
            Some(id),
        )
        .await?;
        txn.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::student::StudentFields;
    use crate::db::test_support::temp_store;

    #[tokio::test]
    async fn follow_up_lifecycle() {
        let store = temp_store().await;
        let service = SeaOrmSpecialCaseService::new(store.clone());
        let actor = Actor::new(Some(1), "");

        let student = store
            .students()
            .insert(StudentFields {
                name: "Reem".to_string(),
                grade: "6C".to_string(),
                phone: None,
                is_special_case: true,
                chronic_condition: Some("Diabetes".to_string()),
            })
            .await
            .unwrap();

        let id = service
            .create(
                &actor,
                NewSpecialCase {
                    student_id: student,
                    follow_up_date: "2025-04-10".to_string(),
                    follow_up_type: "periodic".to_string(),
                    symptoms: "Dizziness".to_string(),
                    services: "Glucose check".to_string(),
                    recommendations: None,
                    referred: false,
                    created_by_user_id: Some(1),
                },
            )
            .await
            .unwrap();

        let rows = service.list().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].chronic_condition.as_deref(), Some("Diabetes"));
        assert_eq!(rows[0].student_name, "Reem");

        service.mark_notified(&actor, id).await.unwrap();
        assert!(service.list().await.unwrap()[0].whatsapp_notified);

        service.delete(&actor, id).await.unwrap();
        let actions: Vec<_> = store
            .audit()
            .list_recent(5)
            .await
            .unwrap()
            .into_iter()
            .map(|e| (e.action_type, e.table_name))
            .collect();
        assert_eq!(
            actions,
            [
                ("DELETE_SPECIAL_CASE".to_string(), "SpecialFollowUps".to_string()),
                ("WHATSAPP_NOTIFIED".to_string(), "SpecialFollowUps".to_string()),
                ("CREATE_SPECIAL_CASE".to_string(), "SpecialFollowUps".to_string()),
            ]
        );
    }
}
