//! Daily clinic visits.

use async_trait::async_trait;
use sea_orm::TransactionTrait;

use crate::db::Store;
use crate::db::repositories::visit::{NewVisit, VisitRepository, VisitRow};
use crate::domain::audit::tables;
use crate::domain::{Actor, AuditAction, timestamp_now};
use crate::services::audit;
use crate::services::error::RecordError;

const UNKNOWN_STUDENT: &str = "The selected student does not exist";

#[async_trait]
pub trait VisitService: Send + Sync {
    /// Most recent first, joined with student and recorder.
    async fn list(&self) -> Result<Vec<VisitRow>, RecordError>;

    async fn create(&self, actor: &Actor, visit: NewVisit) -> Result<i32, RecordError>;

    /// Marks the guardian as notified and stamps the send time.
    async fn mark_notified(&self, actor: &Actor, id: i32) -> Result<(), RecordError>;

    async fn delete(&self, actor: &Actor, id: i32) -> Result<(), RecordError>;
}

pub struct SeaOrmVisitService {
    store: Store,
}

impl SeaOrmVisitService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl VisitService for SeaOrmVisitService {
    async fn list(&self) -> Result<Vec<VisitRow>, RecordError> {
        Ok(self.store.visits().list().await?)
    }

    async fn create(&self, actor: &Actor, visit: NewVisit) -> Result<i32, RecordError> {
        let txn = self.store.conn.begin().await?;
        let id = VisitRepository::new(&txn)
            .insert(visit)
            .await
            .map_err(|e| RecordError::from(e).explain_referential(UNKNOWN_STUDENT))?;
        audit::record(&txn, actor, AuditAction::CreateVisit, tables::VISITS, Some(id)).await?;
        txn.commit().await?;
        Ok(id)
    }

    async fn mark_notified(&self, actor: &Actor, id: i32) -> Result<(), RecordError> {
        let txn = self.store.conn.begin().await?;
        if !VisitRepository::new(&txn)
            .mark_notified(id, &timestamp_now())
            .await?
        {
            return Err(RecordError::not_found("Visit", id));
        }
        audit::record(&txn, actor, AuditAction::WhatsappNotified, tables::VISITS, Some(id)).await?;
        txn.commit().await?;
        Ok(())
    }

    async fn delete(&self, actor: &Actor, id: i32) -> Result<(), RecordError> {
        let txn = self.store.conn.begin().await?;
        if !VisitRepository::new(&txn).delete(id).await? {
            return Err(RecordError::not_found("Visit", id));
        }
        audit::record(&txn, actor, AuditAction::DeleteVisit, tables::VISITS, Some(id)).await?;
        txn.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::student::StudentFields;
    use crate::db::test_support::temp_store;

    async fn seed_student(store: &Store, name: &str) -> i32 {
        store
            .students()
            .insert(StudentFields {
                name: name.to_string(),
                grade: "3B".to_string(),
                phone: Some("99999999".to_string()),
                is_special_case: false,
                chronic_condition: None,
            })
            .await
            .unwrap()
    }

    fn visit(student_id: i32, date_time: &str) -> NewVisit {
        NewVisit {
            student_id,
            diagnosis: "Stomach ache".to_string(),
            treatment: "Hyoscine".to_string(),
            parac_syrup: false,
            parac_tab: false,
            hyoscine: true,
            referred: false,
            referral_time: None,
            date_time: date_time.to_string(),
            created_by_user_id: Some(1),
        }
    }

    #[tokio::test]
    async fn list_is_newest_first_with_joins() {
        let store = temp_store().await;
        let service = SeaOrmVisitService::new(store.clone());
        let student = seed_student(&store, "Maryam").await;
        let actor = Actor::new(Some(1), "");

        service
            .create(&actor, visit(student, "2025-03-01 08:00:00"))
            .await
            .unwrap();
        service
            .create(&actor, visit(student, "2025-03-02 09:30:00"))
            .await
            .unwrap();

        let rows = service.list().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date_time, "2025-03-02 09:30:00");
        assert_eq!(rows[0].student_name, "Maryam");
        assert_eq!(rows[0].grade, "3B");
        assert_eq!(rows[0].created_by.as_deref(), Some("admin"));
        assert!(rows[0].hyoscine);
    }

    #[tokio::test]
    async fn unknown_student_is_referential() {
        let store = temp_store().await;
        let service = SeaOrmVisitService::new(store.clone());

        let err = service
            .create(&Actor::new(Some(1), ""), visit(77, "2025-03-01 08:00:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, RecordError::Referential(_)));
        assert!(store.audit().list_recent(5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn notify_stamps_send_date() {
        let store = temp_store().await;
        let service = SeaOrmVisitService::new(store.clone());
        let student = seed_student(&store, "Salma").await;
        let actor = Actor::new(Some(1), "");

        let id = service
            .create(&actor, visit(student, "2025-03-01 08:00:00"))
            .await
            .unwrap();
        service.mark_notified(&actor, id).await.unwrap();

        let stored = store.visits().get(id).await.unwrap().unwrap();
        assert!(stored.whatsapp_notified);
        assert!(stored.whatsapp_sent_date.is_some());

        let entry = &store.audit().list_recent(1).await.unwrap()[0];
        assert_eq!(entry.action_type, "WHATSAPP_NOTIFIED");
        assert_eq!(entry.table_name, "DailyVisits");
        assert_eq!(entry.record_id, Some(id));

        let err = service.mark_notified(&actor, id + 100).await.unwrap_err();
        assert!(matches!(err, RecordError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_removes_and_audits() {
        let store = temp_store().await;
        let service = SeaOrmVisitService::new(store.clone());
        let student = seed_student(&store, "Noor").await;
        let actor = Actor::new(Some(1), "");

        let id = service
            .create(&actor, visit(student, "2025-03-01 08:00:00"))
            .await
            .unwrap();
        service.delete(&actor, id).await.unwrap();

        assert!(service.list().await.unwrap().is_empty());
        assert_eq!(
            store.audit().list_recent(1).await.unwrap()[0].action_type,
            "DELETE_VISIT"
        );
        assert!(service.delete(&actor, id).await.is_err());
    }
}
