//! `SeaORM` implementation of the `StudentService` trait.

use async_trait::async_trait;
use sea_orm::TransactionTrait;
use tracing::{error, info};

use crate::db::Store;
use crate::db::repositories::student::{StudentFields, StudentRepository};
use crate::domain::audit::tables;
use crate::domain::{Actor, AuditAction};
use crate::entities::students;
use crate::roster::RosterEntry;
use crate::services::audit;
use crate::services::error::RecordError;
use crate::services::student_service::StudentService;

const DEPENDENTS_EXIST: &str =
    "Cannot delete a student who still has visits, follow-ups, referrals or appointments";

pub struct SeaOrmStudentService {
    store: Store,
    unspecified_grade: String,
}

impl SeaOrmStudentService {
    #[must_use]
    pub fn new(store: Store, unspecified_grade: impl Into<String>) -> Self {
        Self {
            store,
            unspecified_grade: unspecified_grade.into(),
        }
    }

    async fn import_within_transaction(
        &self,
        actor: &Actor,
        candidates: Vec<RosterEntry>,
    ) -> Result<u64, RecordError> {
        let txn = self.store.conn.begin().await?;
        let repo = StudentRepository::new(&txn);
        let mut inserted = 0;

        for candidate in candidates {
            if repo.find_by_name(&candidate.name).await?.is_some() {
                continue;
            }

            repo.insert(StudentFields {
                name: candidate.name,
                grade: candidate
                    .grade
                    .unwrap_or_else(|| self.unspecified_grade.clone()),
                phone: candidate.phone,
                is_special_case: false,
                chronic_condition: None,
            })
            .await?;
            inserted += 1;
        }

        audit::record(
            &txn,
            actor,
            AuditAction::BulkImportStudents,
            tables::STUDENTS,
            None,
        )
        .await?;
        txn.commit().await?;

        Ok(inserted)
    }
}

#[async_trait]
impl StudentService for SeaOrmStudentService {
    async fn list(&self) -> Result<Vec<students::Model>, RecordError> {
        Ok(self.store.students().list().await?)
    }

    async fn create(&self, actor: &Actor, fields: StudentFields) -> Result<i32, RecordError> {
        let txn = self.store.conn.begin().await?;
        let id = StudentRepository::new(&txn).insert(fields).await?;
        audit::record(&txn, actor, AuditAction::CreateStudent, tables::STUDENTS, Some(id)).await?;
        txn.commit().await?;
        Ok(id)
    }

    async fn update(
        &self,
        actor: &Actor,
        id: i32,
        fields: StudentFields,
    ) -> Result<(), RecordError> {
        let txn = self.store.conn.begin().await?;
        if !StudentRepository::new(&txn).update(id, fields).await? {
            return Err(RecordError::not_found("Student", id));
        }
        audit::record(&txn, actor, AuditAction::UpdateStudent, tables::STUDENTS, Some(id)).await?;
        txn.commit().await?;
        Ok(())
    }

    async fn delete(&self, actor: &Actor, id: i32) -> Result<(), RecordError> {
        let txn = self.store.conn.begin().await?;
        let deleted = StudentRepository::new(&txn)
            .delete(id)
            .await
            .map_err(|e| RecordError::from(e).explain_referential(DEPENDENTS_EXIST))?;
        if !deleted {
            return Err(RecordError::not_found("Student", id));
        }
        audit::record(&txn, actor, AuditAction::DeleteStudent, tables::STUDENTS, Some(id)).await?;
        txn.commit().await?;
        Ok(())
    }

    async fn delete_all(&self, actor: &Actor) -> Result<u64, RecordError> {
        let txn = self.store.conn.begin().await?;
        let removed = StudentRepository::new(&txn)
            .delete_all()
            .await
            .map_err(|e| RecordError::from(e).explain_referential(DEPENDENTS_EXIST))?;
        audit::record(
            &txn,
            actor,
            AuditAction::DeleteAllStudents,
            tables::STUDENTS,
            None,
        )
        .await?;
        txn.commit().await?;

        info!(removed, "Deleted all students");
        Ok(removed)
    }

    async fn bulk_import(
        &self,
        actor: &Actor,
        candidates: Vec<RosterEntry>,
    ) -> Result<u64, RecordError> {
        let submitted = candidates.len();
        match self.import_within_transaction(actor, candidates).await {
            Ok(inserted) => {
                info!(submitted, inserted, "Roster import committed");
                Ok(inserted)
            }
            Err(e) => {
                error!(submitted, error = %e, "Roster import rolled back");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::visit::NewVisit;
    use crate::db::test_support::temp_store;
    use crate::domain::timestamp_now;

    fn candidate(name: &str) -> RosterEntry {
        RosterEntry {
            name: name.to_string(),
            grade: None,
            phone: None,
        }
    }

    fn fields(name: &str) -> StudentFields {
        StudentFields {
            name: name.to_string(),
            grade: "5A".to_string(),
            phone: Some("96890000000".to_string()),
            is_special_case: false,
            chronic_condition: None,
        }
    }

    #[tokio::test]
    async fn bulk_import_skips_existing_names() {
        let store = temp_store().await;
        let service = SeaOrmStudentService::new(store.clone(), "غير محدد");
        let actor = Actor::cli();
        let batch = vec![candidate("A"), candidate("A"), candidate("B")];

        assert_eq!(service.bulk_import(&actor, batch.clone()).await.unwrap(), 2);
        assert_eq!(service.bulk_import(&actor, batch).await.unwrap(), 0);

        let students = service.list().await.unwrap();
        assert_eq!(students.len(), 2);
        assert_eq!(students[0].name, "A");
        assert_eq!(students[0].grade, "غير محدد");
        assert!(!students[0].is_special_case);
        assert_eq!(students[0].chronic_condition, None);

        let actions: Vec<_> = store
            .audit()
            .list_recent(10)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.action_type)
            .collect();
        assert_eq!(actions, ["BULK_IMPORT_STUDENTS", "BULK_IMPORT_STUDENTS"]);
    }

    #[tokio::test]
    async fn name_matching_is_case_sensitive() {
        let store = temp_store().await;
        let service = SeaOrmStudentService::new(store, "-");
        let inserted = service
            .bulk_import(&Actor::cli(), vec![candidate("sara"), candidate("Sara")])
            .await
            .unwrap();
        assert_eq!(inserted, 2);
    }

    #[tokio::test]
    async fn crud_is_audited_once_per_call() {
        let store = temp_store().await;
        let service = SeaOrmStudentService::new(store.clone(), "-");
        let actor = Actor::new(Some(1), "127.0.0.1");

        let id = service.create(&actor, fields("Huda")).await.unwrap();
        service
            .update(
                &actor,
                id,
                StudentFields {
                    is_special_case: true,
                    chronic_condition: Some("Asthma".to_string()),
                    ..fields("Huda")
                },
            )
            .await
            .unwrap();

        let updated = store.students().get(id).await.unwrap().unwrap();
        assert!(updated.is_special_case);
        assert_eq!(updated.chronic_condition.as_deref(), Some("Asthma"));

        service.delete(&actor, id).await.unwrap();

        let entries = store.audit().list_recent(10).await.unwrap();
        let actions: Vec<_> = entries.iter().map(|e| e.action_type.as_str()).collect();
        assert_eq!(actions, ["DELETE_STUDENT", "UPDATE_STUDENT", "CREATE_STUDENT"]);
        assert!(entries.iter().all(|e| e.record_id == Some(id)));
        assert!(entries.iter().all(|e| e.table_name == "Students"));
    }

    #[tokio::test]
    async fn missing_student_is_not_found_and_unaudited() {
        let store = temp_store().await;
        let service = SeaOrmStudentService::new(store.clone(), "-");

        let err = service
            .update(&Actor::cli(), 404, fields("Nobody"))
            .await
            .unwrap_err();
        assert!(matches!(err, RecordError::NotFound { id: 404, .. }));

        let err = service.delete(&Actor::cli(), 404).await.unwrap_err();
        assert!(matches!(err, RecordError::NotFound { .. }));

        assert!(store.audit().list_recent(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn student_with_visits_cannot_be_deleted() {
        let store = temp_store().await;
        let service = SeaOrmStudentService::new(store.clone(), "-");
        let actor = Actor::new(Some(1), "");
        let id = service.create(&actor, fields("Aisha")).await.unwrap();

        store
            .visits()
            .insert(NewVisit {
                student_id: id,
                diagnosis: "Fever".to_string(),
                treatment: "Paracetamol".to_string(),
                parac_syrup: false,
                parac_tab: true,
                hyoscine: false,
                referred: false,
                referral_time: None,
                date_time: timestamp_now(),
                created_by_user_id: Some(1),
            })
            .await
            .unwrap();

        let err = service.delete(&actor, id).await.unwrap_err();
        assert!(matches!(err, RecordError::Referential(_)));

        let err = service.delete_all(&actor).await.unwrap_err();
        assert!(matches!(err, RecordError::Referential(_)));

        assert!(store.students().get(id).await.unwrap().is_some());
        assert_eq!(store.visits().list().await.unwrap().len(), 1);
        assert_eq!(store.audit().list_recent(10).await.unwrap().len(), 1);
    }
}
