//! `SeaORM` implementation of the `MaintenanceService` trait.

use async_trait::async_trait;
use sea_orm::{DbErr, TransactionTrait};
use tracing::{error, info};

use crate::db::Store;
use crate::db::repositories::archive::ArchiveRepository;
use crate::db::repositories::settings::{SettingsFields, SettingsRepository};
use crate::domain::audit::tables;
use crate::domain::{Actor, AuditAction};
use crate::entities::{
    clinic_appointments, daily_visits, referrals, special_follow_ups, students,
};
use crate::services::audit;
use crate::services::maintenance_service::{MaintenanceError, MaintenanceService};
use crate::services::snapshot::Snapshot;

pub struct SeaOrmMaintenanceService {
    store: Store,
}

impl SeaOrmMaintenanceService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn read_snapshot(&self, actor: &Actor) -> Result<Snapshot, DbErr> {
        let txn = self.store.conn.begin().await?;
        let archive = ArchiveRepository::new(&txn);

        let snapshot = Snapshot {
            settings: SettingsRepository::new(&txn)
                .get()
                .await?
                .into_iter()
                .map(Into::into)
                .collect(),
            students: archive.students().await?.into_iter().map(Into::into).collect(),
            visits: archive.visits().await?.into_iter().map(Into::into).collect(),
            special_cases: archive
                .special_cases()
                .await?
                .into_iter()
                .map(Into::into)
                .collect(),
            referrals: archive.referrals().await?.into_iter().map(Into::into).collect(),
            clinic_appointments: archive
                .clinic_appointments()
                .await?
                .into_iter()
                .map(Into::into)
                .collect(),
        };

        audit::record(&txn, actor, AuditAction::BackupData, tables::ALL, None).await?;
        txn.commit().await?;
        Ok(snapshot)
    }

    async fn replace_with(&self, actor: &Actor, snapshot: Snapshot) -> Result<(), DbErr> {
        let txn = self.store.conn.begin().await?;
        let archive = ArchiveRepository::new(&txn);
        let settings = SettingsRepository::new(&txn);

        archive.purge_records().await?;
        settings.delete_all().await?;

        let fields = snapshot
            .settings
            .into_iter()
            .next()
            .map_or_else(SettingsFields::blank, Into::into);
        settings.insert(fields).await?;

        archive
            .insert_all(
                snapshot
                    .students
                    .into_iter()
                    .map(students::ActiveModel::from)
                    .collect(),
            )
            .await?;
        archive
            .insert_all(
                snapshot
                    .visits
                    .into_iter()
                    .map(daily_visits::ActiveModel::from)
                    .collect(),
            )
            .await?;
        archive
            .insert_all(
                snapshot
                    .special_cases
                    .into_iter()
                    .map(special_follow_ups::ActiveModel::from)
                    .collect(),
            )
            .await?;
        archive
            .insert_all(
                snapshot
                    .referrals
                    .into_iter()
                    .map(referrals::ActiveModel::from)
                    .collect(),
            )
            .await?;
        archive
            .insert_all(
                snapshot
                    .clinic_appointments
                    .into_iter()
                    .map(clinic_appointments::ActiveModel::from)
                    .collect(),
            )
            .await?;

        audit::record(&txn, actor, AuditAction::RestoreData, tables::ALL, None).await?;
        txn.commit().await
    }

    async fn purge(&self, actor: &Actor) -> Result<(), DbErr> {
        let txn = self.store.conn.begin().await?;
        ArchiveRepository::new(&txn).purge_records().await?;
        audit::record(&txn, actor, AuditAction::ResetNewYear, tables::ALL, None).await?;
        txn.commit().await
    }
}

#[async_trait]
impl MaintenanceService for SeaOrmMaintenanceService {
    async fn backup(&self, actor: &Actor) -> Result<Snapshot, MaintenanceError> {
        self.read_snapshot(actor).await.map_err(|e| {
            error!(error = %e, "Backup failed");
            MaintenanceError::failed("Backup", e)
        })
    }

    async fn restore(&self, actor: &Actor, snapshot: Snapshot) -> Result<(), MaintenanceError> {
        let students = snapshot.students.len();
        match self.replace_with(actor, snapshot).await {
            Ok(()) => {
                info!(students, "Database restored from snapshot");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Restore failed, previous data kept");
                Err(MaintenanceError::failed("Restore", e))
            }
        }
    }

    async fn reset_year(&self, actor: &Actor) -> Result<(), MaintenanceError> {
        match self.purge(actor).await {
            Ok(()) => {
                info!("School year reset: students and their records removed");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Year reset failed");
                Err(MaintenanceError::failed("Reset", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::student::StudentFields;
    use crate::db::repositories::visit::NewVisit;
    use crate::db::test_support::temp_store;
    use crate::entities::prelude::*;
    use crate::services::snapshot::{SettingsRecord, StudentRecord, VisitRecord};
    use sea_orm::{EntityTrait, PaginatorTrait};

    fn student(id: i32, name: &str) -> StudentRecord {
        StudentRecord {
            id,
            name: name.to_string(),
            grade: "6A".to_string(),
            phone: None,
            is_special_case: false,
            chronic_condition: None,
        }
    }

    fn visit(id: i32, student_id: i32) -> VisitRecord {
        VisitRecord {
            id,
            student_id,
            diagnosis: Some("Fever".to_string()),
            treatment: Some("Paracetamol".to_string()),
            parac_syrup: false,
            parac_tab: true,
            hyoscine: false,
            referred: false,
            referral_time: None,
            date_time: "2025-02-10 08:15:00".to_string(),
            created_by_user_id: Some(1),
            whatsapp_notified: false,
            whatsapp_sent_date: None,
        }
    }

    async fn seed(store: &Store) {
        let id = store
            .students()
            .insert(StudentFields {
                name: "Huda".to_string(),
                grade: "2".to_string(),
                phone: None,
                is_special_case: false,
                chronic_condition: None,
            })
            .await
            .unwrap();
        store
            .visits()
            .insert(NewVisit {
                student_id: id,
                diagnosis: "Cough".to_string(),
                treatment: "Syrup".to_string(),
                parac_syrup: true,
                parac_tab: false,
                hyoscine: false,
                referred: false,
                referral_time: None,
                date_time: "2025-01-05 10:00:00".to_string(),
                created_by_user_id: Some(1),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn restore_without_settings_keeps_singleton() {
        let store = temp_store().await;
        let service = SeaOrmMaintenanceService::new(store.clone());

        service
            .restore(&Actor::cli(), Snapshot::default())
            .await
            .unwrap();

        assert_eq!(Settings::find().count(&store.conn).await.unwrap(), 1);
        let row = store.settings().get().await.unwrap().unwrap();
        assert_eq!(row.school_name.as_deref(), Some(""));
        assert_eq!(row.supervisor_name.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn restore_then_backup_reproduces_rows() {
        let store = temp_store().await;
        let service = SeaOrmMaintenanceService::new(store.clone());
        seed(&store).await;

        let snapshot = Snapshot {
            settings: vec![SettingsRecord {
                id: 1,
                school_name: Some("Al Amal".to_string()),
                supervisor_name: Some("Mona".to_string()),
                logo_path: None,
                daily_closing_time: Some("13:30".to_string()),
            }],
            students: vec![student(10, "Yousef"), student(42, "Reem")],
            visits: vec![visit(7, 42), visit(8, 10)],
            ..Snapshot::default()
        };

        let actor = Actor::new(Some(1), "127.0.0.1");
        service.restore(&actor, snapshot.clone()).await.unwrap();
        let restored = service.backup(&actor).await.unwrap();

        assert_eq!(restored, snapshot);

        let actions: Vec<String> = store
            .audit()
            .list_recent(10)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.action_type)
            .collect();
        assert_eq!(actions, ["BACKUP_DATA", "RESTORE_DATA"]);
    }

    #[tokio::test]
    async fn failed_restore_keeps_previous_data() {
        let store = temp_store().await;
        let service = SeaOrmMaintenanceService::new(store.clone());
        seed(&store).await;

        let dangling = Snapshot {
            students: vec![student(1, "Salim")],
            visits: vec![visit(1, 99)],
            ..Snapshot::default()
        };

        let err = service.restore(&Actor::cli(), dangling).await.unwrap_err();
        assert_eq!(err.to_string(), "Restore failed");

        let students = store.students().list().await.unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].name, "Huda");
        assert_eq!(store.visits().list().await.unwrap().len(), 1);
        assert!(store.audit().list_recent(5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reset_year_is_idempotent() {
        let store = temp_store().await;
        let service = SeaOrmMaintenanceService::new(store.clone());
        seed(&store).await;

        service.reset_year(&Actor::cli()).await.unwrap();
        service.reset_year(&Actor::cli()).await.unwrap();

        assert_eq!(Students::find().count(&store.conn).await.unwrap(), 0);
        assert_eq!(DailyVisits::find().count(&store.conn).await.unwrap(), 0);
        assert_eq!(Referrals::find().count(&store.conn).await.unwrap(), 0);
        assert_eq!(SpecialFollowUps::find().count(&store.conn).await.unwrap(), 0);
        assert_eq!(Users::find().count(&store.conn).await.unwrap(), 1);
        assert_eq!(Settings::find().count(&store.conn).await.unwrap(), 1);

        let entries = store.audit().list_recent(5).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.action_type == "RESET_NEW_YEAR"));
        assert!(entries.iter().all(|e| e.table_name == "All"));
        assert!(entries.iter().all(|e| e.record_id.is_none()));
    }
}
