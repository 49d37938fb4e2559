//! Specialist-clinic bookings.

use async_trait::async_trait;
use sea_orm::TransactionTrait;

use crate::db::Store;
use crate::db::repositories::clinic_appointment::{
    ClinicAppointmentRepository, ClinicAppointmentRow, NewClinicAppointment,
};
use crate::domain::audit::tables;
use crate::domain::{Actor, AuditAction};
use crate::services::audit;
use crate::services::error::RecordError;

#[async_trait]
pub trait ClinicAppointmentService: Send + Sync {
    async fn list(&self) -> Result<Vec<ClinicAppointmentRow>, RecordError>;

    async fn create(
        &self,
        actor: &Actor,
        appointment: NewClinicAppointment,
    ) -> Result<i32, RecordError>;

    async fn mark_notified(&self, actor: &Actor, id: i32) -> Result<(), RecordError>;

    async fn delete(&self, actor: &Actor, id: i32) -> Result<(), RecordError>;
}

pub struct SeaOrmClinicAppointmentService {
    store: Store,
}

impl SeaOrmClinicAppointmentService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ClinicAppointmentService for SeaOrmClinicAppointmentService {
    async fn list(&self) -> Result<Vec<ClinicAppointmentRow>, RecordError> {
        Ok(self.store.clinic_appointments().list().await?)
    }

    async fn create(
        &self,
        actor: &Actor,
        appointment: NewClinicAppointment,
    ) -> Result<i32, RecordError> {
        let txn = self.store.conn.begin().await?;
        let id = ClinicAppointmentRepository::new(&txn)
            .insert(appointment)
            .await
            .map_err(|e| {
                RecordError::from(e).explain_referential("The selected student does not exist")
            })?;
        audit::record(
            &txn,
            actor,
            AuditAction::CreateClinicAppointment,
            tables::CLINIC_APPOINTMENTS,
            Some(id),
        )
        .await?;
        txn.commit().await?;
        Ok(id)
    }

    async fn mark_notified(&self, actor: &Actor, id: i32) -> Result<(), RecordError> {
        let txn = self.store.conn.begin().await?;
        if !ClinicAppointmentRepository::new(&txn)
            .mark_notified(id)
            .await?
        {
            return Err(RecordError::not_found("Clinic appointment", id));
        }
        audit::record(
            &txn,
            actor,
            AuditAction::WhatsappClinicAppointment,
            tables::CLINIC_APPOINTMENTS,
            Some(id),
        )
        .await?;
        txn.commit().await?;
        Ok(())
    }

    async fn delete(&self, actor: &Actor, id: i32) -> Result<(), RecordError> {
        let txn = self.store.conn.begin().await?;
        if !ClinicAppointmentRepository::new(&txn).delete(id).await? {
            return Err(RecordError::not_found("Clinic appointment", id));
        }
        audit::record(
            &txn,
            actor,
            AuditAction::DeleteClinicAppointment,
            tables::CLINIC_APPOINTMENTS,
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
    async fn notify_uses_appointment_tag() {
        let store = temp_store().await;
        let service = SeaOrmClinicAppointmentService::new(store.clone());
        let actor = Actor::new(Some(1), "");
        let student = store
            .students()
            .insert(StudentFields {
                name: "Layla".to_string(),
                grade: "4A".to_string(),
                phone: Some("91234567".to_string()),
                is_special_case: false,
                chronic_condition: None,
            })
            .await
            .unwrap();

        let id = service
            .create(
                &actor,
                NewClinicAppointment {
                    student_id: student,
                    date: "2025-06-01".to_string(),
                    health_problem: "Vision".to_string(),
                    clinic_name: "Eye clinic".to_string(),
                    created_by_user_id: Some(1),
                },
            )
            .await
            .unwrap();

        service.mark_notified(&actor, id).await.unwrap();

        let row = &service.list().await.unwrap()[0];
        assert!(row.whatsapp_notified);
        assert_eq!(row.phone.as_deref(), Some("91234567"));

        let entry = &store.audit().list_recent(1).await.unwrap()[0];
        assert_eq!(entry.action_type, "WHATSAPP_CLINIC_APPOINTMENT");
        assert_eq!(entry.table_name, "ClinicAppointments");

        service.delete(&actor, id).await.unwrap();
        assert!(service.list().await.unwrap().is_empty());
    }
}
