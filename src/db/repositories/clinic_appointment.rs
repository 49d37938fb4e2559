use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, FromQueryResult,
    JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    sea_query::Expr,
};
use serde::Serialize;

use crate::entities::{clinic_appointments, prelude::*, students, users};

#[derive(Debug, Clone)]
pub struct NewClinicAppointment {
    pub student_id: i32,
    pub date: String,
    pub health_problem: String,
    pub clinic_name: String,
    pub created_by_user_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct ClinicAppointmentRow {
    pub id: i32,
    pub student_id: i32,
    pub date: String,
    pub health_problem: Option<String>,
    pub clinic_name: Option<String>,
    pub created_by_user_id: Option<i32>,
    pub whatsapp_notified: bool,
    pub student_name: String,
    pub grade: String,
    pub phone: Option<String>,
    pub created_by: Option<String>,
}

pub struct ClinicAppointmentRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> ClinicAppointmentRepository<'a, C> {
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<ClinicAppointmentRow>, DbErr> {
        ClinicAppointments::find()
            .column_as(students::Column::Name, "student_name")
            .column_as(students::Column::Grade, "grade")
            .column_as(students::Column::Phone, "phone")
            .column_as(users::Column::Username, "created_by")
            .join(JoinType::InnerJoin, clinic_appointments::Relation::Student.def())
            .join(JoinType::LeftJoin, clinic_appointments::Relation::Creator.def())
            .order_by_desc(clinic_appointments::Column::Date)
            .order_by_desc(clinic_appointments::Column::Id)
            .into_model::<ClinicAppointmentRow>()
            .all(self.conn)
            .await
    }

    pub async fn insert(&self, appointment: NewClinicAppointment) -> Result<i32, DbErr> {
        let model = clinic_appointments::ActiveModel {
            student_id: Set(appointment.student_id),
            date: Set(appointment.date),
            health_problem: Set(Some(appointment.health_problem)),
            clinic_name: Set(Some(appointment.clinic_name)),
            created_by_user_id: Set(appointment.created_by_user_id),
            whatsapp_notified: Set(false),
            ..Default::default()
        }
        .insert(self.conn)
        .await?;

        Ok(model.id)
    }

    pub async fn mark_notified(&self, id: i32) -> Result<bool, DbErr> {
        let result = ClinicAppointments::update_many()
            .col_expr(clinic_appointments::Column::WhatsappNotified, Expr::value(true))
            .filter(clinic_appointments::Column::Id.eq(id))
            .exec(self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = ClinicAppointments::delete_by_id(id).exec(self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn count_on(&self, day: &str) -> Result<u64, DbErr> {
        ClinicAppointments::find()
            .filter(Expr::cust_with_values("date(date) = ?", [day]))
            .count(self.conn)
            .await
    }
}
