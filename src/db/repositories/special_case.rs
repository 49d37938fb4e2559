use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, FromQueryResult,
    JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    sea_query::Expr,
};
use serde::Serialize;

use crate::entities::{prelude::*, special_follow_ups, students, users};

#[derive(Debug, Clone)]
pub struct NewSpecialCase {
    pub student_id: i32,
    pub follow_up_date: String,
    pub follow_up_type: String,
    pub symptoms: String,
    pub services: String,
    pub recommendations: Option<String>,
    pub referred: bool,
    pub created_by_user_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct SpecialCaseRow {
    pub id: i32,
    pub student_id: i32,
    pub follow_up_date: Option<String>,
    pub follow_up_type: Option<String>,
    pub symptoms: Option<String>,
    pub services: Option<String>,
    pub recommendations: Option<String>,
    pub referred: bool,
    pub created_by_user_id: Option<i32>,
    pub whatsapp_notified: bool,
    pub student_name: String,
    pub grade: String,
    pub phone: Option<String>,
    pub chronic_condition: Option<String>,
    pub created_by: Option<String>,
}

pub struct SpecialCaseRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> SpecialCaseRepository<'a, C> {
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Latest follow-up date first.
    pub async fn list(&self) -> Result<Vec<SpecialCaseRow>, DbErr> {
        SpecialFollowUps::find()
            .column_as(students::Column::Name, "student_name")
            .column_as(students::Column::Grade, "grade")
            .column_as(students::Column::Phone, "phone")
            .column_as(students::Column::ChronicCondition, "chronic_condition")
            .column_as(users::Column::Username, "created_by")
            .join(JoinType::InnerJoin, special_follow_ups::Relation::Student.def())
            .join(JoinType::LeftJoin, special_follow_ups::Relation::Creator.def())
            .order_by_desc(special_follow_ups::Column::FollowUpDate)
            .order_by_desc(special_follow_ups::Column::Id)
            .into_model::<SpecialCaseRow>()
            .all(self.conn)
            .await
    }

    pub async fn insert(&self, case: NewSpecialCase) -> Result<i32, DbErr> {
        let model = special_follow_ups::ActiveModel {
            student_id: Set(case.student_id),
            follow_up_date: Set(Some(case.follow_up_date)),
            follow_up_type: Set(Some(case.follow_up_type)),
            symptoms: Set(Some(case.symptoms)),
            services: Set(Some(case.services)),
            recommendations: Set(case.recommendations),
            referred: Set(case.referred),
            created_by_user_id: Set(case.created_by_user_id),
            whatsapp_notified: Set(false),
            ..Default::default()
        }
        .insert(self.conn)
        .await?;

        Ok(model.id)
    }

    pub async fn mark_notified(&self, id: i32) -> Result<bool, DbErr> {
        let result = SpecialFollowUps::update_many()
            .col_expr(special_follow_ups::Column::WhatsappNotified, Expr::value(true))
            .filter(special_follow_ups::Column::Id.eq(id))
            .exec(self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = SpecialFollowUps::delete_by_id(id).exec(self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn count_on(&self, day: &str) -> Result<u64, DbErr> {
        SpecialFollowUps::find()
            .filter(Expr::cust_with_values("date(follow_up_date) = ?", [day]))
            .count(self.conn)
            .await
    }
}
