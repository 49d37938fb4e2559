use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, FromQueryResult,
    JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    sea_query::Expr,
};
use serde::Serialize;

use crate::entities::{prelude::*, referrals, students, users};

#[derive(Debug, Clone)]
pub struct NewReferral {
    pub student_id: i32,
    pub reason: String,
    pub destination: String,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub history: Option<String>,
    pub referral_time: Option<String>,
    pub date_time: String,
    pub created_by_user_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct ReferralRow {
    pub id: i32,
    pub student_id: i32,
    pub reason: Option<String>,
    pub destination: Option<String>,
    pub date_time: String,
    pub created_by_user_id: Option<i32>,
    pub whatsapp_notified: bool,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub history: Option<String>,
    pub referral_time: Option<String>,
    pub student_name: String,
    pub grade: String,
    pub phone: Option<String>,
    pub created_by: Option<String>,
}

pub struct ReferralRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> ReferralRepository<'a, C> {
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<ReferralRow>, DbErr> {
        Referrals::find()
            .column_as(students::Column::Name, "student_name")
            .column_as(students::Column::Grade, "grade")
            .column_as(students::Column::Phone, "phone")
            .column_as(users::Column::Username, "created_by")
            .join(JoinType::InnerJoin, referrals::Relation::Student.def())
            .join(JoinType::LeftJoin, referrals::Relation::Creator.def())
            .order_by_desc(referrals::Column::DateTime)
            .order_by_desc(referrals::Column::Id)
            .into_model::<ReferralRow>()
            .all(self.conn)
            .await
    }

    pub async fn insert(&self, referral: NewReferral) -> Result<i32, DbErr> {
        let model = referrals::ActiveModel {
            student_id: Set(referral.student_id),
            reason: Set(Some(referral.reason)),
            destination: Set(Some(referral.destination)),
            date_time: Set(referral.date_time),
            created_by_user_id: Set(referral.created_by_user_id),
            whatsapp_notified: Set(false),
            age: Set(referral.age),
            gender: Set(referral.gender),
            history: Set(referral.history),
            referral_time: Set(referral.referral_time),
            ..Default::default()
        }
        .insert(self.conn)
        .await?;

        Ok(model.id)
    }

    pub async fn mark_notified(&self, id: i32) -> Result<bool, DbErr> {
        let result = Referrals::update_many()
            .col_expr(referrals::Column::WhatsappNotified, Expr::value(true))
            .filter(referrals::Column::Id.eq(id))
            .exec(self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = Referrals::delete_by_id(id).exec(self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn count_on(&self, day: &str) -> Result<u64, DbErr> {
        Referrals::find()
            .filter(Expr::cust_with_values("date(date_time) = ?", [day]))
            .count(self.conn)
            .await
    }
}
