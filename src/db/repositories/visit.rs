use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbBackend, DbErr, EntityTrait,
    FromQueryResult, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set, Statement, sea_query::Expr,
};
use serde::Serialize;

use crate::entities::{daily_visits, prelude::*, students, users};

#[derive(Debug, Clone)]
pub struct NewVisit {
    pub student_id: i32,
    pub diagnosis: String,
    pub treatment: String,
    pub parac_syrup: bool,
    pub parac_tab: bool,
    pub hyoscine: bool,
    pub referred: bool,
    pub referral_time: Option<String>,
    pub date_time: String,
    pub created_by_user_id: Option<i32>,
}

/// A visit joined with its student and the recording user.
#[derive(Debug, Clone, Serialize, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct VisitRow {
    pub id: i32,
    pub student_id: i32,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub parac_syrup: bool,
    pub parac_tab: bool,
    pub hyoscine: bool,
    pub referred: bool,
    pub referral_time: Option<String>,
    pub date_time: String,
    pub created_by_user_id: Option<i32>,
    pub whatsapp_notified: bool,
    pub whatsapp_sent_date: Option<String>,
    pub student_name: String,
    pub grade: String,
    pub phone: Option<String>,
    pub created_by: Option<String>,
}

/// Visits recorded on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct DayCount {
    pub date: String,
    pub count: i64,
}

pub struct VisitRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> VisitRepository<'a, C> {
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Most recent first.
    pub async fn list(&self) -> Result<Vec<VisitRow>, DbErr> {
        DailyVisits::find()
            .column_as(students::Column::Name, "student_name")
            .column_as(students::Column::Grade, "grade")
            .column_as(students::Column::Phone, "phone")
            .column_as(users::Column::Username, "created_by")
            .join(JoinType::InnerJoin, daily_visits::Relation::Student.def())
            .join(JoinType::LeftJoin, daily_visits::Relation::Creator.def())
            .order_by_desc(daily_visits::Column::DateTime)
            .order_by_desc(daily_visits::Column::Id)
            .into_model::<VisitRow>()
            .all(self.conn)
            .await
    }

    pub async fn get(&self, id: i32) -> Result<Option<daily_visits::Model>, DbErr> {
        DailyVisits::find_by_id(id).one(self.conn).await
    }

    pub async fn insert(&self, visit: NewVisit) -> Result<i32, DbErr> {
        let model = daily_visits::ActiveModel {
            student_id: Set(visit.student_id),
            diagnosis: Set(Some(visit.diagnosis)),
            treatment: Set(Some(visit.treatment)),
            parac_syrup: Set(visit.parac_syrup),
            parac_tab: Set(visit.parac_tab),
            hyoscine: Set(visit.hyoscine),
            referred: Set(visit.referred),
            referral_time: Set(visit.referral_time),
            date_time: Set(visit.date_time),
            created_by_user_id: Set(visit.created_by_user_id),
            whatsapp_notified: Set(false),
            whatsapp_sent_date: Set(None),
            ..Default::default()
        }
        .insert(self.conn)
        .await?;

        Ok(model.id)
    }

    /// Flags the guardian as notified and stamps the send time.
    pub async fn mark_notified(&self, id: i32, sent_at: &str) -> Result<bool, DbErr> {
        let result = DailyVisits::update_many()
            .col_expr(daily_visits::Column::WhatsappNotified, Expr::value(true))
            .col_expr(daily_visits::Column::WhatsappSentDate, Expr::value(sent_at))
            .filter(daily_visits::Column::Id.eq(id))
            .exec(self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = DailyVisits::delete_by_id(id).exec(self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    /// `day` is `YYYY-MM-DD`; the time of day is ignored.
    pub async fn count_on(&self, day: &str) -> Result<u64, DbErr> {
        DailyVisits::find()
            .filter(Expr::cust_with_values("date(date_time) = ?", [day]))
            .count(self.conn)
            .await
    }

    /// Per-day visit counts between two dates inclusive, ascending. Days
    /// without visits are absent.
    pub async fn daily_counts(&self, from: &str, to: &str) -> Result<Vec<DayCount>, DbErr> {
        DayCount::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Sqlite,
            r"SELECT date(date_time) AS date, COUNT(*) AS count
              FROM daily_visits
              WHERE date(date_time) BETWEEN ? AND ?
              GROUP BY date(date_time)
              ORDER BY date ASC",
            [from.into(), to.into()],
        ))
        .all(self.conn)
        .await
    }
}
