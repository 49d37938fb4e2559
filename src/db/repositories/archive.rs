use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel, QueryOrder,
};

use crate::entities::{
    clinic_appointments, daily_visits, prelude::*, referrals, special_follow_ups, students,
};

/// Rows per multi-value INSERT, kept well below SQLite's bound-parameter limit.
const INSERT_CHUNK: usize = 200;

/// Whole-table reads and writes used by backup, restore and the year-end reset.
pub struct ArchiveRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> ArchiveRepository<'a, C> {
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Deletes every student and every record that references one, children
    /// first. Users, settings and the audit trail are untouched.
    pub async fn purge_records(&self) -> Result<(), DbErr> {
        ClinicAppointments::delete_many().exec(self.conn).await?;
        DailyVisits::delete_many().exec(self.conn).await?;
        SpecialFollowUps::delete_many().exec(self.conn).await?;
        Referrals::delete_many().exec(self.conn).await?;
        Students::delete_many().exec(self.conn).await?;
        Ok(())
    }

    pub async fn students(&self) -> Result<Vec<students::Model>, DbErr> {
        Students::find()
            .order_by_asc(students::Column::Id)
            .all(self.conn)
            .await
    }

    pub async fn visits(&self) -> Result<Vec<daily_visits::Model>, DbErr> {
        DailyVisits::find()
            .order_by_asc(daily_visits::Column::Id)
            .all(self.conn)
            .await
    }

    pub async fn special_cases(&self) -> Result<Vec<special_follow_ups::Model>, DbErr> {
        SpecialFollowUps::find()
            .order_by_asc(special_follow_ups::Column::Id)
            .all(self.conn)
            .await
    }

    pub async fn referrals(&self) -> Result<Vec<referrals::Model>, DbErr> {
        Referrals::find()
            .order_by_asc(referrals::Column::Id)
            .all(self.conn)
            .await
    }

    pub async fn clinic_appointments(&self) -> Result<Vec<clinic_appointments::Model>, DbErr> {
        ClinicAppointments::find()
            .order_by_asc(clinic_appointments::Column::Id)
            .all(self.conn)
            .await
    }

    /// Inserts rows as given, primary keys included.
    pub async fn insert_all<A>(&self, rows: Vec<A>) -> Result<u64, DbErr>
    where
        A: ActiveModelTrait + Send,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    {
        let mut inserted = 0;
        let mut rows = rows.into_iter().peekable();

        while rows.peek().is_some() {
            let chunk: Vec<A> = rows.by_ref().take(INSERT_CHUNK).collect();
            inserted += <A::Entity as EntityTrait>::insert_many(chunk)
                .exec_without_returning(self.conn)
                .await?;
        }

        Ok(inserted)
    }
}
