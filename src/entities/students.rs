use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub grade: String,
    pub phone: Option<String>,
    pub is_special_case: bool,
    pub chronic_condition: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::daily_visits::Entity")]
    DailyVisits,
    #[sea_orm(has_many = "super::special_follow_ups::Entity")]
    SpecialFollowUps,
    #[sea_orm(has_many = "super::referrals::Entity")]
    Referrals,
    #[sea_orm(has_many = "super::clinic_appointments::Entity")]
    ClinicAppointments,
}

impl Related<super::daily_visits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DailyVisits.def()
    }
}

impl Related<super::special_follow_ups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SpecialFollowUps.def()
    }
}

impl Related<super::referrals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Referrals.def()
    }
}

impl Related<super::clinic_appointments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClinicAppointments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
