use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Singleton row; `id` is always 1.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub school_name: Option<String>,
    pub supervisor_name: Option<String>,
    /// Logo as a data URI or path.
    pub logo_path: Option<String>,
    pub daily_closing_time: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub const SINGLETON_ID: i32 = 1;
