use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, Set};

use crate::entities::{prelude::*, settings};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsFields {
    pub school_name: Option<String>,
    pub supervisor_name: Option<String>,
    pub logo_path: Option<String>,
    pub daily_closing_time: Option<String>,
}

impl SettingsFields {
    /// The empty-string row seeded at bootstrap and after a degenerate restore.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            school_name: Some(String::new()),
            supervisor_name: Some(String::new()),
            logo_path: None,
            daily_closing_time: None,
        }
    }
}

pub struct SettingsRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> SettingsRepository<'a, C> {
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn get(&self) -> Result<Option<settings::Model>, DbErr> {
        Settings::find_by_id(settings::SINGLETON_ID)
            .one(self.conn)
            .await
    }

    /// Inserts the singleton row. Fails if it already exists.
    pub async fn insert(&self, fields: SettingsFields) -> Result<(), DbErr> {
        settings::ActiveModel {
            id: Set(settings::SINGLETON_ID),
            school_name: Set(fields.school_name),
            supervisor_name: Set(fields.supervisor_name),
            logo_path: Set(fields.logo_path),
            daily_closing_time: Set(fields.daily_closing_time),
        }
        .insert(self.conn)
        .await?;
        Ok(())
    }

    /// Returns `true` if the row had to be created.
    pub async fn ensure_exists(&self) -> Result<bool, DbErr> {
        if self.get().await?.is_some() {
            return Ok(false);
        }
        self.insert(SettingsFields::blank()).await?;
        Ok(true)
    }

    pub async fn update(&self, fields: SettingsFields) -> Result<settings::Model, DbErr> {
        settings::ActiveModel {
            id: sea_orm::ActiveValue::Unchanged(settings::SINGLETON_ID),
            school_name: Set(fields.school_name),
            supervisor_name: Set(fields.supervisor_name),
            logo_path: Set(fields.logo_path),
            daily_closing_time: Set(fields.daily_closing_time),
        }
        .update(self.conn)
        .await
    }

    pub async fn delete_all(&self) -> Result<u64, DbErr> {
        let result = Settings::delete_many().exec(self.conn).await?;
        Ok(result.rows_affected)
    }
}
