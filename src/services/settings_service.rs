//! School settings: the singleton `settings` row.

use async_trait::async_trait;
use sea_orm::TransactionTrait;

use crate::db::Store;
use crate::db::repositories::settings::{SettingsFields, SettingsRepository};
use crate::domain::audit::tables;
use crate::domain::{Actor, AuditAction};
use crate::entities::settings;
use crate::services::audit;
use crate::services::error::RecordError;

#[async_trait]
pub trait SettingsService: Send + Sync {
    async fn get(&self) -> Result<settings::Model, RecordError>;

    async fn update(
        &self,
        actor: &Actor,
        fields: SettingsFields,
    ) -> Result<settings::Model, RecordError>;
}

pub struct SeaOrmSettingsService {
    store: Store,
}

impl SeaOrmSettingsService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SettingsService for SeaOrmSettingsService {
    async fn get(&self) -> Result<settings::Model, RecordError> {
        self.store
            .settings()
            .get()
            .await?
            .ok_or_else(|| RecordError::not_found("Settings", settings::SINGLETON_ID))
    }

    async fn update(
        &self,
        actor: &Actor,
        fields: SettingsFields,
    ) -> Result<settings::Model, RecordError> {
        let txn = self.store.conn.begin().await?;
        let repo = SettingsRepository::new(&txn);
        repo.ensure_exists().await?;
        let updated = repo.update(fields).await?;
        audit::record(
            &txn,
            actor,
            AuditAction::UpdateSettings,
            tables::SETTINGS,
            Some(settings::SINGLETON_ID),
        )
        .await?;
        txn.commit().await?;
        Ok(updated)
    }
}
