//! Referrals to external medical facilities.

use async_trait::async_trait;
use sea_orm::TransactionTrait;

use crate::db::Store;
use crate::db::repositories::referral::{NewReferral, ReferralRepository, ReferralRow};
use crate::domain::audit::tables;
use crate::domain::{Actor, AuditAction};
use crate::services::audit;
use crate::services::error::RecordError;

#[async_trait]
pub trait ReferralService: Send + Sync {
    async fn list(&self) -> Result<Vec<ReferralRow>, RecordError>;

    async fn create(&self, actor: &Actor, referral: NewReferral) -> Result<i32, RecordError>;

    async fn mark_notified(&self, actor: &Actor, id: i32) -> Result<(), RecordError>;

    async fn delete(&self, actor: &Actor, id: i32) -> Result<(), RecordError>;
}

pub struct SeaOrmReferralService {
    store: Store,
}

impl SeaOrmReferralService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ReferralService for SeaOrmReferralService {
    async fn list(&self) -> Result<Vec<ReferralRow>, RecordError> {
        Ok(self.store.referrals().list().await?)
    }

    async fn create(&self, actor: &Actor, referral: NewReferral) -> Result<i32, RecordError> {
        let txn = self.store.conn.begin().await?;
        let id = ReferralRepository::new(&txn)
            .insert(referral)
            .await
            .map_err(|e| {
                RecordError::from(e).explain_referential("The selected student does not exist")
            })?;
        audit::record(&txn, actor, AuditAction::CreateReferral, tables::REFERRALS, Some(id))
            .await?;
        txn.commit().await?;
        Ok(id)
    }

    async fn mark_notified(&self, actor: &Actor, id: i32) -> Result<(), RecordError> {
        let txn = self.store.conn.begin().await?;
        if !ReferralRepository::new(&txn).mark_notified(id).await? {
            return Err(RecordError::not_found("Referral", id));
        }
        audit::record(&txn, actor, AuditAction::WhatsappNotified, tables::REFERRALS, Some(id))
            .await?;
        txn.commit().await?;
        Ok(())
    }

    async fn delete(&self, actor: &Actor, id: i32) -> Result<(), RecordError> {
        let txn = self.store.conn.begin().await?;
        if !ReferralRepository::new(&txn).delete(id).await? {
            return Err(RecordError::not_found("Referral", id));
        }
        audit::record(&txn, actor, AuditAction::DeleteReferral, tables::REFERRALS, Some(id))
            .await?;
        txn.commit().await?;
        Ok(())
    }
}
