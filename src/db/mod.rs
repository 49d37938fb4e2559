use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::domain::Role;

pub mod migrator;
pub mod repositories;

use repositories::{
    archive::ArchiveRepository, audit::AuditRepository,
    clinic_appointment::ClinicAppointmentRepository, referral::ReferralRepository,
    settings::SettingsRepository, special_case::SpecialCaseRepository,
    student::StudentRepository, user::UserRepository, visit::VisitRepository,
};

pub use repositories::audit::AuditEntryRow;
pub use repositories::user::UserSummary;
pub use repositories::visit::DayCount;

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Handle to the clinic database. Cheap to clone; every clone shares the pool.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    /// Opens (creating if needed) the database file and applies pending migrations.
    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)
                    .with_context(|| format!("Failed to create database file {path_str}"))?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt)
            .await
            .context("Failed to connect to database")?;

        migrator::Migrator::up(&conn, None)
            .await
            .context("Failed to apply migrations")?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    /// Seeds the default administrator and the settings row when missing.
    /// Safe to run on every start.
    pub async fn bootstrap(&self, security: &SecurityConfig) -> Result<()> {
        let users = self.users();
        if users
            .get_by_username(DEFAULT_ADMIN_USERNAME)
            .await?
            .is_none()
        {
            let hash =
                repositories::user::hash_password_blocking(DEFAULT_ADMIN_PASSWORD, security)
                    .await?;
            users
                .insert(DEFAULT_ADMIN_USERNAME, hash, Role::Admin.as_str())
                .await
                .context("Failed to seed default administrator")?;
            info!("Seeded default administrator account '{DEFAULT_ADMIN_USERNAME}'");
        }

        if self
            .settings()
            .ensure_exists()
            .await
            .context("Failed to seed settings")?
        {
            info!("Seeded default settings row");
        }

        Ok(())
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    #[must_use]
    pub const fn users(&self) -> UserRepository<'_, DatabaseConnection> {
        UserRepository::new(&self.conn)
    }

    #[must_use]
    pub const fn students(&self) -> StudentRepository<'_, DatabaseConnection> {
        StudentRepository::new(&self.conn)
    }

    #[must_use]
    pub const fn visits(&self) -> VisitRepository<'_, DatabaseConnection> {
        VisitRepository::new(&self.conn)
    }

    #[must_use]
    pub const fn special_cases(&self) -> SpecialCaseRepository<'_, DatabaseConnection> {
        SpecialCaseRepository::new(&self.conn)
    }

    #[must_use]
    pub const fn referrals(&self) -> ReferralRepository<'_, DatabaseConnection> {
        ReferralRepository::new(&self.conn)
    }

    #[must_use]
    pub const fn clinic_appointments(&self) -> ClinicAppointmentRepository<'_, DatabaseConnection> {
        ClinicAppointmentRepository::new(&self.conn)
    }

    #[must_use]
    pub const fn audit(&self) -> AuditRepository<'_, DatabaseConnection> {
        AuditRepository::new(&self.conn)
    }

    #[must_use]
    pub const fn settings(&self) -> SettingsRepository<'_, DatabaseConnection> {
        SettingsRepository::new(&self.conn)
    }

    #[must_use]
    pub const fn archive(&self) -> ArchiveRepository<'_, DatabaseConnection> {
        ArchiveRepository::new(&self.conn)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::temp_store;
    use super::*;
    use sea_orm::{EntityTrait, PaginatorTrait};

    use crate::entities::prelude::*;

    #[tokio::test]
    async fn bootstrap_is_idempotent() {
        let store = temp_store().await;
        store
            .bootstrap(&super::test_support::fast_security())
            .await
            .unwrap();

        assert_eq!(Users::find().count(&store.conn).await.unwrap(), 1);
        assert_eq!(Settings::find().count(&store.conn).await.unwrap(), 1);

        let admin = store
            .users()
            .get_by_username(DEFAULT_ADMIN_USERNAME)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, "Admin");
        assert!(admin.is_active);
        assert_eq!(admin.failed_attempts, 0);

        let settings = store.settings().get().await.unwrap().unwrap();
        assert_eq!(settings.school_name.as_deref(), Some(""));
        assert_eq!(settings.supervisor_name.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn migrations_rerun_cleanly() {
        use sea_orm_migration::MigratorTrait;

        let store = temp_store().await;
        migrator::Migrator::up(&store.conn, None).await.unwrap();
        store.ping().await.unwrap();
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        use repositories::visit::NewVisit;

        let store = temp_store().await;
        let result = store
            .visits()
            .insert(NewVisit {
                student_id: 999,
                diagnosis: "Headache".to_string(),
                treatment: "Rest".to_string(),
                parac_syrup: false,
                parac_tab: false,
                hyoscine: false,
                referred: false,
                referral_time: None,
                date_time: crate::domain::timestamp_now(),
                created_by_user_id: Some(1),
            })
            .await;

        assert!(result.is_err());
    }
}
