use sea_orm_migration::prelude::*;

mod m20250901_initial;
mod m20250915_add_referral_details;
mod m20251001_add_settings_closing_time;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_initial::Migration),
            Box::new(m20250915_add_referral_details::Migration),
            Box::new(m20251001_add_settings_closing_time::Migration),
        ]
    }
}
