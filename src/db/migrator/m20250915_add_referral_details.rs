use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for column in [
            Referrals::Age,
            Referrals::Gender,
            Referrals::History,
            Referrals::ReferralTime,
        ] {
            if manager.has_column("referrals", &column.to_string()).await? {
                continue;
            }

            manager
                .alter_table(
                    Table::alter()
                        .table(Referrals::Table)
                        .add_column(ColumnDef::new(column).string().null())
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for column in [
            Referrals::Age,
            Referrals::Gender,
            Referrals::History,
            Referrals::ReferralTime,
        ] {
            if !manager.has_column("referrals", &column.to_string()).await? {
                continue;
            }

            manager
                .alter_table(
                    Table::alter()
                        .table(Referrals::Table)
                        .drop_column(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden, Clone, Copy)]
enum Referrals {
    Table,
    Age,
    Gender,
    History,
    ReferralTime,
}
