use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk(Users::Id))
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Users::FailedAttempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Users::LastLogin).date_time().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(pk(Students::Id))
                    .col(ColumnDef::new(Students::Name).string().not_null())
                    .col(ColumnDef::new(Students::Grade).string().not_null())
                    .col(ColumnDef::new(Students::Phone).string().null())
                    .col(
                        ColumnDef::new(Students::IsSpecialCase)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Students::ChronicCondition).string().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_students_name")
                    .table(Students::Table)
                    .col(Students::Name)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DailyVisits::Table)
                    .if_not_exists()
                    .col(pk(DailyVisits::Id))
                    .col(ColumnDef::new(DailyVisits::StudentId).integer().not_null())
                    .col(ColumnDef::new(DailyVisits::Diagnosis).string().null())
                    .col(ColumnDef::new(DailyVisits::Treatment).string().null())
                    .col(flag(DailyVisits::ParacSyrup))
                    .col(flag(DailyVisits::ParacTab))
                    .col(flag(DailyVisits::Hyoscine))
                    .col(flag(DailyVisits::Referred))
                    .col(ColumnDef::new(DailyVisits::ReferralTime).string().null())
                    .col(now(DailyVisits::DateTime))
                    .col(
                        ColumnDef::new(DailyVisits::CreatedByUserId)
                            .integer()
                            .null(),
                    )
                    .col(flag(DailyVisits::WhatsappNotified))
                    .col(
                        ColumnDef::new(DailyVisits::WhatsappSentDate)
                            .date_time()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_daily_visits_student")
                            .from(DailyVisits::Table, DailyVisits::StudentId)
                            .to(Students::Table, Students::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_daily_visits_creator")
                            .from(DailyVisits::Table, DailyVisits::CreatedByUserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SpecialFollowUps::Table)
                    .if_not_exists()
                    .col(pk(SpecialFollowUps::Id))
                    .col(
                        ColumnDef::new(SpecialFollowUps::StudentId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SpecialFollowUps::FollowUpDate)
                            .date_time()
                            .null(),
                    )
                    .col(ColumnDef::new(SpecialFollowUps::FollowUpType).string().null())
                    .col(ColumnDef::new(SpecialFollowUps::Symptoms).string().null())
                    .col(ColumnDef::new(SpecialFollowUps::Services).string().null())
                    .col(
                        ColumnDef::new(SpecialFollowUps::Recommendations)
                            .string()
                            .null(),
                    )
                    .col(flag(SpecialFollowUps::Referred))
                    .col(
                        ColumnDef::new(SpecialFollowUps::CreatedByUserId)
                            .integer()
                            .null(),
                    )
                    .col(flag(SpecialFollowUps::WhatsappNotified))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_special_follow_ups_student")
                            .from(SpecialFollowUps::Table, SpecialFollowUps::StudentId)
                            .to(Students::Table, Students::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_special_follow_ups_creator")
                            .from(SpecialFollowUps::Table, SpecialFollowUps::CreatedByUserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Referral detail columns (age, gender, history, referral time) are
        // layered on by m20250915_add_referral_details.
        manager
            .create_table(
                Table::create()
                    .table(Referrals::Table)
                    .if_not_exists()
                    .col(pk(Referrals::Id))
                    .col(ColumnDef::new(Referrals::StudentId).integer().not_null())
                    .col(ColumnDef::new(Referrals::Reason).string().null())
                    .col(ColumnDef::new(Referrals::Destination).string().null())
                    .col(now(Referrals::DateTime))
                    .col(ColumnDef::new(Referrals::CreatedByUserId).integer().null())
                    .col(flag(Referrals::WhatsappNotified))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_referrals_student")
                            .from(Referrals::Table, Referrals::StudentId)
                            .to(Students::Table, Students::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_referrals_creator")
                            .from(Referrals::Table, Referrals::CreatedByUserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ClinicAppointments::Table)
                    .if_not_exists()
                    .col(pk(ClinicAppointments::Id))
                    .col(
                        ColumnDef::new(ClinicAppointments::StudentId)
                            .integer()
                            .not_null(),
                    )
                    .col(now(ClinicAppointments::Date))
                    .col(
                        ColumnDef::new(ClinicAppointments::HealthProblem)
                            .string()
                            .null(),
                    )
                    .col(ColumnDef::new(ClinicAppointments::ClinicName).string().null())
                    .col(
                        ColumnDef::new(ClinicAppointments::CreatedByUserId)
                            .integer()
                            .null(),
                    )
                    .col(flag(ClinicAppointments::WhatsappNotified))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_clinic_appointments_student")
                            .from(ClinicAppointments::Table, ClinicAppointments::StudentId)
                            .to(Students::Table, Students::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_clinic_appointments_creator")
                            .from(
                                ClinicAppointments::Table,
                                ClinicAppointments::CreatedByUserId,
                            )
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AuditLogs::Table)
                    .if_not_exists()
                    .col(pk(AuditLogs::Id))
                    .col(ColumnDef::new(AuditLogs::UserId).integer().null())
                    .col(ColumnDef::new(AuditLogs::ActionType).string().not_null())
                    .col(ColumnDef::new(AuditLogs::TableName).string().not_null())
                    .col(ColumnDef::new(AuditLogs::RecordId).integer().null())
                    .col(now(AuditLogs::DateTime))
                    .col(
                        ColumnDef::new(AuditLogs::IpAddress)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_audit_logs_user")
                            .from(AuditLogs::Table, AuditLogs::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_audit_logs_date_time")
                    .table(AuditLogs::Table)
                    .col(AuditLogs::DateTime)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Settings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Settings::Id)
                            .integer()
                            .not_null()
                            .primary_key()
                            .check(Expr::col(Settings::Id).eq(1)),
                    )
                    .col(ColumnDef::new(Settings::SchoolName).string().null())
                    .col(ColumnDef::new(Settings::SupervisorName).string().null())
                    .col(ColumnDef::new(Settings::LogoPath).string().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ClinicAppointments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Referrals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SpecialFollowUps::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DailyVisits::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Settings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

fn pk<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn flag<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .boolean()
        .not_null()
        .default(false)
        .to_owned()
}

fn now<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .date_time()
        .not_null()
        .extra("DEFAULT CURRENT_TIMESTAMP".to_owned())
        .to_owned()
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    Role,
    IsActive,
    FailedAttempts,
    LastLogin,
}

#[derive(DeriveIden)]
enum Students {
    Table,
    Id,
    Name,
    Grade,
    Phone,
    IsSpecialCase,
    ChronicCondition,
}

#[derive(DeriveIden)]
enum DailyVisits {
    Table,
    Id,
    StudentId,
    Diagnosis,
    Treatment,
    ParacSyrup,
    ParacTab,
    Hyoscine,
    Referred,
    ReferralTime,
    DateTime,
    CreatedByUserId,
    WhatsappNotified,
    WhatsappSentDate,
}

#[derive(DeriveIden)]
enum SpecialFollowUps {
    Table,
    Id,
    StudentId,
    FollowUpDate,
    FollowUpType,
    Symptoms,
    Services,
    Recommendations,
    Referred,
    CreatedByUserId,
    WhatsappNotified,
}

#[derive(DeriveIden)]
enum Referrals {
    Table,
    Id,
    StudentId,
    Reason,
    Destination,
    DateTime,
    CreatedByUserId,
    WhatsappNotified,
}

#[derive(DeriveIden)]
enum ClinicAppointments {
    Table,
    Id,
    StudentId,
    Date,
    HealthProblem,
    ClinicName,
    CreatedByUserId,
    WhatsappNotified,
}

#[derive(DeriveIden)]
enum AuditLogs {
    Table,
    Id,
    UserId,
    ActionType,
    TableName,
    RecordId,
    DateTime,
    IpAddress,
}

#[derive(DeriveIden)]
enum Settings {
    Table,
    Id,
    SchoolName,
    SupervisorName,
    LogoPath,
}
