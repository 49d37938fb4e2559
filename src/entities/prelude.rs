pub use super::audit_logs::Entity as AuditLogs;
pub use super::clinic_appointments::Entity as ClinicAppointments;
pub use super::daily_visits::Entity as DailyVisits;
pub use super::referrals::Entity as Referrals;
pub use super::settings::Entity as Settings;
pub use super::special_follow_ups::Entity as SpecialFollowUps;
pub use super::students::Entity as Students;
pub use super::users::Entity as Users;
