pub mod prelude;

pub mod audit_logs;
pub mod clinic_appointments;
pub mod daily_visits;
pub mod referrals;
pub mod settings;
pub mod special_follow_ups;
pub mod students;
pub mod users;
