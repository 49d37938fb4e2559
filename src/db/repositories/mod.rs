pub mod archive;
pub mod audit;
pub mod clinic_appointment;
pub mod referral;
pub mod settings;
pub mod special_case;
pub mod student;
pub mod user;
pub mod visit;
