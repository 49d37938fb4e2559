pub mod audit;
pub use audit::AuditService;

pub mod error;
pub use error::RecordError;

pub mod session;
pub use session::SessionKeys;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, LoginResult, NewUser};
pub use auth_service_impl::SeaOrmAuthService;

pub mod student_service;
pub mod student_service_impl;
pub use student_service::StudentService;
pub use student_service_impl::SeaOrmStudentService;

pub mod visit_service;
pub use visit_service::{SeaOrmVisitService, VisitService};

pub mod special_case_service;
pub use special_case_service::{SeaOrmSpecialCaseService, SpecialCaseService};

pub mod referral_service;
pub use referral_service::{ReferralService, SeaOrmReferralService};

pub mod clinic_appointment_service;
pub use clinic_appointment_service::{ClinicAppointmentService, SeaOrmClinicAppointmentService};

pub mod settings_service;
pub use settings_service::{SeaOrmSettingsService, SettingsService};

pub mod snapshot;
pub use snapshot::Snapshot;

pub mod maintenance_service;
pub mod maintenance_service_impl;
pub use maintenance_service::{MaintenanceError, MaintenanceService};
pub use maintenance_service_impl::SeaOrmMaintenanceService;

pub mod dashboard_service;
pub use dashboard_service::{DashboardService, DashboardSummary};
