use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuditService, AuthService, ClinicAppointmentService, DashboardService, MaintenanceService,
    ReferralService, SeaOrmAuthService, SeaOrmClinicAppointmentService, SeaOrmMaintenanceService,
    SeaOrmReferralService, SeaOrmSettingsService, SeaOrmSpecialCaseService, SeaOrmStudentService,
    SeaOrmVisitService, SessionKeys, SettingsService, SpecialCaseService, StudentService,
    VisitService,
};

/// Everything a request handler or CLI command needs, wired once at start.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub session_keys: SessionKeys,

    pub auth_service: Arc<dyn AuthService>,

    pub student_service: Arc<dyn StudentService>,

    pub visit_service: Arc<dyn VisitService>,

    pub special_case_service: Arc<dyn SpecialCaseService>,

    pub referral_service: Arc<dyn ReferralService>,

    pub clinic_appointment_service: Arc<dyn ClinicAppointmentService>,

    pub settings_service: Arc<dyn SettingsService>,

    pub maintenance_service: Arc<dyn MaintenanceService>,

    pub audit_service: Arc<AuditService>,

    pub dashboard_service: Arc<DashboardService>,
}

impl SharedState {
    /// Opens the database, applies migrations and seeds defaults.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;
        store.bootstrap(&config.security).await?;

        Ok(Self::with_store(config, store))
    }

    /// Wires services around an already bootstrapped store.
    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let session_keys =
            SessionKeys::new(&config.security.session_secret, config.security.session_hours);

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn AuthService>;

        let student_service = Arc::new(SeaOrmStudentService::new(
            store.clone(),
            config.school.unspecified_grade.clone(),
        )) as Arc<dyn StudentService>;

        let visit_service = Arc::new(SeaOrmVisitService::new(store.clone())) as Arc<dyn VisitService>;
        let special_case_service =
            Arc::new(SeaOrmSpecialCaseService::new(store.clone())) as Arc<dyn SpecialCaseService>;
        let referral_service =
            Arc::new(SeaOrmReferralService::new(store.clone())) as Arc<dyn ReferralService>;
        let clinic_appointment_service = Arc::new(SeaOrmClinicAppointmentService::new(
            store.clone(),
        )) as Arc<dyn ClinicAppointmentService>;
        let settings_service =
            Arc::new(SeaOrmSettingsService::new(store.clone())) as Arc<dyn SettingsService>;
        let maintenance_service =
            Arc::new(SeaOrmMaintenanceService::new(store.clone())) as Arc<dyn MaintenanceService>;

        let audit_service = Arc::new(AuditService::new(store.clone()));
        let dashboard_service = Arc::new(DashboardService::new(
            store.clone(),
            config.school.placeholder_name.clone(),
        ));

        Self {
            config: Arc::new(config),
            store,
            session_keys,
            auth_service,
            student_service,
            visit_service,
            special_case_service,
            referral_service,
            clinic_appointment_service,
            settings_service,
            maintenance_service,
            audit_service,
            dashboard_service,
        }
    }
}
