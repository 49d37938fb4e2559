use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;
use crate::domain::{ADMIN_ONLY, CLINICAL_STAFF};
use crate::services::{
    AuditService, AuthService, ClinicAppointmentService, DashboardService, MaintenanceService,
    ReferralService, SessionKeys, SettingsService, SpecialCaseService, StudentService,
    VisitService,
};
use crate::state::SharedState;

pub mod access;
mod audit;
mod auth;
mod clinic_appointments;
mod dashboard;
mod error;
mod observability;
mod referrals;
mod settings;
mod special_cases;
mod students;
mod system;
mod types;
mod users;
mod validation;
mod visits;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.shared.store
    }

    #[must_use]
    pub fn session_keys(&self) -> &SessionKeys {
        &self.shared.session_keys
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn student_service(&self) -> &Arc<dyn StudentService> {
        &self.shared.student_service
    }

    #[must_use]
    pub fn visit_service(&self) -> &Arc<dyn VisitService> {
        &self.shared.visit_service
    }

    #[must_use]
    pub fn special_case_service(&self) -> &Arc<dyn SpecialCaseService> {
        &self.shared.special_case_service
    }

    #[must_use]
    pub fn referral_service(&self) -> &Arc<dyn ReferralService> {
        &self.shared.referral_service
    }

    #[must_use]
    pub fn clinic_appointment_service(&self) -> &Arc<dyn ClinicAppointmentService> {
        &self.shared.clinic_appointment_service
    }

    #[must_use]
    pub fn settings_service(&self) -> &Arc<dyn SettingsService> {
        &self.shared.settings_service
    }

    #[must_use]
    pub fn maintenance_service(&self) -> &Arc<dyn MaintenanceService> {
        &self.shared.maintenance_service
    }

    #[must_use]
    pub fn audit_service(&self) -> &Arc<AuditService> {
        &self.shared.audit_service
    }

    #[must_use]
    pub fn dashboard_service(&self) -> &Arc<DashboardService> {
        &self.shared.dashboard_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let api_router = Router::new()
        .merge(create_protected_router(state.clone()))
        .route("/auth/login", post(auth::login))
        .route("/system/health/live", get(system::health_live))
        .route("/system/health/ready", get(system::health_ready))
        .with_state(state);

    let cors_layer = if cors_origins.is_empty() || cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(middleware::from_fn(
            observability::security_headers_middleware,
        ))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

/// Routes behind identity resolution. Reads are open to any resolved
/// identity; each mutating group declares the roles it admits.
fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let open = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/students", get(students::list_students))
        .route("/students", post(students::create_student))
        .route("/students/{id}", put(students::update_student))
        .route("/students/bulk", post(students::bulk_import))
        .route("/students/import", post(students::import_roster))
        .route("/students/export", get(students::export_roster))
        .route("/visits", get(visits::list_visits))
        .route("/special-cases", get(special_cases::list_special_cases))
        .route("/referrals", get(referrals::list_referrals))
        .route(
            "/clinic-appointments",
            get(clinic_appointments::list_appointments),
        )
        .route(
            "/clinic-appointments",
            post(clinic_appointments::create_appointment),
        )
        .route(
            "/clinic-appointments/{id}/whatsapp",
            put(clinic_appointments::mark_notified),
        )
        .route(
            "/clinic-appointments/{id}",
            delete(clinic_appointments::delete_appointment),
        )
        .route("/settings", get(settings::get_settings))
        .route("/dashboard", get(dashboard::get_summary))
        .route("/metrics", get(observability::get_metrics));

    let clinical = Router::new()
        .route("/visits", post(visits::create_visit))
        .route("/visits/{id}/whatsapp", put(visits::mark_notified))
        .route("/visits/{id}", delete(visits::delete_visit))
        .route("/special-cases", post(special_cases::create_special_case))
        .route(
            "/special-cases/{id}/whatsapp",
            put(special_cases::mark_notified),
        )
        .route(
            "/special-cases/{id}",
            delete(special_cases::delete_special_case),
        )
        .route("/referrals", post(referrals::create_referral))
        .route("/referrals/{id}/whatsapp", put(referrals::mark_notified))
        .route("/referrals/{id}", delete(referrals::delete_referral))
        .route_layer(middleware::from_fn_with_state(
            CLINICAL_STAFF,
            access::require_role,
        ));

    let admin = Router::new()
        .route("/students", delete(students::delete_all_students))
        .route("/students/{id}", delete(students::delete_student))
        .route("/users", get(users::list_users))
        .route("/users", post(users::create_user))
        .route("/users/{id}", put(users::update_user))
        .route("/users/{id}/reset-password", put(users::reset_password))
        .route("/settings", put(settings::update_settings))
        .route("/settings/backup", get(settings::backup))
        .route("/settings/restore", post(settings::restore))
        .route("/settings/reset-year", delete(settings::reset_year))
        .route("/audit", get(audit::list_entries))
        .route_layer(middleware::from_fn_with_state(
            ADMIN_ONLY,
            access::require_role,
        ));

    Router::new()
        .merge(open)
        .merge(clinical)
        .merge(admin)
        .route_layer(middleware::from_fn_with_state(
            state,
            access::resolve_identity,
        ))
}
