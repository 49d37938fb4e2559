//! Request logging, metrics and response hardening.

use axum::{
    extract::{MatchedPath, Request, State},
    http::{HeaderName, HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use super::AppState;
use super::access::ClientAddress;

/// Headers attached to every response.
const HARDENING_HEADERS: &[(HeaderName, &str)] = &[
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "DENY"),
    (header::REFERRER_POLICY, "no-referrer"),
    (header::CACHE_CONTROL, "no-store"),
];

/// `GET /api/metrics` in Prometheus text format.
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.prometheus_handle.as_ref().map_or_else(
        || "Metrics not enabled or failed to initialize".to_string(),
        metrics_exporter_prometheus::PrometheusHandle::render,
    )
}

fn outcome(status: StatusCode) -> &'static str {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => "denied",
        s if s.is_server_error() => "error",
        s if s.is_client_error() => "client_error",
        _ => "success",
    }
}

/// One span per request. `user_id` is recorded once the identity resolves.
pub async fn logging_middleware(
    ClientAddress(address): ClientAddress,
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| path.clone(), |mp| mp.as_str().to_string());

    let span = info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        %method,
        %path,
        client = %address,
        user_id = tracing::field::Empty,
    );

    async move {
        let response = next.run(req).await;
        let status = response.status();
        let outcome = outcome(status);

        let labels = [
            ("method", method.to_string()),
            ("route", route),
            ("status", status.as_u16().to_string()),
        ];
        metrics::counter!("clinicdesk_http_requests_total", &labels).increment(1);
        metrics::histogram!("clinicdesk_http_request_duration_seconds", &labels)
            .record(start.elapsed().as_secs_f64());
        if outcome == "denied" {
            metrics::counter!("clinicdesk_access_denied_total").increment(1);
        }

        info!(
            status_code = status.as_u16(),
            duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            outcome,
            "Request finished"
        );

        response
    }
    .instrument(span)
    .await
}

pub async fn security_headers_middleware(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    for (name, value) in HARDENING_HEADERS {
        headers.insert(name.clone(), HeaderValue::from_static(*value));
    }
    response
}
