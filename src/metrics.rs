//! Prometheus registry for login, session and backend counters

use lazy_static::lazy_static;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

use crate::error::AppError;

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // Login Metrics
    pub static ref LOGINS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("strapi_connect_logins_total", "Total number of login callbacks handled"),
        &["provider", "outcome"]
    ).expect("metric can be created");
    pub static ref LOGOUTS_TOTAL: IntCounter = IntCounter::new(
        "strapi_connect_logouts_total",
        "Total number of logouts"
    ).expect("metric can be created");

    // Session Metrics
    pub static ref SESSION_CHECKS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("strapi_connect_session_checks_total", "Total number of session guard checks"),
        &["outcome"]
    ).expect("metric can be created");

    // Backend Metrics
    pub static ref BACKEND_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "strapi_connect_backend_request_duration_seconds",
            "Identity backend request duration in seconds"
        ).buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["endpoint"]
    ).expect("metric can be created");

    // Error Metrics
    pub static ref ERRORS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("strapi_connect_errors_total", "Total number of errors"),
        &["error_type"]
    ).expect("metric can be created");
}

/// Initialize metrics registry.
///
/// Safe to call more than once; repeated registrations are ignored.
pub fn init_metrics() {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(LOGINS_TOTAL.clone()),
        Box::new(LOGOUTS_TOTAL.clone()),
        Box::new(SESSION_CHECKS_TOTAL.clone()),
        Box::new(BACKEND_REQUEST_DURATION_SECONDS.clone()),
        Box::new(ERRORS_TOTAL.clone()),
    ];

    for collector in collectors {
        if let Err(error) = REGISTRY.register(collector) {
            tracing::debug!(%error, "Metric already registered");
        }
    }
}

/// Render the registry in the Prometheus text exposition format
///
/// Returns the body together with its content type.
pub fn render() -> Result<(String, String), AppError> {
    let encoder = TextEncoder::new();
    let body = encoder
        .encode_to_string(&REGISTRY.gather())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to encode metrics: {e}")))?;
    Ok((body, encoder.format_type().to_string()))
}
