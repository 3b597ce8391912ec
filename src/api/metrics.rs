//! `/metrics` for operators
//!
//! Lives behind the session guard like the dashboard, so only signed-in
//! users can read login and session counters.

use axum::{
    Router,
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::AppState;
use crate::error::AppError;

/// Create metrics router
///
/// Routes:
/// - GET /metrics
pub fn metrics_router() -> Router<AppState> {
    Router::new().route("/metrics", get(metrics))
}

/// GET /metrics
async fn metrics() -> Result<Response, AppError> {
    let (body, content_type) = crate::metrics::render()?;
    Ok(([(CONTENT_TYPE, content_type)], body).into_response())
}
