//! API layer
//!
//! HTTP handlers for:
//! - Protected dashboard
//! - Account JSON API
//! - Metrics (Prometheus)

mod account;
mod dashboard;
pub mod metrics;

pub use account::account_router;
pub use dashboard::dashboard_router;
pub use metrics::metrics_router;
