//! strapi-connect - login through Strapi's Users & Permissions providers
//!
//! # Architecture
//!
//! ```text
//! browser ──GET /──────────────────────────▶ login page
//!    │                                         │ link
//!    │◀──────────────── <backend>/api/connect/github
//!    │   (backend runs the GitHub OAuth dance)
//!    │
//!    ├──GET /connect/github/redirect?access_token=..─▶ callback
//!    │                    GET <backend>/api/auth/github/callback ─▶ { jwt }
//!    │◀── Set-Cookie: jwt=...; HttpOnly ── 303 /dashboard
//!    │
//!    ├──GET /dashboard ──▶ require_session
//!    │                    GET <backend>/api/users/me (Bearer jwt)
//!    │
//!    └──POST /logout ──▶ Set-Cookie: jwt=; Max-Age=0 ── 303 /
//! ```
//!
//! # Modules
//!
//! - `auth`: login page, callback, session guard, logout
//! - `backend`: identity backend client
//! - `api`: protected dashboard, account JSON, metrics
//! - `config`: Configuration management
//! - `error`: Error types

pub mod api;
pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod metrics;

use std::sync::Arc;

/// Application state shared across all handlers
///
/// Holds no per-user data; each request resolves its session afresh.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::AppConfig>,

    /// Identity backend client
    pub backend: Arc<dyn backend::IdentityBackend>,
}

impl AppState {
    /// Initialize application state with the reqwest-backed backend client
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built
    pub fn new(config: config::AppConfig) -> Result<Self, error::AppError> {
        let backend = backend::StrapiClient::new(&config.backend)?;
        tracing::info!(
            backend = %config.backend.url,
            timeout_seconds = config.backend.timeout_seconds,
            "Identity backend client initialized"
        );

        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    /// Initialize application state around an existing backend
    pub fn with_backend(
        config: config::AppConfig,
        backend: Arc<dyn backend::IdentityBackend>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            backend,
        }
    }
}

/// Build the Axum router with all routes.
///
/// This is shared by the binary and integration tests to keep route
/// composition consistent across environments.
pub fn build_router(state: AppState) -> axum::Router {
    use axum::{Router, middleware};
    use tower_http::trace::TraceLayer;

    let protected = Router::new()
        .merge(api::dashboard_router())
        .merge(api::metrics_router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(auth::auth_router())
        .merge(protected)
        .nest("/api", api::account_router())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn not_found() -> error::AppError {
    error::AppError::NotFound
}
