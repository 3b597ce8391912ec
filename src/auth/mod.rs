//! Login through the identity backend
//!
//! Handles:
//! - Login page and backend connect redirect
//! - Provider callback and session cookie
//! - Session guard middleware
//! - Logout

mod callback;
mod connect;
pub mod cookie;
mod guard;
mod logout;
mod provider;

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

pub use connect::connect_url;
pub use guard::{CurrentUser, SessionStatus, check_session, require_session};
pub use provider::{Provider, is_known_provider};

/// Create authentication router
///
/// Routes:
/// - GET / - Login page
/// - GET /connect/:provider - Redirect to the backend connect endpoint
/// - GET /connect/:provider/redirect - Provider callback
/// - POST /logout - Logout
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/", get(connect::login_page))
        .route("/connect/:provider", get(connect::connect_redirect))
        .route("/connect/:provider/redirect", get(callback::oauth_callback))
        .route("/logout", post(logout::logout))
}
