//! Account endpoints
//!
//! JSON counterpart of the dashboard for script clients. The session token
//! itself never leaves the cookie.

use axum::{Json, Router, routing::get};

use crate::AppState;
use crate::auth::CurrentUser;
use crate::backend::BackendUser;

/// Create account router
///
/// Routes:
/// - GET /api/me - Current user profile
pub fn account_router() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

/// GET /api/me
///
/// Returns the profile the backend reports for the session right now.
async fn me(CurrentUser(user): CurrentUser) -> Json<BackendUser> {
    Json(user)
}
