//! Logout
//!
//! The backend keeps no session state for these tokens, so logging out is
//! purely a matter of expiring the cookie.

use axum::{extract::State, response::Redirect};
use axum_extra::extract::CookieJar;

use super::cookie::cleared_session_cookie;
use crate::AppState;
use crate::metrics::LOGOUTS_TOTAL;

/// POST /logout
///
/// Clears the session cookie and redirects to the login entry point,
/// whether or not a session existed.
pub(super) async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    LOGOUTS_TOTAL.inc();
    tracing::info!("User signed out");

    let jar = jar.add(cleared_session_cookie(&state.config));
    (jar, Redirect::to(&state.config.auth.login_path))
}
