//! Provider callback
//!
//! The backend finishes the provider exchange and sends the browser here
//! with the provider's access token. That token is traded once for a
//! backend session token, which is then stored in the session cookie.

use axum::{
    extract::{Path, Query, State},
    response::Redirect,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use super::Provider;
use super::cookie::session_cookie;
use crate::AppState;
use crate::error::AppError;
use crate::metrics::LOGINS_TOTAL;

/// Query parameters on the callback redirect
///
/// The backend appends more fields (`raw[...]`, `id_token`, ...); they are
/// ignored.
#[derive(Debug, Deserialize)]
pub(super) struct CallbackQuery {
    access_token: Option<String>,
}

/// GET /connect/:provider/redirect
///
/// # Steps
/// 1. Resolve the provider against the enabled list
/// 2. Require a non-empty access token
/// 3. Exchange it at the backend (single attempt)
/// 4. Set the session cookie and redirect to the protected area
///
/// No cookie is written unless every step succeeds.
pub(super) async fn oauth_callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(query): Query<CallbackQuery>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AppError> {
    let provider = match Provider::resolve(&provider, &state.config.auth.providers) {
        Ok(provider) => provider,
        Err(error) => {
            LOGINS_TOTAL.with_label_values(&["unknown", "rejected"]).inc();
            return Err(error);
        }
    };

    let access_token = match query.access_token.as_deref().map(str::trim) {
        Some(token) if !token.is_empty() => token,
        _ => {
            LOGINS_TOTAL
                .with_label_values(&[provider.as_str(), "rejected"])
                .inc();
            return Err(AppError::Validation(
                "missing access_token query parameter".to_string(),
            ));
        }
    };

    let auth = match state
        .backend
        .exchange_access_token(&provider, access_token)
        .await
    {
        Ok(auth) => auth,
        Err(error) => {
            LOGINS_TOTAL
                .with_label_values(&[provider.as_str(), "failed"])
                .inc();
            tracing::warn!(provider = %provider, error = %error, "Login callback failed");
            return Err(error);
        }
    };

    LOGINS_TOTAL
        .with_label_values(&[provider.as_str(), "success"])
        .inc();
    match &auth.user {
        Some(user) => tracing::info!(
            provider = %provider,
            user_id = user.id,
            username = %user.username,
            "User signed in"
        ),
        None => tracing::info!(provider = %provider, "User signed in"),
    }

    let jar = jar.add(session_cookie(&state.config, auth.jwt));
    Ok((jar, Redirect::to(&state.config.auth.after_login_path)))
}
