//! Session guard
//!
//! Protects routes that require authentication. The session cookie is only
//! a carrier; every check asks the backend whether the token is still good.

use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use super::cookie::session_token;
use crate::AppState;
use crate::backend::{BackendUser, IdentityBackend};
use crate::error::AppError;
use crate::metrics::SESSION_CHECKS_TOTAL;

/// Outcome of a session check
#[derive(Debug, Clone, PartialEq)]
pub enum SessionStatus {
    Authenticated(BackendUser),
    Unauthenticated,
}

/// Check a session token against the backend
///
/// A missing token short-circuits without a backend call. Any backend
/// failure, including network errors, counts as unauthenticated.
pub async fn check_session(backend: &dyn IdentityBackend, token: Option<&str>) -> SessionStatus {
    let Some(token) = token else {
        SESSION_CHECKS_TOTAL.with_label_values(&["missing"]).inc();
        return SessionStatus::Unauthenticated;
    };

    match backend.current_user(token).await {
        Ok(user) if user.is_blocked() => {
            SESSION_CHECKS_TOTAL.with_label_values(&["blocked"]).inc();
            tracing::info!(user_id = user.id, "Session belongs to a blocked user");
            SessionStatus::Unauthenticated
        }
        Ok(user) => {
            SESSION_CHECKS_TOTAL
                .with_label_values(&["authenticated"])
                .inc();
            SessionStatus::Authenticated(user)
        }
        Err(error) => {
            SESSION_CHECKS_TOTAL.with_label_values(&["rejected"]).inc();
            tracing::debug!(error = %error, "Session rejected by backend");
            SessionStatus::Unauthenticated
        }
    }
}

/// Middleware to require a live session
///
/// Unauthenticated requests are redirected to the login entry point.
/// Authenticated requests carry the `BackendUser` in their extensions.
///
/// # Usage
/// ```ignore
/// let protected_routes = Router::new()
///     .route("/dashboard", ...)
///     .route_layer(middleware::from_fn_with_state(state, require_session));
/// ```
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let token = session_token(&jar, &state.config);

    match check_session(state.backend.as_ref(), token.as_deref()).await {
        SessionStatus::Authenticated(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        SessionStatus::Unauthenticated => {
            tracing::debug!(path = %request.uri().path(), "Redirecting unauthenticated request");
            Redirect::to(&state.config.auth.login_path).into_response()
        }
    }
}

/// Extractor for the current authenticated user
///
/// Reuses the user `require_session` already resolved; otherwise performs
/// the same backend check. Rejects with 401 instead of redirecting, which
/// suits JSON endpoints.
///
/// # Usage
/// ```ignore
/// async fn handler(CurrentUser(user): CurrentUser) -> impl IntoResponse {
///     format!("Hello, {}", user.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub BackendUser);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<BackendUser>().cloned() {
            return Ok(CurrentUser(user));
        }

        let state = AppState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);
        let token = session_token(&jar, &state.config);

        match check_session(state.backend.as_ref(), token.as_deref()).await {
            SessionStatus::Authenticated(user) => {
                parts.extensions.insert(user.clone());
                Ok(CurrentUser(user))
            }
            SessionStatus::Unauthenticated => Err(AppError::Unauthorized),
        }
    }
}
