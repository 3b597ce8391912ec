//! Session cookie
//!
//! The backend session token lives only in an HTTP-only cookie. There is
//! no server-side session storage; the backend stays the source of truth.

use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::config::AppConfig;

/// Cookie carrying a freshly issued session token
pub fn session_cookie(config: &AppConfig, token: String) -> Cookie<'static> {
    let mut builder = Cookie::build((config.auth.cookie_name.clone(), token))
        .path(config.auth.cookie_path.clone())
        .http_only(true)
        .secure(config.should_use_secure_cookies())
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(config.auth.session_max_age));

    if let Some(domain) = &config.auth.cookie_domain {
        builder = builder.domain(domain.clone());
    }

    builder.build()
}

/// Cookie that overwrites the session with an empty, already-expired value
///
/// Path and domain must match the issued cookie or the browser keeps it.
pub fn cleared_session_cookie(config: &AppConfig) -> Cookie<'static> {
    let mut builder = Cookie::build((config.auth.cookie_name.clone(), String::new()))
        .path(config.auth.cookie_path.clone())
        .http_only(true)
        .secure(config.should_use_secure_cookies())
        .same_site(SameSite::Lax)
        .max_age(time::Duration::ZERO);

    if let Some(domain) = &config.auth.cookie_domain {
        builder = builder.domain(domain.clone());
    }

    builder.build()
}

/// Session token from the request cookies, if any
pub fn session_token(jar: &CookieJar, config: &AppConfig) -> Option<String> {
    jar.get(&config.auth.cookie_name)
        .map(|cookie| cookie.value().trim())
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}
