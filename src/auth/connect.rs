//! Login entry point
//!
//! The backend drives the provider dance itself; all this service does is
//! point the browser at `<backend>/api/connect/<provider>`.

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect},
};
use url::Url;

use super::Provider;
use crate::AppState;
use crate::backend::endpoint_url;
use crate::error::AppError;

/// Backend URL that starts the OAuth flow for `provider`
pub fn connect_url(backend: &Url, provider: &Provider) -> Result<Url, AppError> {
    endpoint_url(backend, &["api", "connect", provider.as_str()])
}

/// GET /
///
/// Renders a login page with one sign-in link per enabled provider.
pub(super) async fn login_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let mut links = String::new();
    for provider in Provider::enabled(&state.config.auth.providers) {
        let href = connect_url(&state.config.backend.url, &provider)?;
        links.push_str(&format!(
            "            <li><a href=\"{}\">Sign in with {}</a></li>\n",
            html_escape::encode_double_quoted_attribute(href.as_str()),
            provider.label(),
        ));
    }

    Ok(Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Login</title></head>
<body>
    <h1>Sign in</h1>
    <ul>
{links}    </ul>
</body>
</html>
"#
    )))
}

/// GET /connect/:provider
///
/// Redirects to the backend connect endpoint, so frontends only ever
/// need to know this service's URL.
pub(super) async fn connect_redirect(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let provider = Provider::resolve(&provider, &state.config.auth.providers)?;
    let target = connect_url(&state.config.backend.url, &provider)?;

    tracing::debug!(provider = %provider, target = %target, "Starting backend connect flow");
    Ok(Redirect::to(target.as_str()))
}
