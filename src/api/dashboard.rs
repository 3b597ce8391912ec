//! Protected area
//!
//! Mounted behind `require_session`, so handlers can rely on the user
//! being present in request extensions.

use axum::{Extension, Router, response::Html, routing::get};

use crate::AppState;
use crate::backend::BackendUser;

/// Create dashboard router
///
/// Routes:
/// - GET /dashboard
pub fn dashboard_router() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

/// GET /dashboard
async fn dashboard(Extension(user): Extension<BackendUser>) -> Html<String> {
    let username = html_escape::encode_text(&user.username);
    let email = user
        .email
        .as_deref()
        .map(|email| format!("<p>{}</p>", html_escape::encode_text(email)))
        .unwrap_or_default();

    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Dashboard</title></head>
<body>
    <h1>Welcome, {username}</h1>
    {email}
    <form method="post" action="/logout">
        <button type="submit">Sign out</button>
    </form>
</body>
</html>
"#
    ))
}
