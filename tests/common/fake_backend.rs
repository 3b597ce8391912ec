//! In-process stand-in for the identity backend
//!
//! Serves the two endpoints the service calls and records every request it
//! receives, so tests can assert how many outbound calls were made.
//!
//! Access tokens understood by the callback endpoint:
//! - `abc123` → `{ "jwt": "xyz", "user": ... }`
//! - `boom` → 500
//! - `no-jwt` → 200 with only a `user`
//! - `empty-jwt` → 200 with `"jwt": ""`
//! - `numeric-jwt` → 200 with `"jwt": 42`
//! - anything else → 400
//!
//! Session tokens understood by `/api/users/me`:
//! - `xyz`, `valid-token` → octocat's profile
//! - `blocked-token` → a blocked profile
//! - anything else → 401

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

/// One request as seen by the fake backend
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub access_token: Option<String>,
    pub authorization: Option<String>,
    pub cache_control: Option<String>,
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<RecordedRequest>>>);

pub struct FakeBackend {
    addr: String,
    recorder: Recorder,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let recorder = Recorder::default();
        let app = Router::new()
            .route("/api/auth/:provider/callback", get(auth_callback))
            .route("/api/users/me", get(users_me))
            .with_state(recorder.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr: format!("http://{addr}"),
            recorder,
        }
    }

    pub fn base_url(&self) -> Url {
        Url::parse(&self.addr).unwrap()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.recorder.0.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.path == path)
            .collect()
    }
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn user(id: u64, username: &str, blocked: bool) -> Value {
    json!({
        "id": id,
        "documentId": format!("doc-{id}"),
        "username": username,
        "email": format!("{username}@github.com"),
        "provider": "github",
        "confirmed": true,
        "blocked": blocked,
        "createdAt": "2024-05-01T10:00:00.000Z",
        "updatedAt": "2024-05-01T10:00:00.000Z"
    })
}

fn error_body(status: StatusCode, name: &str, message: &str) -> Response {
    (
        status,
        Json(json!({
            "data": null,
            "error": { "status": status.as_u16(), "name": name, "message": message }
        })),
    )
        .into_response()
}

async fn auth_callback(
    State(recorder): State<Recorder>,
    Path(provider): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let access_token = query.get("access_token").cloned();
    recorder.0.lock().unwrap().push(RecordedRequest {
        path: format!("/api/auth/{provider}/callback"),
        access_token: access_token.clone(),
        authorization: header_value(&headers, header::AUTHORIZATION),
        cache_control: header_value(&headers, header::CACHE_CONTROL),
    });

    match access_token.as_deref() {
        Some("abc123") => Json(json!({ "jwt": "xyz", "user": user(1, "octocat", false) }))
            .into_response(),
        Some("no-jwt") => Json(json!({ "user": user(1, "octocat", false) })).into_response(),
        Some("empty-jwt") => Json(json!({ "jwt": "", "user": user(1, "octocat", false) }))
            .into_response(),
        Some("numeric-jwt") => Json(json!({ "jwt": 42 })).into_response(),
        Some("boom") => error_body(
            StatusCode::INTERNAL_SERVER_ERROR,
            "InternalServerError",
            "Internal Server Error",
        ),
        _ => error_body(
            StatusCode::BAD_REQUEST,
            "ApplicationError",
            "Bad credentials",
        ),
    }
}

async fn users_me(State(recorder): State<Recorder>, headers: HeaderMap) -> Response {
    let authorization = header_value(&headers, header::AUTHORIZATION);
    recorder.0.lock().unwrap().push(RecordedRequest {
        path: "/api/users/me".to_string(),
        access_token: None,
        authorization: authorization.clone(),
        cache_control: header_value(&headers, header::CACHE_CONTROL),
    });

    match authorization.as_deref().and_then(|h| h.strip_prefix("Bearer ")) {
        Some("xyz") | Some("valid-token") => Json(user(1, "octocat", false)).into_response(),
        Some("blocked-token") => Json(user(2, "mallory", true)).into_response(),
        _ => error_body(
            StatusCode::UNAUTHORIZED,
            "UnauthorizedError",
            "Missing or invalid credentials",
        ),
    }
}
