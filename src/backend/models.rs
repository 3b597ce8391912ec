//! Payloads exchanged with the identity backend

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Profile returned by the backend's current-user endpoint
///
/// Unrecognised fields are preserved in `extra` so that custom user
/// attributes survive a round trip through `/api/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendUser {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Provider the account was created with ("github", "local", ...)
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub confirmed: Option<bool>,
    #[serde(default)]
    pub blocked: Option<bool>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BackendUser {
    pub fn is_blocked(&self) -> bool {
        self.blocked.unwrap_or(false)
    }
}

/// Body of a successful provider callback exchange
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    /// Backend session token
    pub jwt: String,
    #[serde(default)]
    pub user: Option<BackendUser>,
}

/// Error envelope the backend wraps failures in
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
