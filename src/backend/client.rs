//! Identity backend client
//!
//! Every method performs exactly one outbound request. Nothing is retried
//! and nothing is cached.

use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use url::Url;

use super::models::{AuthResponse, BackendUser, ErrorEnvelope};
use crate::auth::Provider;
use crate::config::BackendConfig;
use crate::error::AppError;
use crate::metrics::BACKEND_REQUEST_DURATION_SECONDS;

/// Operations this service needs from the identity backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityBackend: Send + Sync {
    /// Trade a provider access token for a backend session token
    async fn exchange_access_token(
        &self,
        provider: &Provider,
        access_token: &str,
    ) -> Result<AuthResponse, AppError>;

    /// Resolve a session token to the live user profile
    async fn current_user(&self, session_token: &str) -> Result<BackendUser, AppError>;
}

/// Append path segments to a base URL, keeping any prefix the base carries
///
/// `https://cms.example.com/strapi/` + `["api", "users", "me"]` gives
/// `https://cms.example.com/strapi/api/users/me`.
pub fn endpoint_url(base: &Url, segments: &[&str]) -> Result<Url, AppError> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|_| AppError::Config(format!("backend URL cannot be a base: {base}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// reqwest-backed Strapi client
pub struct StrapiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl StrapiClient {
    /// Build a client with the configured timeout and user agent
    pub fn new(config: &BackendConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Internal(e.into()))?;

        Ok(Self {
            http,
            base_url: config.url.clone(),
        })
    }
}

#[async_trait]
impl IdentityBackend for StrapiClient {
    async fn exchange_access_token(
        &self,
        provider: &Provider,
        access_token: &str,
    ) -> Result<AuthResponse, AppError> {
        let url = endpoint_url(
            &self.base_url,
            &["api", "auth", provider.as_str(), "callback"],
        )?;

        let timer = BACKEND_REQUEST_DURATION_SECONDS
            .with_label_values(&["auth_callback"])
            .start_timer();
        let response = self
            .http
            .get(url)
            .query(&[("access_token", access_token)])
            .send()
            .await;
        timer.observe_duration();

        let response = response?;
        let status = response.status();
        if !status.is_success() {
            let detail = upstream_error_detail(response).await;
            tracing::warn!(
                provider = %provider,
                status = status.as_u16(),
                detail = %detail,
                "Backend rejected provider access token"
            );
            return Err(if status.is_server_error() {
                AppError::Backend(format!("callback exchange returned {status}: {detail}"))
            } else {
                AppError::AuthenticationFailed {
                    status: status.as_u16(),
                }
            });
        }

        let auth: AuthResponse = response
            .json()
            .await
            .map_err(|e| AppError::Backend(format!("malformed callback response: {e}")))?;

        if auth.jwt.is_empty() {
            return Err(AppError::Backend(
                "callback response carried an empty jwt".to_string(),
            ));
        }

        Ok(auth)
    }

    async fn current_user(&self, session_token: &str) -> Result<BackendUser, AppError> {
        let url = endpoint_url(&self.base_url, &["api", "users", "me"])?;

        let timer = BACKEND_REQUEST_DURATION_SECONDS
            .with_label_values(&["users_me"])
            .start_timer();
        let response = self
            .http
            .get(url)
            .bearer_auth(session_token)
            .header(CACHE_CONTROL, "no-cache, no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await;
        timer.observe_duration();

        let response = response?;
        let status = response.status();
        if !status.is_success() {
            let detail = upstream_error_detail(response).await;
            tracing::debug!(
                status = status.as_u16(),
                detail = %detail,
                "Backend refused session token"
            );
            return Err(AppError::AuthenticationFailed {
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Backend(format!("malformed user profile: {e}")))
    }
}

/// Best-effort summary of an error body, for logs only
async fn upstream_error_detail(response: reqwest::Response) -> String {
    let status = response.status();
    match response.json::<ErrorEnvelope>().await {
        Ok(envelope) => match (envelope.error.name, envelope.error.message) {
            (Some(name), Some(message)) => format!("{name}: {message}"),
            (None, Some(message)) => message,
            (Some(name), None) => name,
            (None, None) => status.to_string(),
        },
        Err(_) => status.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_appends_to_bare_host() {
        let base = Url::parse("http://localhost:1337").unwrap();
        let url = endpoint_url(&base, &["api", "users", "me"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:1337/api/users/me");
    }

    #[test]
    fn endpoint_url_keeps_path_prefix() {
        let base = Url::parse("https://cms.example.com/strapi/").unwrap();
        let url = endpoint_url(&base, &["api", "connect", "github"]).unwrap();
        assert_eq!(url.as_str(), "https://cms.example.com/strapi/api/connect/github");
    }

    #[test]
    fn endpoint_url_drops_query_and_fragment() {
        let base = Url::parse("https://cms.example.com/?x=1#top").unwrap();
        let url = endpoint_url(&base, &["api", "users", "me"]).unwrap();
        assert_eq!(url.as_str(), "https://cms.example.com/api/users/me");
    }
}
