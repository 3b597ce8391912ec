//! Configuration management
//!
//! Loads configuration from:
//! 1. Default values
//! 2. Configuration file (config/default.toml, config/local.toml)
//! 3. Environment variables (override)

use serde::Deserialize;
use std::net::IpAddr;
use url::Url;

use crate::auth::is_known_provider;
use crate::error::AppError;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Port number (e.g., 3000)
    pub port: u16,
    /// Deployment environment
    #[serde(default)]
    pub environment: Environment,
}

/// Deployment environment selector
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

/// Identity backend (Strapi) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend, e.g. "https://cms.example.com"
    pub url: Url,
    /// Timeout for a single outbound call
    pub timeout_seconds: u64,
    /// User agent sent on outbound calls
    pub user_agent: String,
}

/// Session cookie and login flow configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Name of the cookie carrying the backend session token
    pub cookie_name: String,
    /// Cookie domain; host-only cookie when unset
    pub cookie_domain: Option<String>,
    /// Cookie path
    pub cookie_path: String,
    /// Session max age in seconds (default: 604800 = 7 days)
    pub session_max_age: i64,
    /// Providers enabled on the backend
    pub providers: Vec<String>,
    /// Login entry point; unauthenticated visitors land here
    pub login_path: String,
    /// Protected area reached after a successful callback
    pub after_login_path: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Log format: "pretty" or "json"
    pub format: String,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// # Loading Order
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/local.toml (if exists)
    /// 4. Environment variables (STRAPI_CONNECT__*)
    ///
    /// # Errors
    /// Returns error if configuration is invalid
    pub fn load() -> Result<Self, AppError> {
        use config::{Config, Environment, File};

        let config = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.environment", "development")?
            .set_default("backend.timeout_seconds", 10)?
            .set_default("backend.user_agent", "strapi-connect/0.1.0")?
            .set_default("auth.cookie_name", "jwt")?
            .set_default("auth.cookie_path", "/")?
            .set_default("auth.session_max_age", 604800)?
            .set_default("auth.providers", vec!["github"])?
            .set_default("auth.login_path", "/")?
            .set_default("auth.after_login_path", "/dashboard")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("STRAPI_CONNECT")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("auth.providers")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::Config(e.to_string()))?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Session cookies carry `Secure` in production only
    pub fn should_use_secure_cookies(&self) -> bool {
        self.server.environment == Environment::Production
    }

    fn validate(&self) -> Result<(), AppError> {
        let backend = &self.backend.url;
        if !matches!(backend.scheme(), "http" | "https") || backend.host_str().is_none() {
            return Err(AppError::Config(format!(
                "backend.url must be an http(s) URL, got {backend}"
            )));
        }

        if self.backend.timeout_seconds == 0 {
            return Err(AppError::Config(
                "backend.timeout_seconds must be greater than 0".to_string(),
            ));
        }

        if self.auth.cookie_name.trim().is_empty() {
            return Err(AppError::Config(
                "auth.cookie_name must not be empty".to_string(),
            ));
        }

        if self.auth.session_max_age <= 0 {
            return Err(AppError::Config(
                "auth.session_max_age must be greater than 0".to_string(),
            ));
        }

        if self.auth.providers.is_empty() {
            return Err(AppError::Config(
                "auth.providers must enable at least one provider".to_string(),
            ));
        }

        for provider in &self.auth.providers {
            if !is_known_provider(provider) {
                return Err(AppError::Config(format!(
                    "auth.providers contains unsupported provider '{provider}'"
                )));
            }
        }

        for (key, path) in [
            ("auth.cookie_path", &self.auth.cookie_path),
            ("auth.login_path", &self.auth.login_path),
            ("auth.after_login_path", &self.auth.after_login_path),
        ] {
            if !path.starts_with('/') {
                return Err(AppError::Config(format!("{key} must start with '/'")));
            }
        }

        if self.should_use_secure_cookies()
            && backend.scheme() != "https"
            && !is_local_host(backend)
        {
            return Err(AppError::Config(
                "backend.url must use https in production".to_string(),
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(AppError::Config(format!(
                "logging.level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.logging.level
            )));
        }

        if !matches!(self.logging.format.to_ascii_lowercase().as_str(), "pretty" | "json") {
            return Err(AppError::Config(format!(
                "logging.format must be \"pretty\" or \"json\", got '{}'",
                self.logging.format
            )));
        }

        Ok(())
    }

    /// Emit warnings about risky but allowed settings
    ///
    /// Called once the subscriber built from `logging` is installed.
    pub fn log_startup_warnings(&self) {
        if !self.should_use_secure_cookies() {
            tracing::warn!(
                environment = ?self.server.environment,
                "Using insecure session cookies for local development"
            );
        }
    }
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl LoggingConfig {
    /// `EnvFilter` directive for this crate at the configured level
    pub fn filter_directive(&self) -> String {
        format!(
            "strapi_connect={},tower_http=debug",
            self.level.to_ascii_lowercase()
        )
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

fn is_local_host(url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim_end_matches('.')
        .to_ascii_lowercase();

    if host == "localhost" || host.ends_with(".localhost") {
        return true;
    }

    if let Ok(ip) = host.parse::<IpAddr>() {
        return ip.is_loopback() || ip.is_unspecified();
    }

    false
}
