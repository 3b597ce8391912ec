//! Common test utilities for E2E tests

pub mod fake_backend;

use std::net::SocketAddr;

use strapi_connect::{AppState, config};
use tokio::net::TcpListener;
use url::Url;

pub use fake_backend::FakeBackend;

/// Test server instance wired to a fake identity backend
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub backend: FakeBackend,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Development-mode server with GitHub enabled
    pub async fn new() -> Self {
        Self::with_environment(config::Environment::Development).await
    }

    /// Server running in the given environment
    pub async fn with_environment(environment: config::Environment) -> Self {
        Self::with_config(|config| config.server.environment = environment).await
    }

    /// Development-mode server with adjusted configuration
    pub async fn with_config(edit: impl FnOnce(&mut config::AppConfig)) -> Self {
        let backend = FakeBackend::start().await;
        let mut config = test_config(backend.base_url(), config::Environment::Development);
        edit(&mut config);
        Self::start(config, backend).await
    }

    /// Server whose backend URL points at a port nobody listens on
    pub async fn with_unreachable_backend() -> Self {
        let backend = FakeBackend::start().await;
        let closed = closed_port_url().await;
        let config = test_config(closed, config::Environment::Development);
        Self::start(config, backend).await
    }

    async fn start(config: config::AppConfig, backend: FakeBackend) -> Self {
        let state = AppState::new(config).unwrap();

        // Redirects are asserted on, never followed
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = strapi_connect::build_router(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        Self {
            addr: format!("http://{}", addr),
            state,
            backend,
            client,
        }
    }

    /// Get base URL for requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }
}

fn test_config(backend_url: Url, environment: config::Environment) -> config::AppConfig {
    config::AppConfig {
        server: config::ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            environment,
        },
        backend: config::BackendConfig {
            url: backend_url,
            timeout_seconds: 5,
            user_agent: "strapi-connect-e2e".to_string(),
        },
        auth: config::AuthConfig {
            cookie_name: "jwt".to_string(),
            cookie_domain: None,
            cookie_path: "/".to_string(),
            session_max_age: 604_800,
            providers: vec!["github".to_string()],
            login_path: "/".to_string(),
            after_login_path: "/dashboard".to_string(),
        },
        logging: config::LoggingConfig {
            level: "info".to_string(),
            format: "pretty".to_string(),
        },
    }
}

async fn closed_port_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{addr}")).unwrap()
}

/// All `Set-Cookie` header values on a response
pub fn set_cookies(response: &reqwest::Response) -> Vec<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok().map(ToString::to_string))
        .collect()
}

/// `Location` header of a redirect response
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("location header")
        .to_string()
}
