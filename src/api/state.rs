//! Application State
//!
//! Shared state accessible by all handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::sessions::{token_from_headers, SessionBackend, SessionRegistry};
use crate::config::Config;
use crate::router::{RoleRouter, RouterResult};
use crate::session::SessionStore;

/// Role router bound to one client's session store
pub type ClientRouter = RoleRouter<Arc<dyn SessionStore>>;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Per-client session stores
    pub sessions: Arc<SessionRegistry>,
    /// Server configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
    /// Wall-clock start time reported by the health endpoint
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Create a new AppState with the configured session backend
    pub fn new(config: ApiConfig) -> Self {
        let sessions = SessionRegistry::new(config.backend.clone());
        Self::with_registry(config, sessions)
    }

    /// Create AppState around an existing registry
    pub fn with_registry(config: ApiConfig, sessions: SessionRegistry) -> Self {
        Self {
            sessions: Arc::new(sessions),
            config: Arc::new(config),
            start_time: Instant::now(),
            started_at: Utc::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Session token carried by the request, if any
    pub fn client_token(&self, headers: &HeaderMap) -> Option<Uuid> {
        token_from_headers(headers, &self.config.cookie_name)
    }

    /// Router over the requesting client's session (logged out if unknown)
    pub async fn router_for(&self, headers: &HeaderMap) -> ClientRouter {
        let store = self.sessions.lookup(self.client_token(headers)).await;
        RoleRouter::new(store)
    }

    /// Router over the requesting client's session, registering the client
    /// when it has none. Tokens the server never issued are replaced with a
    /// new one. Returns the token in use.
    pub async fn open_router(&self, headers: &HeaderMap) -> (Uuid, ClientRouter) {
        let token = match self.client_token(headers) {
            Some(token) if self.sessions.is_known(token).await => token,
            _ => Uuid::new_v4(),
        };
        let store = self.sessions.open(token).await;
        (token, RoleRouter::new(store))
    }

    /// Log the requesting client out and release its store.
    /// Returns the post-logout redirect.
    pub async fn logout(&self, headers: &HeaderMap) -> ApiResult<String> {
        let router = self.router_for(headers).await;
        let redirect = run_blocking(router, |router| router.logout()).await?;

        if let Some(token) = self.client_token(headers) {
            self.sessions.remove(token).await;
        }
        Ok(redirect)
    }
}

/// Run router operations on the blocking pool; file-backed stores do
/// synchronous disk I/O.
pub async fn run_blocking<T, F>(router: ClientRouter, op: F) -> ApiResult<T>
where
    F: FnOnce(&ClientRouter) -> RouterResult<T> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || op(&router))
        .await
        .map_err(|e| ApiError::Internal(format!("Session task failed: {}", e)))?;
    Ok(result?)
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Allowed CORS origins; empty means no cross-origin access
    pub cors_origins: Vec<String>,
    /// Session backend
    pub backend: SessionBackend,
    /// Cookie carrying the session token
    pub cookie_name: String,
    /// Delay before the logout page forwards to the login page
    pub logout_delay: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: Vec::new(),
            backend: SessionBackend::Memory,
            cookie_name: "cp_session".to_string(),
            logout_delay: Duration::from_millis(1000),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Build from the loaded configuration file
    pub fn from_config(config: &Config) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            cors_origins: config.server.cors_origins.clone(),
            backend: SessionBackend::from_config(&config.session),
            cookie_name: config.session.cookie_name.clone(),
            logout_delay: Duration::from_millis(config.session.logout_delay_ms),
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionBackendKind;
    use axum::http::{header, HeaderValue};

    fn cookie_headers(token: Uuid) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("cp_session={}", token)).unwrap(),
        );
        headers
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.server.port = 9001;
        config.session.backend = SessionBackendKind::File;
        config.session.data_dir = "/srv/cp".to_string();
        config.session.logout_delay_ms = 250;

        let api = ApiConfig::from_config(&config);

        assert_eq!(api.addr(), "0.0.0.0:9001");
        assert_eq!(
            api.backend,
            SessionBackend::File {
                dir: "/srv/cp/sessions".into()
            }
        );
        assert_eq!(api.logout_delay, Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_open_router_replaces_unissued_token() {
        let state = AppState::new(ApiConfig::default());
        let chosen = Uuid::new_v4();

        let (token, _) = state.open_router(&cookie_headers(chosen)).await;

        assert_ne!(token, chosen);
        assert!(!state.sessions.is_known(chosen).await);
    }

    #[tokio::test]
    async fn test_open_router_keeps_issued_token() {
        let state = AppState::new(ApiConfig::default());
        let (issued, _) = state.open_router(&HeaderMap::new()).await;

        let (token, _) = state.open_router(&cookie_headers(issued)).await;

        assert_eq!(token, issued);
    }

    #[tokio::test]
    async fn test_logout_releases_store() {
        let state = AppState::new(ApiConfig::default());
        let (token, router) = state.open_router(&HeaderMap::new()).await;
        run_blocking(router, |router| router.login("EditorJane"))
            .await
            .unwrap();
        assert_eq!(state.sessions.len().await, 1);

        let redirect = state.logout(&cookie_headers(token)).await.unwrap();

        assert_eq!(redirect, "/login");
        assert!(state.sessions.is_empty().await);
        assert!(!state.sessions.is_known(token).await);
    }
}
