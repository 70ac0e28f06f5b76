//! Community Platform HTTP host
//!
//! Serves the site with the Role Router applied on the server, built with Axum.
//!
//! # Endpoints
//!
//! ## Pages
//! - `GET /` - Home
//! - `GET /login`, `POST /login` - Login page and form submission
//! - `GET /register` - Registration page
//! - `GET /logout` - Log out
//! - `GET /dashboard`, `/community`, `/workspaces`, `/profile` - Role-scoped redirects
//! - `GET /:role/:page` - Role-scoped pages
//! - `GET /workspaces/:workspace_id` - Workspace detail
//! - `GET /invite/:workspace_id/:invite_code` - Invite landing page
//!
//! ## Session API
//! - `POST /api/session` - Log in
//! - `GET /api/session` - Current session
//! - `DELETE /api/session` - Log out
//! - `POST /api/navigate` - Decide a link click
//! - `GET /api/paths/:page` - Role-scoped path for a logical page
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use community_platform::api::{serve, ApiConfig, AppState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApiConfig::default();
//!     let state = AppState::new(config.clone());
//!     serve(state, &config).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod render;
pub mod routes;
pub mod sessions;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use sessions::{SessionBackend, SessionRegistry};
pub use state::{ApiConfig, AppState, ClientRouter};

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route("/", get(routes::pages::index))
        .route(
            "/login",
            get(routes::pages::login_page).post(routes::pages::login_submit),
        )
        .route("/register", get(routes::pages::register_page))
        .route("/logout", get(routes::pages::logout))
        .route("/dashboard", get(routes::pages::dashboard))
        .route("/community", get(routes::pages::community))
        .route("/workspaces", get(routes::pages::workspaces))
        .route("/profile", get(routes::pages::profile))
        .route("/workspaces/:workspace_id", get(routes::pages::workspace_detail))
        .route(
            "/invite/:workspace_id/:invite_code",
            get(routes::pages::invite),
        )
        .route("/:role/:page", get(routes::pages::role_page));

    let api_routes = Router::new()
        .route(
            "/session",
            get(routes::session::get_session)
                .post(routes::session::create_session)
                .delete(routes::session::delete_session),
        )
        .route("/navigate", post(routes::navigation::navigate))
        .route("/paths/:page", get(routes::navigation::page_path));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config.cors_origins);
    let shared_state = Arc::new(state);

    Router::new()
        .merge(page_routes)
        .nest("/api", api_routes)
        .nest("/health", health_routes)
        .fallback(routes::pages::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the HTTP server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    state.sessions.check_backend()?;
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Community Platform listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Community Platform shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
