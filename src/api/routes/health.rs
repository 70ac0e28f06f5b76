//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (session backend usable)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Returns 200 if the session backend can be used.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    if check_session_backend(&state) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health
///
/// Full health status with component details.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let sessions_ok = check_session_backend(&state);

    Json(HealthResponse {
        status: if sessions_ok { "healthy" } else { "unhealthy" }.to_string(),
        sessions: if sessions_ok { "ok" } else { "error" }.to_string(),
        backend: state.sessions.backend().name().to_string(),
        active_sessions: state.sessions.len().await,
        started_at: state.started_at.to_rfc3339(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn check_session_backend(state: &AppState) -> bool {
    match state.sessions.check_backend() {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Session backend unavailable");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let status = liveness().await;
        assert_eq!(status, StatusCode::OK);
    }
}
