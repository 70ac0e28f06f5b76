//! Session Routes
//!
//! - POST /api/session - Log in (username only; role derived from it)
//! - GET /api/session - Current session
//! - DELETE /api/session - Log out

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{LoginRequest, LoginResponse, LogoutResponse, SessionResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::sessions::{expired_session_cookie, session_cookie};
use crate::api::state::{run_blocking, AppState};

/// POST /api/session
///
/// The username is stored as typed; only blank input is rejected.
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Response> {
    if req.username.trim().is_empty() {
        return Err(ApiError::Validation("username is required".to_string()));
    }

    let (token, router) = state.open_router(&headers).await;
    let outcome = run_blocking(router, move |router| router.login(&req.username)).await?;

    let body = LoginResponse {
        session: SessionResponse::from(Some(&outcome.session)),
        redirect: outcome.redirect,
    };

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, session_cookie(&state.config.cookie_name, token))],
        Json(body),
    )
        .into_response())
}

/// GET /api/session
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<SessionResponse>> {
    let router = state.router_for(&headers).await;
    let session = run_blocking(router, |router| router.session()).await?;
    Ok(Json(SessionResponse::from(session.as_ref())))
}

/// DELETE /api/session
///
/// Idempotent: logging out without a session still succeeds.
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let redirect = state.logout(&headers).await?;

    Ok((
        [(header::SET_COOKIE, expired_session_cookie(&state.config.cookie_name))],
        Json(LogoutResponse { redirect }),
    )
        .into_response())
}
