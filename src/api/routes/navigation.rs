//! Navigation Routes
//!
//! Exposes the gating rules to client-side code.
//!
//! - POST /api/navigate - Decide a link click
//! - GET /api/paths/:page - Role-scoped path for a logical page

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{NavigateRequest, NavigateResponse, PagePathResponse};
use crate::api::error::ApiResult;
use crate::api::state::{run_blocking, AppState};

/// POST /api/navigate
pub async fn navigate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<NavigateRequest>,
) -> ApiResult<Json<NavigateResponse>> {
    let router = state.router_for(&headers).await;
    let href = req.href.clone();
    let decision = run_blocking(router, move |router| router.navigate(&href)).await?;
    Ok(Json(NavigateResponse::new(req.href, &decision)))
}

/// GET /api/paths/:page
///
/// Unknown page keys are rejected with 400.
pub async fn page_path(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(page): Path<String>,
) -> ApiResult<Json<PagePathResponse>> {
    let router = state.router_for(&headers).await;
    let key = page.clone();
    let path = run_blocking(router, move |router| router.destination_for(&key)).await?;
    Ok(Json(PagePathResponse { page, path }))
}
