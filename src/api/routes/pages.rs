//! Page Routes
//!
//! Server-rendered site pages with the Role Router applied:
//!
//! - GET / - Home (never gated)
//! - GET /login, GET /register - Redirect to the dashboard when logged in
//! - POST /login - Login form submission
//! - GET /logout - Clear the session, forward to /login after a delay
//! - GET /dashboard - Redirect to the role's dashboard
//! - GET /community, /workspaces, /profile - Redirect to the role-scoped page
//! - GET /:role/:page - Role-scoped page
//! - GET /workspaces/:workspace_id - Workspace detail
//! - GET /invite/:workspace_id/:invite_code - Invite landing page (never gated)

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use std::sync::Arc;

use crate::api::dto::LoginRequest;
use crate::api::error::ApiResult;
use crate::api::render::{escape_html, refresh_meta, render_login_form, render_sidebar, Page};
use crate::api::sessions::{expired_session_cookie, session_cookie};
use crate::api::state::{run_blocking, AppState};
use crate::router::{NavDecision, PageKey, LOGIN_PATH, REGISTER_PATH};
use crate::session::Role;

/// GET /
pub async fn index(State(state): State<Arc<AppState>>, headers: HeaderMap) -> ApiResult<Response> {
    let router = state.router_for(&headers).await;
    let session = run_blocking(router, |router| router.session()).await?;

    let body = match &session {
        Some(session) => format!(
            "<p>Welcome back, {}.</p>",
            escape_html(&session.username)
        ),
        None => r#"<p>A shared space for directors, editors and music directors. <a href="/login">Log in</a> to get started.</p>"#.to_string(),
    };

    Ok(Html(Page::new("Community Platform", session.as_ref()).body(body).render()).into_response())
}

/// GET /login
pub async fn login_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let router = state.router_for(&headers).await;

    if let Some(target) = run_blocking(router, |router| router.page_load(LOGIN_PATH)).await? {
        return Ok(Redirect::to(&target).into_response());
    }

    Ok(Html(Page::new("Login", None).body(render_login_form(None)).render()).into_response())
}

/// GET /register
pub async fn register_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let router = state.router_for(&headers).await;

    let dashboard = run_blocking(router, |router| {
        Ok(match router.session()? {
            Some(_) => Some(router.destination(PageKey::Dashboard)?),
            None => None,
        })
    })
    .await?;

    if let Some(target) = dashboard {
        return Ok(Redirect::to(&target).into_response());
    }

    let body = format!(
        "<p>Pick a username to join. Names containing \"editor\" join as editors, names containing \"music\" as music directors, everyone else as directors.</p>{}",
        render_login_form(None)
    );
    Ok(Html(Page::new("Register", None).body(body).render()).into_response())
}

/// POST /login
///
/// Form submission from the login page. Starts a session and redirects to
/// the role's dashboard. The username is stored as typed.
pub async fn login_submit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(req): Form<LoginRequest>,
) -> ApiResult<Response> {
    if req.username.trim().is_empty() {
        let page = Page::new("Login", None).body(render_login_form(Some("Username is required")));
        return Ok((StatusCode::BAD_REQUEST, Html(page.render())).into_response());
    }

    let (token, router) = state.open_router(&headers).await;
    let outcome = run_blocking(router, move |router| router.login(&req.username)).await?;

    Ok((
        [(header::SET_COOKIE, session_cookie(&state.config.cookie_name, token))],
        Redirect::to(&outcome.redirect),
    )
        .into_response())
}

/// GET /logout
pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> ApiResult<Response> {
    let target = state.logout(&headers).await?;

    let page = Page::new("Logging out", None)
        .head(refresh_meta(&target, state.config.logout_delay))
        .body(format!(
            r#"<div class="logout-message"><p>Logging out...</p><p><a href="{}">Continue to login</a></p></div>"#,
            target
        ));

    Ok((
        [(header::SET_COOKIE, expired_session_cookie(&state.config.cookie_name))],
        Html(page.render()),
    )
        .into_response())
}

/// GET /dashboard
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let router = state.router_for(&headers).await;
    let target = run_blocking(router, |router| router.destination(PageKey::Dashboard)).await?;
    Ok(Redirect::to(&target).into_response())
}

/// GET /community
pub async fn community(State(state): State<Arc<AppState>>, headers: HeaderMap) -> ApiResult<Response> {
    section(&state, &headers, "/community").await
}

/// GET /workspaces
pub async fn workspaces(State(state): State<Arc<AppState>>, headers: HeaderMap) -> ApiResult<Response> {
    section(&state, &headers, "/workspaces").await
}

/// GET /profile
pub async fn profile(State(state): State<Arc<AppState>>, headers: HeaderMap) -> ApiResult<Response> {
    section(&state, &headers, "/profile").await
}

/// Un-scoped section links always resolve to a redirect: role-scoped when
/// logged in, the login page otherwise
async fn section(state: &AppState, headers: &HeaderMap, href: &str) -> ApiResult<Response> {
    let router = state.router_for(headers).await;
    let href = href.to_string();
    match run_blocking(router, move |router| router.navigate(&href)).await? {
        NavDecision::Redirect(target) => Ok(Redirect::to(&target).into_response()),
        NavDecision::Allow => Ok(not_found_response()),
    }
}

/// GET /:role/:page
pub async fn role_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((role, page)): Path<(String, String)>,
) -> ApiResult<Response> {
    let (Ok(role), Ok(page)) = (role.parse::<Role>(), page.parse::<PageKey>()) else {
        return Ok(not_found_response());
    };

    let router = state.router_for(&headers).await;
    let href = format!("/{}/{}", role, page);
    let (decision, session) = run_blocking(router, move |router| {
        Ok((router.navigate(&href)?, router.session()?))
    })
    .await?;

    if let NavDecision::Redirect(target) = decision {
        return Ok(Redirect::to(&target).into_response());
    }

    let body = format!(
        r#"<div class="page-layout">{sidebar}<section id="overview" class="content-section"><p>{role} {page} overview.</p></section><section id="activity" class="content-section"><p>Recent activity.</p></section></div>"#,
        sidebar = render_sidebar(role, page),
        role = role.display_name(),
        page = page.title(),
    );

    let title = format!("{} {}", role.display_name(), page.title());
    Ok(Html(Page::new(title, session.as_ref()).body(body).render()).into_response())
}

/// GET /workspaces/:workspace_id
pub async fn workspace_detail(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(workspace_id): Path<String>,
) -> ApiResult<Response> {
    let router = state.router_for(&headers).await;
    let href = format!("/workspaces/{}", workspace_id);
    let (decision, session) = run_blocking(router, move |router| {
        Ok((router.navigate(&href)?, router.session()?))
    })
    .await?;

    if let NavDecision::Redirect(target) = decision {
        return Ok(Redirect::to(&target).into_response());
    }

    let body = format!(
        r#"<p class="workspace-id">Workspace {}</p>"#,
        escape_html(&workspace_id)
    );
    Ok(Html(Page::new("Workspace", session.as_ref()).body(body).render()).into_response())
}

/// GET /invite/:workspace_id/:invite_code
pub async fn invite(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((workspace_id, invite_code)): Path<(String, String)>,
) -> ApiResult<Response> {
    let router = state.router_for(&headers).await;
    let session = run_blocking(router, |router| router.session()).await?;

    let next = if session.is_some() {
        format!(r#"<a href="/workspaces/{0}">Open workspace {0}</a>"#, escape_html(&workspace_id))
    } else {
        format!(r#"<a href="{}">Register</a> or <a href="{}">log in</a> to accept."#, REGISTER_PATH, LOGIN_PATH)
    };

    let body = format!(
        r#"<p>You have been invited to workspace <strong>{}</strong> (code <code>{}</code>).</p><p>{}</p>"#,
        escape_html(&workspace_id),
        escape_html(&invite_code),
        next
    );
    Ok(Html(Page::new("Workspace Invite", session.as_ref()).body(body).render()).into_response())
}

/// Fallback for unknown routes
pub async fn not_found() -> Response {
    not_found_response()
}

fn not_found_response() -> Response {
    let page = Page::new("Page Not Found", None)
        .body(r#"<p>The page you requested does not exist. <a href="/">Go home</a>.</p>"#);
    (StatusCode::NOT_FOUND, Html(page.render())).into_response()
}
