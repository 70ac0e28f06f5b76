//! Role Router
//!
//! Binds the routing rules to an injected `SessionStore`. Every UI event
//! (page load, login submit, link click, logout, "open page" shortcut) is
//! handled synchronously and produces exactly one `NavDecision`.

use crate::router::error::RouterResult;
use crate::router::gate::{gate_navigation, login_page_redirect, rewrite_sidebar_href, NavDecision};
use crate::router::path::{dashboard_path, derive_path, PageKey, LOGIN_PATH};
use crate::router::role::derive_role;
use crate::session::{Session, SessionStore};

/// A user-interface event delivered to the router
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// A page finished loading at `path`
    PageLoad { path: String },
    /// The login form was submitted
    LoginSubmit { username: String },
    /// A navigation link to `href` was clicked
    LinkClick { href: String },
    /// The logout control was activated
    Logout,
    /// A "go to my page" shortcut for a logical page
    OpenPage { page: PageKey },
}

/// Outcome of a login submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub session: Session,
    pub redirect: String,
}

/// Role-derived navigation over a session store
#[derive(Debug)]
pub struct RoleRouter<S> {
    store: S,
}

impl<S: SessionStore> RoleRouter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current session, `None` when logged out
    pub fn session(&self) -> RouterResult<Option<Session>> {
        Ok(self.store.get_session()?)
    }

    /// Log in as `username`: derive the role, persist the session, and
    /// return the dashboard redirect. The session is stored before the
    /// redirect is handed back.
    pub fn login(&self, username: &str) -> RouterResult<LoginOutcome> {
        let role = derive_role(username);
        let session = Session::new(username, role);

        self.store.set_session(&session)?;
        tracing::info!(username = %username, role = %role, "Session started");

        Ok(LoginOutcome {
            redirect: dashboard_path(role),
            session,
        })
    }

    /// Clear the session and return the login path
    pub fn logout(&self) -> RouterResult<String> {
        self.store.clear_session()?;
        tracing::info!("Session cleared");
        Ok(LOGIN_PATH.to_string())
    }

    /// Gate a link click on `href`
    pub fn navigate(&self, href: &str) -> RouterResult<NavDecision> {
        let session = self.session()?;
        let decision = gate_navigation(href, session.as_ref());

        if let NavDecision::Redirect(target) = &decision {
            tracing::debug!(href = %href, target = %target, "Navigation redirected");
        }

        Ok(decision)
    }

    /// Redirect to apply right after a page at `path` loads, if any
    pub fn page_load(&self, path: &str) -> RouterResult<Option<String>> {
        let session = self.session()?;
        Ok(login_page_redirect(path, session.as_ref()))
    }

    /// Concrete path for a logical page: role-scoped when logged in,
    /// the login page otherwise
    pub fn destination(&self, page: PageKey) -> RouterResult<String> {
        Ok(match self.session()? {
            Some(session) => derive_path(session.role, page),
            None => LOGIN_PATH.to_string(),
        })
    }

    /// Like [`destination`](Self::destination) for an unparsed page key
    pub fn destination_for(&self, page: &str) -> RouterResult<String> {
        let page: PageKey = page.parse()?;
        self.destination(page)
    }

    /// Rewrite a sidebar href for the current role; unchanged when logged out
    pub fn sidebar_href(&self, href: &str) -> RouterResult<String> {
        Ok(match self.session()? {
            Some(session) => rewrite_sidebar_href(session.role, href),
            None => href.to_string(),
        })
    }

    /// Handle one UI event
    pub fn dispatch(&self, event: UiEvent) -> RouterResult<NavDecision> {
        match event {
            UiEvent::PageLoad { path } => Ok(match self.page_load(&path)? {
                Some(target) => NavDecision::Redirect(target),
                None => NavDecision::Allow,
            }),
            UiEvent::LoginSubmit { username } => {
                Ok(NavDecision::Redirect(self.login(&username)?.redirect))
            }
            UiEvent::LinkClick { href } => self.navigate(&href),
            UiEvent::Logout => Ok(NavDecision::Redirect(self.logout()?)),
            UiEvent::OpenPage { page } => Ok(NavDecision::Redirect(self.destination(page)?)),
        }
    }
}
