//! Navigation gating rules.
//!
//! Pure functions over an href and the current session; the caller acts on
//! the returned `NavDecision`.

use crate::router::path::{dashboard_path, derive_path, PageKey, HOME_PATH, LOGIN_PATH, REGISTER_PATH};
use crate::session::{Role, Session};
use serde::Serialize;

/// What the host should do with a navigation attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "target", rename_all = "lowercase")]
pub enum NavDecision {
    /// Continue to the original target
    Allow,
    /// Cancel the default navigation and go here instead
    Redirect(String),
}

impl NavDecision {
    pub fn redirect(path: impl Into<String>) -> Self {
        NavDecision::Redirect(path.into())
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, NavDecision::Redirect(_))
    }

    /// Where the user ends up when `original` was requested
    pub fn target<'a>(&'a self, original: &'a str) -> &'a str {
        match self {
            NavDecision::Allow => original,
            NavDecision::Redirect(path) => path,
        }
    }
}

/// Decide a link click on `href` given the current session.
///
/// - `/login` and `/register` are always allowed
/// - logged out: anything but `/` goes to `/login`
/// - logged in: `/community`, `/workspaces`, `/profile` become role-scoped
/// - everything else is allowed unmodified
pub fn gate_navigation(href: &str, session: Option<&Session>) -> NavDecision {
    if href == LOGIN_PATH || href == REGISTER_PATH {
        return NavDecision::Allow;
    }

    match session {
        None if href != HOME_PATH => NavDecision::redirect(LOGIN_PATH),
        None => NavDecision::Allow,
        Some(session) => match PageKey::from_section_href(href) {
            Some(page) => NavDecision::Redirect(derive_path(session.role, page)),
            None => NavDecision::Allow,
        },
    }
}

/// A logged-in user loading `/login` is sent to their dashboard.
pub fn login_page_redirect(path: &str, session: Option<&Session>) -> Option<String> {
    match session {
        Some(session) if path == LOGIN_PATH => Some(dashboard_path(session.role)),
        _ => None,
    }
}

/// Rewrite a sidebar link so it stays inside the role's section.
///
/// In-page anchors (`#...`) and empty hrefs are left alone.
pub fn rewrite_sidebar_href(role: Role, href: &str) -> String {
    if href.is_empty() || href.starts_with('#') {
        href.to_string()
    } else {
        format!("/{}{}", role.as_str(), href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor() -> Session {
        Session::new("EditorJane", Role::Editor)
    }

    #[test]
    fn test_login_and_register_always_allowed() {
        for href in ["/login", "/register"] {
            assert_eq!(gate_navigation(href, None), NavDecision::Allow);
            assert_eq!(gate_navigation(href, Some(&editor())), NavDecision::Allow);
        }
    }

    #[test]
    fn test_logged_out_redirects_to_login() {
        assert_eq!(
            gate_navigation("/workspaces", None),
            NavDecision::redirect("/login")
        );
        assert_eq!(
            gate_navigation("/editor/dashboard", None),
            NavDecision::redirect("/login")
        );
    }

    #[test]
    fn test_logged_out_home_allowed() {
        assert_eq!(gate_navigation("/", None), NavDecision::Allow);
    }

    #[test]
    fn test_logged_in_sections_are_role_scoped() {
        let session = editor();
        assert_eq!(
            gate_navigation("/profile", Some(&session)),
            NavDecision::redirect("/editor/profile")
        );
        assert_eq!(
            gate_navigation("/community", Some(&session)),
            NavDecision::redirect("/editor/community")
        );

        let music = Session::new("musicbob", Role::MusicDirector);
        assert_eq!(
            gate_navigation("/workspaces", Some(&music)),
            NavDecision::redirect("/music_director/workspaces")
        );
    }

    #[test]
    fn test_logged_in_other_links_allowed() {
        let session = editor();
        for href in ["/", "/dashboard", "/director/profile", "/workspaces/42", "#ai"] {
            assert_eq!(gate_navigation(href, Some(&session)), NavDecision::Allow, "{}", href);
        }
    }

    #[test]
    fn test_target() {
        assert_eq!(NavDecision::Allow.target("/x"), "/x");
        assert_eq!(NavDecision::redirect("/login").target("/x"), "/login");
    }

    #[test]
    fn test_decision_serialization() {
        let json = serde_json::to_value(NavDecision::redirect("/login")).unwrap();
        assert_eq!(json["action"], "redirect");
        assert_eq!(json["target"], "/login");

        let json = serde_json::to_value(NavDecision::Allow).unwrap();
        assert_eq!(json["action"], "allow");
    }

    #[test]
    fn test_login_page_redirect() {
        let session = editor();
        assert_eq!(
            login_page_redirect("/login", Some(&session)),
            Some("/editor/dashboard".to_string())
        );
        assert_eq!(login_page_redirect("/login", None), None);
        assert_eq!(login_page_redirect("/profile", Some(&session)), None);
    }

    #[test]
    fn test_rewrite_sidebar_href() {
        assert_eq!(rewrite_sidebar_href(Role::Editor, "#projects"), "#projects");
        assert_eq!(rewrite_sidebar_href(Role::Editor, ""), "");
        assert_eq!(
            rewrite_sidebar_href(Role::MusicDirector, "/workspaces"),
            "/music_director/workspaces"
        );
    }
}
