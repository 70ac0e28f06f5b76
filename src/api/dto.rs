//! Data Transfer Objects
//!
//! Request and response types for the JSON endpoints and the login form.

use serde::{Deserialize, Serialize};

use crate::router::NavDecision;
use crate::session::Session;

// ============================================
// SESSION DTOs
// ============================================

/// Login request (JSON body or form fields).
///
/// A `password` field may be sent by the login form; it is ignored.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
}

/// Current session state
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionResponse {
    pub logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Display form of the role, e.g. "Music Director"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_display: Option<String>,
}

impl SessionResponse {
    pub fn logged_out() -> Self {
        Self {
            logged_in: false,
            username: None,
            role: None,
            role_display: None,
        }
    }
}

impl From<Option<&Session>> for SessionResponse {
    fn from(session: Option<&Session>) -> Self {
        match session {
            Some(session) => Self {
                logged_in: true,
                username: Some(session.username.clone()),
                role: Some(session.role.as_str().to_string()),
                role_display: Some(session.role.display_name()),
            },
            None => Self::logged_out(),
        }
    }
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub session: SessionResponse,
    /// Where the client should go next
    pub redirect: String,
}

/// Logout response
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub redirect: String,
}

// ============================================
// NAVIGATION DTOs
// ============================================

/// Navigation check request
#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    /// Original href of the clicked link
    pub href: String,
}

/// Navigation decision
#[derive(Debug, Serialize)]
pub struct NavigateResponse {
    pub href: String,
    /// "allow" or "redirect"
    pub action: String,
    /// Final destination
    pub target: String,
}

impl NavigateResponse {
    pub fn new(href: String, decision: &NavDecision) -> Self {
        let action = match decision {
            NavDecision::Allow => "allow",
            NavDecision::Redirect(_) => "redirect",
        };

        Self {
            target: decision.target(&href).to_string(),
            action: action.to_string(),
            href,
        }
    }
}

/// Role-scoped path for a logical page
#[derive(Debug, Serialize)]
pub struct PagePathResponse {
    pub page: String,
    pub path: String,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy, unhealthy
    pub status: String,
    /// Session backend status
    pub sessions: String,
    /// Session backend kind: memory or file
    pub backend: String,
    /// Number of client sessions held by the registry
    pub active_sessions: usize,
    /// Server start time (RFC 3339)
    pub started_at: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Role;

    #[test]
    fn test_session_response_logged_in() {
        let session = Session::new("musicbob", Role::MusicDirector);
        let response = SessionResponse::from(Some(&session));

        assert!(response.logged_in);
        assert_eq!(response.role.as_deref(), Some("music_director"));
        assert_eq!(response.role_display.as_deref(), Some("Music Director"));
    }

    #[test]
    fn test_session_response_logged_out_omits_fields() {
        let json = serde_json::to_value(SessionResponse::from(None)).unwrap();
        assert_eq!(json, serde_json::json!({ "logged_in": false }));
    }

    #[test]
    fn test_navigate_response() {
        let allow = NavigateResponse::new("/".to_string(), &NavDecision::Allow);
        assert_eq!(allow.action, "allow");
        assert_eq!(allow.target, "/");

        let redirect =
            NavigateResponse::new("/profile".to_string(), &NavDecision::redirect("/login"));
        assert_eq!(redirect.action, "redirect");
        assert_eq!(redirect.target, "/login");
        assert_eq!(redirect.href, "/profile");
    }
}
