//! Core session types
//!
//! - `Role`: the closed set of community roles
//! - `Session`: a logged-in user (username + role)
//! - `StoredSession`: the flat key/value record persisted by durable stores

use crate::session::error::SessionError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Storage key for the login flag
pub const KEY_IS_LOGGED_IN: &str = "is_logged_in";
/// Storage key for the role string
pub const KEY_USER_ROLE: &str = "user_role";
/// Storage key for the username
pub const KEY_USERNAME: &str = "username";

/// Community role. Decides the dashboard/section paths and the theme.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Director,
    Editor,
    MusicDirector,
}

impl Role {
    /// Get all roles for iteration
    pub fn all() -> &'static [Role] {
        &[Role::Director, Role::Editor, Role::MusicDirector]
    }

    /// Path segment / storage form of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Director => "director",
            Role::Editor => "editor",
            Role::MusicDirector => "music_director",
        }
    }

    /// Human readable name, e.g. "Music Director"
    pub fn display_name(&self) -> String {
        if *self == Role::MusicDirector {
            return "Music Director".to_string();
        }

        let raw = self.as_str();
        let mut chars = raw.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// CSS class applied to `<body>` for role theming
    pub fn theme_class(&self) -> String {
        format!("{}-theme", self.as_str())
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "director" => Ok(Role::Director),
            "editor" => Ok(Role::Editor),
            "music_director" => Ok(Role::MusicDirector),
            other => Err(SessionError::UnknownRole(other.to_string())),
        }
    }
}

/// A logged-in session.
///
/// Holding a `Session` value means the login flag is set; the logged-out
/// state is represented by its absence (`Option::None`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub role: Role,
}

impl Session {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }

    /// First letter of the username, upper-cased, for avatar badges
    pub fn initial(&self) -> Option<char> {
        self.username.chars().next().and_then(|c| c.to_uppercase().next())
    }
}

/// Flat persisted record using the client storage keys.
///
/// Every field is optional because the record may have been written by an
/// older client one key at a time, or edited by hand.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredSession {
    #[serde(rename = "is_logged_in", default, skip_serializing_if = "Option::is_none")]
    pub is_logged_in: Option<String>,

    #[serde(rename = "user_role", default, skip_serializing_if = "Option::is_none")]
    pub user_role: Option<String>,

    #[serde(rename = "username", default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Result of interpreting a `StoredSession`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedSession {
    /// No keys present
    Empty,
    /// All three keys present and valid
    Valid(Session),
    /// Some keys present but the record is inconsistent
    Corrupt(String),
}

impl StoredSession {
    pub fn is_empty(&self) -> bool {
        self.is_logged_in.is_none() && self.user_role.is_none() && self.username.is_none()
    }

    /// Interpret the record. Anything short of a complete, consistent
    /// logged-in record with a known role is `Empty` or `Corrupt`.
    pub fn decode(&self) -> DecodedSession {
        if self.is_empty() {
            return DecodedSession::Empty;
        }

        if self.is_logged_in.as_deref() != Some("true") {
            return DecodedSession::Corrupt(format!(
                "{} is {:?} but other session keys are present",
                KEY_IS_LOGGED_IN, self.is_logged_in
            ));
        }

        let Some(username) = self.username.as_ref() else {
            return DecodedSession::Corrupt(format!("{} is missing", KEY_USERNAME));
        };

        let role = match self.user_role.as_deref().map(Role::from_str) {
            Some(Ok(role)) => role,
            Some(Err(e)) => return DecodedSession::Corrupt(e.to_string()),
            None => return DecodedSession::Corrupt(format!("{} is missing", KEY_USER_ROLE)),
        };

        DecodedSession::Valid(Session::new(username.clone(), role))
    }
}

impl From<&Session> for StoredSession {
    fn from(session: &Session) -> Self {
        Self {
            is_logged_in: Some("true".to_string()),
            user_role: Some(session.role.as_str().to_string()),
            username: Some(session.username.clone()),
        }
    }
}
