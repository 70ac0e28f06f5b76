//! Logical page keys and role-scoped path derivation.

use crate::router::error::RouterError;
use crate::session::Role;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Path of the login page
pub const LOGIN_PATH: &str = "/login";
/// Path of the registration page
pub const REGISTER_PATH: &str = "/register";
/// Path of the public home page
pub const HOME_PATH: &str = "/";

/// Abstract destination mapped to a concrete path per role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PageKey {
    Dashboard,
    Community,
    Workspaces,
    Profile,
}

impl PageKey {
    /// Get all page keys for iteration
    pub fn all() -> &'static [PageKey] {
        &[
            PageKey::Dashboard,
            PageKey::Community,
            PageKey::Workspaces,
            PageKey::Profile,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PageKey::Dashboard => "dashboard",
            PageKey::Community => "community",
            PageKey::Workspaces => "workspaces",
            PageKey::Profile => "profile",
        }
    }

    /// Page title shown in headers
    pub fn title(&self) -> &'static str {
        match self {
            PageKey::Dashboard => "Dashboard",
            PageKey::Community => "Community",
            PageKey::Workspaces => "Workspaces",
            PageKey::Profile => "Profile",
        }
    }

    /// Map an un-scoped section href (`/community`, `/workspaces`,
    /// `/profile`) to its page key. `/dashboard` is not a section link.
    pub fn from_section_href(href: &str) -> Option<PageKey> {
        match href {
            "/community" => Some(PageKey::Community),
            "/workspaces" => Some(PageKey::Workspaces),
            "/profile" => Some(PageKey::Profile),
            _ => None,
        }
    }
}

impl std::fmt::Display for PageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageKey {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dashboard" => Ok(PageKey::Dashboard),
            "community" => Ok(PageKey::Community),
            "workspaces" => Ok(PageKey::Workspaces),
            "profile" => Ok(PageKey::Profile),
            other => Err(RouterError::UnknownPage(other.to_string())),
        }
    }
}

/// `/{role}/{page}`
pub fn derive_path(role: Role, page: PageKey) -> String {
    format!("/{}/{}", role.as_str(), page.as_str())
}

/// `/{role}/dashboard`
pub fn dashboard_path(role: Role) -> String {
    derive_path(role, PageKey::Dashboard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_path_all_pairs() {
        for role in Role::all() {
            for page in PageKey::all() {
                assert_eq!(
                    derive_path(*role, *page),
                    format!("/{}/{}", role.as_str(), page.as_str())
                );
            }
        }
    }

    #[test]
    fn test_derive_path_examples() {
        assert_eq!(derive_path(Role::Editor, PageKey::Profile), "/editor/profile");
        assert_eq!(
            dashboard_path(Role::MusicDirector),
            "/music_director/dashboard"
        );
    }

    #[test]
    fn test_parse_page_key() {
        assert_eq!("workspaces".parse::<PageKey>().unwrap(), PageKey::Workspaces);

        let err = "settings".parse::<PageKey>().unwrap_err();
        assert!(matches!(err, RouterError::UnknownPage(ref p) if p == "settings"));
        assert!("Dashboard".parse::<PageKey>().is_err());
    }

    #[test]
    fn test_section_hrefs() {
        assert_eq!(PageKey::from_section_href("/profile"), Some(PageKey::Profile));
        assert_eq!(PageKey::from_section_href("/dashboard"), None);
        assert_eq!(PageKey::from_section_href("/community/"), None);
    }
}
