//! Role Router
//!
//! Turns a username into a role, and a role plus a requested destination
//! into a concrete path:
//!
//! - **role**: username → role derivation
//! - **path**: logical page keys and `/{role}/{page}` paths
//! - **gate**: link-click gating, login-page redirect, sidebar rewriting
//! - **engine**: `RoleRouter`, the rules bound to a `SessionStore`
//! - **error**: error types
//!
//! # Example
//!
//! ```rust
//! use community_platform::router::{NavDecision, RoleRouter};
//! use community_platform::session::MemorySessionStore;
//!
//! let router = RoleRouter::new(MemorySessionStore::new());
//! assert_eq!(router.navigate("/profile").unwrap(), NavDecision::redirect("/login"));
//!
//! let outcome = router.login("EditorJane").unwrap();
//! assert_eq!(outcome.redirect, "/editor/dashboard");
//! assert_eq!(router.navigate("/profile").unwrap(), NavDecision::redirect("/editor/profile"));
//! ```

pub mod engine;
pub mod error;
pub mod gate;
pub mod path;
pub mod role;

pub use engine::{LoginOutcome, RoleRouter, UiEvent};
pub use error::{RouterError, RouterResult};
pub use gate::{gate_navigation, login_page_redirect, rewrite_sidebar_href, NavDecision};
pub use path::{dashboard_path, derive_path, PageKey, HOME_PATH, LOGIN_PATH, REGISTER_PATH};
pub use role::derive_role;
