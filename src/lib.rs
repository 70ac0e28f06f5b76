//! # Community Platform
//!
//! Role-scoped navigation and session handling for a community site shared
//! by directors, editors and music directors.
//!
//! ## Features
//!
//! - **Session store**: one logged-in user per client, kept in memory or in a
//!   JSON document written atomically
//! - **Role derivation**: the role comes from the username alone
//! - **Navigation gating**: logged-out users land on `/login`, section links
//!   become `/{role}/{page}` once logged in
//! - **HTTP host**: server-rendered pages plus a small JSON API, built on Axum
//!
//! ## Modules
//!
//! - [`session`]: Session data and stores
//! - [`router`]: Role derivation, path construction and gating rules
//! - [`api`]: HTTP server
//! - [`config`]: Configuration loading
//!
//! ## Quick Start
//!
//! ```rust
//! use community_platform::router::{NavDecision, PageKey, RoleRouter};
//! use community_platform::session::{MemorySessionStore, Role};
//!
//! let router = RoleRouter::new(MemorySessionStore::new());
//!
//! let outcome = router.login("musicbob").unwrap();
//! assert_eq!(outcome.session.role, Role::MusicDirector);
//! assert_eq!(outcome.redirect, "/music_director/dashboard");
//!
//! assert_eq!(
//!     router.destination(PageKey::Workspaces).unwrap(),
//!     "/music_director/workspaces"
//! );
//!
//! router.logout().unwrap();
//! assert_eq!(router.navigate("/community").unwrap(), NavDecision::redirect("/login"));
//! ```

pub mod api;
pub mod config;
pub mod router;
pub mod session;

// Re-export top-level types for convenience
pub use session::{
    FileSessionStore, MemorySessionStore, Role, Session, SessionError, SessionResult,
    SessionStore,
};

pub use router::{
    derive_path, derive_role, gate_navigation, LoginOutcome, NavDecision, PageKey, RoleRouter,
    RouterError, RouterResult, UiEvent,
};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use config::{Config, ConfigError, LoggingConfig, SessionBackendKind};
