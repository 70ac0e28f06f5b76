//! Session Store
//!
//! Holds the logged-in/username/role triple for one client:
//!
//! - **types**: `Role`, `Session` and the persisted `StoredSession` record
//! - **store**: the `SessionStore` trait and the in-memory store
//! - **file**: durable JSON-file store
//! - **error**: error types
//!
//! # Example
//!
//! ```rust
//! use community_platform::session::{MemorySessionStore, Role, Session, SessionStore};
//!
//! let store = MemorySessionStore::new();
//! store.set_session(&Session::new("EditorJane", Role::Editor)).unwrap();
//! assert_eq!(store.get_session().unwrap().unwrap().role, Role::Editor);
//!
//! store.clear_session().unwrap();
//! assert!(store.get_session().unwrap().is_none());
//! ```

pub mod error;
pub mod file;
pub mod store;
pub mod types;

pub use error::{SessionError, SessionResult};
pub use file::FileSessionStore;
pub use store::{MemorySessionStore, SessionStore};
pub use types::{
    DecodedSession, Role, Session, StoredSession, KEY_IS_LOGGED_IN, KEY_USERNAME, KEY_USER_ROLE,
};
