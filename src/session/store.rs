//! Session store abstraction and the in-memory implementation.

use crate::session::error::{SessionError, SessionResult};
use crate::session::types::Session;
use std::sync::{Arc, RwLock};

/// Durable, tab-shared storage of the current session.
///
/// Implementations must make `set_session` and `clear_session` atomic with
/// respect to `get_session`: a reader sees either the previous record or the
/// new one, never a mix of fields.
pub trait SessionStore: Send + Sync {
    /// Read the current session, `None` when logged out
    fn get_session(&self) -> SessionResult<Option<Session>>;

    /// Replace the current session
    fn set_session(&self, session: &Session) -> SessionResult<()>;

    /// Remove the current session. Clearing an empty store is a no-op.
    fn clear_session(&self) -> SessionResult<()>;
}

impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    fn get_session(&self) -> SessionResult<Option<Session>> {
        (**self).get_session()
    }

    fn set_session(&self, session: &Session) -> SessionResult<()> {
        (**self).set_session(session)
    }

    fn clear_session(&self) -> SessionResult<()> {
        (**self).clear_session()
    }
}

/// Session store backed by a single in-memory record
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    current: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a session
    pub fn with_session(session: Session) -> Self {
        Self {
            current: RwLock::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get_session(&self) -> SessionResult<Option<Session>> {
        let current = self
            .current
            .read()
            .map_err(|e| SessionError::Lock(e.to_string()))?;
        Ok(current.clone())
    }

    fn set_session(&self, session: &Session) -> SessionResult<()> {
        let mut current = self
            .current
            .write()
            .map_err(|e| SessionError::Lock(e.to_string()))?;
        *current = Some(session.clone());
        Ok(())
    }

    fn clear_session(&self) -> SessionResult<()> {
        let mut current = self
            .current
            .write()
            .map_err(|e| SessionError::Lock(e.to_string()))?;
        *current = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::types::Role;

    #[test]
    fn test_empty_store() {
        let store = MemorySessionStore::new();
        assert_eq!(store.get_session().unwrap(), None);
    }

    #[test]
    fn test_set_then_get() {
        let store = MemorySessionStore::new();
        let session = Session::new("EditorJane", Role::Editor);

        store.set_session(&session).unwrap();

        assert_eq!(store.get_session().unwrap(), Some(session));
    }

    #[test]
    fn test_set_replaces_whole_record() {
        let store = MemorySessionStore::with_session(Session::new("alice", Role::Director));
        store
            .set_session(&Session::new("musicbob", Role::MusicDirector))
            .unwrap();

        let session = store.get_session().unwrap().unwrap();
        assert_eq!(session.username, "musicbob");
        assert_eq!(session.role, Role::MusicDirector);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = MemorySessionStore::with_session(Session::new("alice", Role::Director));

        store.clear_session().unwrap();
        assert_eq!(store.get_session().unwrap(), None);

        store.clear_session().unwrap();
        assert_eq!(store.get_session().unwrap(), None);
    }

    #[test]
    fn test_shared_through_arc() {
        let store = Arc::new(MemorySessionStore::new());
        let other = Arc::clone(&store);

        store
            .set_session(&Session::new("alice", Role::Director))
            .unwrap();

        assert!(other.get_session().unwrap().is_some());
    }

    #[test]
    fn test_trait_object() {
        let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        store
            .set_session(&Session::new("alice", Role::Director))
            .unwrap();
        assert!(store.get_session().unwrap().is_some());
    }
}
