//! File-backed session store
//!
//! Persists the session as one JSON document keyed with the client storage
//! keys (`is_logged_in`, `user_role`, `username`). The document survives
//! process restarts, the way browser local storage survives page reloads.
//!
//! Writes go to `<file>.next` and are renamed over the live file, so a reader
//! never sees a half-written record.

use crate::session::error::{SessionError, SessionResult};
use crate::session::store::SessionStore;
use crate::session::types::{DecodedSession, Session, StoredSession};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Session store persisted to a single JSON file
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    /// Serializes read-repair and write cycles within this process
    guard: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    /// Path of the live session document
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn next_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".next");
        PathBuf::from(name)
    }

    /// Read the raw record, `None` if the file does not exist
    fn read_record(&self) -> SessionResult<Option<StoredSession>> {
        let content = match std::fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Some(StoredSession::default()));
        }

        // Bytes that are not UTF-8 surface as a serialization error
        let record: StoredSession = serde_json::from_slice(&content)?;
        Ok(Some(record))
    }

    fn write_record(&self, record: &StoredSession) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(record)?;
        let next_path = self.next_path();
        {
            let mut file = File::create(&next_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }

        std::fs::rename(&next_path, &self.path)?;
        Ok(())
    }

    fn remove_record(&self) -> SessionResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn lock(&self) -> SessionResult<std::sync::MutexGuard<'_, ()>> {
        self.guard
            .lock()
            .map_err(|e| SessionError::Lock(e.to_string()))
    }
}

impl SessionStore for FileSessionStore {
    fn get_session(&self) -> SessionResult<Option<Session>> {
        let _guard = self.lock()?;

        let record = match self.read_record() {
            Ok(Some(record)) => record,
            Ok(None) => return Ok(None),
            Err(SessionError::Serialization(e)) => {
                tracing::warn!(path = ?self.path, error = %e, "Unreadable session record, clearing");
                self.remove_record()?;
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        match record.decode() {
            DecodedSession::Valid(session) => Ok(Some(session)),
            DecodedSession::Empty => Ok(None),
            DecodedSession::Corrupt(reason) => {
                tracing::warn!(path = ?self.path, reason = %reason, "Inconsistent session record, clearing");
                self.remove_record()?;
                Ok(None)
            }
        }
    }

    fn set_session(&self, session: &Session) -> SessionResult<()> {
        let _guard = self.lock()?;
        self.write_record(&StoredSession::from(session))
    }

    fn clear_session(&self) -> SessionResult<()> {
        let _guard = self.lock()?;
        self.remove_record()
    }
}
