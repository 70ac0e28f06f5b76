//! Per-client session registry
//!
//! Each browser is identified by an opaque UUID token carried in a cookie.
//! The registry maps tokens to their own `SessionStore`, so the Role Router
//! sees exactly one session per client, the way each browser tab origin sees
//! its own local storage.

use axum::http::{header, HeaderMap};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::{SessionBackendKind, SessionConfig};
use crate::session::{FileSessionStore, MemorySessionStore, SessionStore};

/// Backing medium for client sessions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionBackend {
    /// Sessions live in process memory
    Memory,
    /// One JSON document per token in `dir`
    File { dir: PathBuf },
}

impl SessionBackend {
    pub fn from_config(config: &SessionConfig) -> Self {
        match config.backend {
            SessionBackendKind::Memory => SessionBackend::Memory,
            SessionBackendKind::File => SessionBackend::File {
                dir: config.sessions_dir(),
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionBackend::Memory => "memory",
            SessionBackend::File { .. } => "file",
        }
    }
}

/// Token → session store map
pub struct SessionRegistry {
    backend: SessionBackend,
    stores: RwLock<HashMap<Uuid, Arc<dyn SessionStore>>>,
}

impl SessionRegistry {
    pub fn new(backend: SessionBackend) -> Self {
        Self {
            backend,
            stores: RwLock::new(HashMap::new()),
        }
    }

    pub fn memory() -> Self {
        Self::new(SessionBackend::Memory)
    }

    pub fn backend(&self) -> &SessionBackend {
        &self.backend
    }

    /// Get or create the store for `token`
    pub async fn open(&self, token: Uuid) -> Arc<dyn SessionStore> {
        if let Some(store) = self.stores.read().await.get(&token) {
            return Arc::clone(store);
        }

        let mut stores = self.stores.write().await;
        let store = stores
            .entry(token)
            .or_insert_with(|| self.create_store(token));
        Arc::clone(store)
    }

    /// Store for a request's token without registering new clients.
    ///
    /// Unknown clients get a fresh empty store that is not kept, i.e. the
    /// logged-out state.
    pub async fn lookup(&self, token: Option<Uuid>) -> Arc<dyn SessionStore> {
        match token {
            Some(token) if self.is_known(token).await => self.open(token).await,
            _ => Arc::new(MemorySessionStore::new()),
        }
    }

    /// Whether `token` belongs to a client this server has issued a session
    /// to. For the file backend that includes documents left by an earlier
    /// process.
    pub async fn is_known(&self, token: Uuid) -> bool {
        if self.stores.read().await.contains_key(&token) {
            return true;
        }

        match &self.backend {
            SessionBackend::Memory => false,
            SessionBackend::File { dir } => tokio::fs::try_exists(document_path(dir, token))
                .await
                .unwrap_or(false),
        }
    }

    /// Forget the store for `token`. The caller clears its record first.
    pub async fn remove(&self, token: Uuid) {
        if self.stores.write().await.remove(&token).is_some() {
            tracing::debug!(token = %token, "Session store released");
        }
    }

    /// Number of client stores currently held
    pub async fn len(&self) -> usize {
        self.stores.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Check the backing medium is usable
    pub fn check_backend(&self) -> std::io::Result<()> {
        match &self.backend {
            SessionBackend::Memory => Ok(()),
            SessionBackend::File { dir } => std::fs::create_dir_all(dir),
        }
    }

    fn create_store(&self, token: Uuid) -> Arc<dyn SessionStore> {
        match &self.backend {
            SessionBackend::Memory => Arc::new(MemorySessionStore::new()),
            SessionBackend::File { dir } => {
                Arc::new(FileSessionStore::new(document_path(dir, token)))
            }
        }
    }
}

fn document_path(dir: &Path, token: Uuid) -> PathBuf {
    dir.join(format!("{}.json", token))
}

/// Extract the session token from the `Cookie` headers.
///
/// Values that are not UUIDs are ignored.
pub fn token_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// `Set-Cookie` value binding a client to `token`
pub fn session_cookie(cookie_name: &str, token: Uuid) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", cookie_name, token)
}

/// `Set-Cookie` value that makes the client drop its token
pub fn expired_session_cookie(cookie_name: &str) -> String {
    format!(
        "{}=deleted; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Path=/; HttpOnly; SameSite=Lax",
        cookie_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Role, Session};
    use axum::http::HeaderValue;
    use tempfile::tempdir;

    #[test]
    fn test_token_from_headers() {
        let token = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; cp_session={}", token)).unwrap(),
        );

        assert_eq!(token_from_headers(&headers, "cp_session"), Some(token));
        assert_eq!(token_from_headers(&headers, "other"), None);
    }

    #[test]
    fn test_invalid_token_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("cp_session=../../etc/passwd"),
        );
        assert_eq!(token_from_headers(&headers, "cp_session"), None);
    }

    #[test]
    fn test_session_cookie() {
        let token = Uuid::nil();
        assert_eq!(
            session_cookie("cp_session", token),
            "cp_session=00000000-0000-0000-0000-000000000000; Path=/; HttpOnly; SameSite=Lax"
        );
    }

    #[tokio::test]
    async fn test_open_returns_same_store() {
        let registry = SessionRegistry::memory();
        let token = Uuid::new_v4();

        registry
            .open(token)
            .await
            .set_session(&Session::new("alice", Role::Director))
            .unwrap();

        let session = registry.open(token).await.get_session().unwrap();
        assert_eq!(session.unwrap().username, "alice");
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_lookup_unknown_client_is_logged_out() {
        let registry = SessionRegistry::memory();

        let store = registry.lookup(Some(Uuid::new_v4())).await;
        assert_eq!(store.get_session().unwrap(), None);
        assert!(registry.is_empty().await);

        let store = registry.lookup(None).await;
        assert_eq!(store.get_session().unwrap(), None);
    }

    #[tokio::test]
    async fn test_clients_are_isolated() {
        let registry = SessionRegistry::memory();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        registry
            .open(a)
            .await
            .set_session(&Session::new("EditorJane", Role::Editor))
            .unwrap();

        assert!(registry.lookup(Some(a)).await.get_session().unwrap().is_some());
        assert!(registry.lookup(Some(b)).await.get_session().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_backend_survives_new_registry() {
        let dir = tempdir().unwrap();
        let backend = SessionBackend::File {
            dir: dir.path().join("sessions"),
        };
        let token = Uuid::new_v4();

        SessionRegistry::new(backend.clone())
            .open(token)
            .await
            .set_session(&Session::new("musicbob", Role::MusicDirector))
            .unwrap();

        let restarted = SessionRegistry::new(backend);
        let session = restarted.lookup(Some(token)).await.get_session().unwrap();
        assert_eq!(session.unwrap().role, Role::MusicDirector);
    }

    #[tokio::test]
    async fn test_remove_releases_store() {
        let registry = SessionRegistry::memory();

        for _ in 0..100 {
            let token = Uuid::new_v4();
            let store = registry.open(token).await;
            store
                .set_session(&Session::new("alice", Role::Director))
                .unwrap();
            store.clear_session().unwrap();
            registry.remove(token).await;
        }

        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_anonymous_lookups_are_not_kept() {
        let dir = tempdir().unwrap();
        let backends = [
            SessionBackend::Memory,
            SessionBackend::File {
                dir: dir.path().join("sessions"),
            },
        ];

        for backend in backends {
            let registry = SessionRegistry::new(backend);
            for _ in 0..100 {
                let store = registry.lookup(Some(Uuid::new_v4())).await;
                assert_eq!(store.get_session().unwrap(), None);
            }
            assert_eq!(registry.len().await, 0);
        }
    }

    #[tokio::test]
    async fn test_is_known() {
        let dir = tempdir().unwrap();
        let backend = SessionBackend::File {
            dir: dir.path().join("sessions"),
        };
        let token = Uuid::new_v4();

        let registry = SessionRegistry::new(backend.clone());
        assert!(!registry.is_known(token).await);

        registry
            .open(token)
            .await
            .set_session(&Session::new("EditorJane", Role::Editor))
            .unwrap();
        assert!(registry.is_known(token).await);

        // A fresh process finds the document on disk
        assert!(SessionRegistry::new(backend).is_known(token).await);
    }

    #[test]
    fn test_expired_session_cookie() {
        let cookie = expired_session_cookie("cp_session");
        assert!(cookie.starts_with("cp_session=deleted;"));
        assert!(cookie.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
        assert!(cookie.contains("Path=/"));
    }
}
