//! Persisted session state for the findash SDK
//!
//! Two pieces of client-side state survive restarts: the access token and
//! the cached user profile. They are written together on login, the token
//! alone is replaced on refresh, and both are cleared together on logout or
//! unrecoverable refresh failure.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::warn;

use findash_protocol::common::User;

/// Session state as persisted on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub access_token: String,
    pub user: Option<User>,
}

/// Storage collaborator for the access token and cached profile
///
/// The request client only touches the token; the session controller owns
/// the user field. Implementations never fail the caller: a client-side
/// cache that cannot be written is degraded, not fatal.
pub trait SessionStore: Send + Sync {
    fn access_token(&self) -> Option<String>;
    fn user(&self) -> Option<User>;
    /// Store token and user together (login path)
    fn set_session(&self, access_token: String, user: User);
    /// Replace the token, keeping any cached user (refresh path)
    fn set_access_token(&self, access_token: String);
    /// Replace the cached user, keeping the token (re-hydration path)
    fn set_user(&self, user: User);
    /// Remove token and user together
    fn clear(&self);
}

/// JSON file-backed store used by the CLI
pub struct FileSessionStore {
    path: PathBuf,
    cached: Mutex<Option<StoredSession>>,
}

impl FileSessionStore {
    /// Open a store at `path`, reading any existing session
    ///
    /// A missing or unreadable file is treated as an empty session.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cached = Mutex::new(Self::load(&path));
        Self { path, cached }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Option<StoredSession> {
        if !path.exists() {
            return None;
        }
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                warn!("failed to read session storage: {}", err);
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(session) => Some(session),
            Err(err) => {
                warn!("ignoring corrupt session storage: {}", err);
                None
            }
        }
    }

    fn save(&self, session: &Option<StoredSession>) {
        match session {
            Some(session) => {
                if let Some(parent) = self.path.parent() {
                    if let Err(err) = fs::create_dir_all(parent) {
                        warn!("failed to create session storage directory: {}", err);
                        return;
                    }
                }
                match serde_json::to_string_pretty(session) {
                    Ok(content) => {
                        if let Err(err) = fs::write(&self.path, content) {
                            warn!("failed to write session storage: {}", err);
                        }
                    }
                    Err(err) => warn!("failed to serialize session: {}", err),
                }
            }
            None => {
                if let Err(err) = fs::remove_file(&self.path) {
                    if err.kind() != std::io::ErrorKind::NotFound {
                        warn!("failed to remove session storage: {}", err);
                    }
                }
            }
        }
    }
}

impl SessionStore for FileSessionStore {
    fn access_token(&self) -> Option<String> {
        self.cached
            .lock()
            .unwrap()
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    fn user(&self) -> Option<User> {
        self.cached.lock().unwrap().as_ref().and_then(|s| s.user.clone())
    }

    fn set_session(&self, access_token: String, user: User) {
        let mut cached = self.cached.lock().unwrap();
        *cached = Some(StoredSession {
            access_token,
            user: Some(user),
        });
        self.save(&cached);
    }

    fn set_access_token(&self, access_token: String) {
        let mut cached = self.cached.lock().unwrap();
        let user = cached.as_ref().and_then(|s| s.user.clone());
        *cached = Some(StoredSession { access_token, user });
        self.save(&cached);
    }

    fn set_user(&self, user: User) {
        let mut cached = self.cached.lock().unwrap();
        if let Some(session) = cached.as_mut() {
            session.user = Some(user);
            self.save(&cached);
        }
    }

    fn clear(&self) {
        let mut cached = self.cached.lock().unwrap();
        *cached = None;
        self.save(&cached);
    }
}

/// In-process store for tests and embedders that opt out of persistence
#[derive(Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<StoredSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn access_token(&self) -> Option<String> {
        self.session
            .lock()
            .unwrap()
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    fn user(&self) -> Option<User> {
        self.session.lock().unwrap().as_ref().and_then(|s| s.user.clone())
    }

    fn set_session(&self, access_token: String, user: User) {
        *self.session.lock().unwrap() = Some(StoredSession {
            access_token,
            user: Some(user),
        });
    }

    fn set_access_token(&self, access_token: String) {
        let mut session = self.session.lock().unwrap();
        let user = session.as_ref().and_then(|s| s.user.clone());
        *session = Some(StoredSession { access_token, user });
    }

    fn set_user(&self, user: User) {
        if let Some(session) = self.session.lock().unwrap().as_mut() {
            session.user = Some(user);
        }
    }

    fn clear(&self) {
        *self.session.lock().unwrap() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::utils::test_helpers::{create_temp_dir, sample_user};

    #[test]
    fn test_file_store_round_trip() {
        let dir = create_temp_dir();
        let path = dir.path().join("session.json");

        let store = FileSessionStore::new(&path);
        assert_eq!(store.access_token(), None);

        store.set_session("tok-1".to_string(), sample_user("u-1"));
        assert_eq!(store.access_token().as_deref(), Some("tok-1"));
        assert_eq!(store.user().unwrap().id, "u-1");

        // A fresh store instance reads the same session back
        let reopened = FileSessionStore::new(&path);
        assert_eq!(reopened.access_token().as_deref(), Some("tok-1"));
        assert_eq!(reopened.user().unwrap().id, "u-1");
    }

    #[test]
    fn test_file_store_reads_corrupt_file_as_empty() {
        let dir = create_temp_dir();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let store = FileSessionStore::new(&path);
        assert_eq!(store.access_token(), None);
        assert_eq!(store.user(), None);
    }

    #[test]
    fn test_file_store_clear_removes_file() {
        let dir = create_temp_dir();
        let path = dir.path().join("session.json");

        let store = FileSessionStore::new(&path);
        store.set_session("tok".to_string(), sample_user("u"));
        assert!(path.exists());

        store.clear();
        assert!(!path.exists());
        assert_eq!(store.access_token(), None);
        assert_eq!(store.user(), None);
    }

    #[test]
    fn test_set_access_token_keeps_user() {
        let store = MemorySessionStore::new();
        store.set_session("old".to_string(), sample_user("u-2"));

        store.set_access_token("new".to_string());
        assert_eq!(store.access_token().as_deref(), Some("new"));
        assert_eq!(store.user().unwrap().id, "u-2");
    }

    #[test]
    fn test_set_access_token_without_prior_session() {
        let store = MemorySessionStore::new();
        store.set_access_token("fresh".to_string());
        assert_eq!(store.access_token().as_deref(), Some("fresh"));
        assert_eq!(store.user(), None);
    }
}
