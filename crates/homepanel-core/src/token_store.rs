//! Access/refresh token persistence

use crate::ports::KeyValueStore;
use crate::storage::MemoryStore;
use homepanel_types::Session;
use std::sync::{Arc, Mutex, MutexGuard};

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Holds the current session in durable key-value storage.
///
/// Plain reads and writes; deciding when tokens change is the job of the
/// session manager and refresh coordinator. Writes from all clones are
/// serialized so a conditional write cannot interleave with a plain one.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn KeyValueStore>,
    writes: Arc<Mutex<()>>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            writes: Arc::new(Mutex::new(())),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn get_access_token(&self) -> Option<String> {
        self.storage.get(ACCESS_TOKEN_KEY)
    }

    pub fn get_refresh_token(&self) -> Option<String> {
        self.storage.get(REFRESH_TOKEN_KEY)
    }

    pub fn session(&self) -> Option<Session> {
        Some(Session {
            access_token: self.get_access_token()?,
            refresh_token: self.get_refresh_token()?,
        })
    }

    /// Replace both tokens in one write
    pub fn set_session(&self, session: &Session) {
        let _writes = self.lock_writes();
        self.write_session(session);
    }

    pub fn clear_session(&self) {
        let _writes = self.lock_writes();
        self.remove_session();
    }

    /// Store `session` only if the refresh token is still `expected`.
    ///
    /// Returns false, leaving the store alone, when a logout or login
    /// changed the session in the meantime.
    pub fn replace_session(&self, expected: &str, session: &Session) -> bool {
        let _writes = self.lock_writes();
        if self.get_refresh_token().as_deref() != Some(expected) {
            return false;
        }
        self.write_session(session);
        true
    }

    /// Clear the session only if the refresh token is still `expected`
    pub fn clear_session_if(&self, expected: &str) -> bool {
        let _writes = self.lock_writes();
        if self.get_refresh_token().as_deref() != Some(expected) {
            return false;
        }
        self.remove_session();
        true
    }

    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.writes.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn write_session(&self, session: &Session) {
        self.storage.set_many(&[
            (ACCESS_TOKEN_KEY, session.access_token.as_str()),
            (REFRESH_TOKEN_KEY, session.refresh_token.as_str()),
        ]);
    }

    fn remove_session(&self) {
        self.storage
            .remove_many(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY]);
    }

    /// True when an access token is present; says nothing about its validity
    pub fn is_authenticated(&self) -> bool {
        self.get_access_token().is_some()
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
