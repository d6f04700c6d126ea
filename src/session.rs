//! Session Storage
//!
//! Persisted session keys behind a small key/value trait so the HTTP
//! layer and the shell share one read/write/clear contract.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{ApiError, ApiResult};
use crate::models::{Session, TokenPair, User};

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const LEGACY_TOKEN_KEY: &str = "token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const LEGACY_REFRESH_KEY: &str = "refreshToken";
pub const USER_KEY: &str = "user";

/// Every key a logout or authorization failure must remove
pub const SESSION_KEYS: [&str; 5] = [
    ACCESS_TOKEN_KEY,
    LEGACY_TOKEN_KEY,
    REFRESH_TOKEN_KEY,
    LEGACY_REFRESH_KEY,
    USER_KEY,
];

/// Minimal persistent key/value store
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> ApiResult<()>;
    fn remove(&self, key: &str);
}

/// `window.localStorage`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> ApiResult<()> {
        let storage = Self::storage()
            .ok_or_else(|| ApiError::Storage("localStorage unavailable".to_string()))?;
        storage
            .set_item(key, value)
            .map_err(|e| ApiError::Storage(format!("{:?}", e)))
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// In-memory store for tests and non-browser hosts
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> ApiResult<()> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).remove(key);
    }
}

/// Typed access to the persisted session keys
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(inner: Arc<dyn KeyValueStore>) -> Self {
        Self { inner }
    }

    pub fn browser() -> Self {
        Self::new(Arc::new(BrowserStorage))
    }

    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryStore::default()))
    }

    fn non_empty(&self, key: &str) -> Option<String> {
        self.inner.get(key).filter(|v| !v.is_empty())
    }

    /// Access token, falling back to the legacy key
    pub fn access_token(&self) -> Option<String> {
        self.non_empty(ACCESS_TOKEN_KEY)
            .or_else(|| self.non_empty(LEGACY_TOKEN_KEY))
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.non_empty(REFRESH_TOKEN_KEY)
            .or_else(|| self.non_empty(LEGACY_REFRESH_KEY))
    }

    pub fn set_access_token(&self, token: &str) -> ApiResult<()> {
        self.inner.set(ACCESS_TOKEN_KEY, token)
    }

    pub fn set_refresh_token(&self, token: &str) -> ApiResult<()> {
        self.inner.set(REFRESH_TOKEN_KEY, token)
    }

    /// Persist the serialized user and tokens. Either every key is
    /// written or none is left behind.
    pub fn save(&self, session: &Session) -> ApiResult<()> {
        let user = serde_json::to_string(&session.user)
            .map_err(|e| ApiError::Storage(e.to_string()))?;
        let written = self.write_keys(&user, &session.tokens);
        if let Err(e) = &written {
            tracing::warn!(error = %e, "session could not be persisted; clearing partial write");
            self.clear();
        }
        written
    }

    fn write_keys(&self, user: &str, tokens: &TokenPair) -> ApiResult<()> {
        self.inner.set(USER_KEY, user)?;
        self.set_access_token(&tokens.access)?;
        match &tokens.refresh {
            Some(refresh) => self.set_refresh_token(refresh),
            None => {
                self.inner.remove(REFRESH_TOKEN_KEY);
                Ok(())
            }
        }
    }

    /// Active iff a user record and an access token are both present and the
    /// record parses. A malformed record purges the session.
    pub fn restore(&self) -> Option<Session> {
        let raw_user = self.non_empty(USER_KEY)?;
        let access = self.access_token()?;
        match serde_json::from_str::<User>(&raw_user) {
            Ok(user) => Some(Session {
                user,
                tokens: TokenPair { access, refresh: self.refresh_token() },
            }),
            Err(e) => {
                tracing::warn!(error = %e, "stored user record is malformed; clearing session");
                self.clear();
                None
            }
        }
    }

    pub fn clear(&self) {
        for key in SESSION_KEYS {
            self.inner.remove(key);
        }
    }

    /// True if any session key is still stored
    pub fn has_any_key(&self) -> bool {
        SESSION_KEYS.iter().any(|k| self.inner.get(k).is_some())
    }

    /// Raw access for diagnostics and tests
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin_session() -> Session {
        Session {
            user: User {
                id: "1".into(),
                email: Some("admin@latacunga.gob.ec".into()),
                role: "admin".into(),
                ..Default::default()
            },
            tokens: TokenPair { access: "acc".into(), refresh: Some("ref".into()) },
        }
    }

    #[test]
    fn test_save_then_restore() {
        let store = SessionStore::memory();
        store.save(&admin_session()).unwrap();
        assert_eq!(store.raw(ACCESS_TOKEN_KEY).as_deref(), Some("acc"));
        assert_eq!(store.raw(REFRESH_TOKEN_KEY).as_deref(), Some("ref"));
        assert_eq!(store.restore(), Some(admin_session()));
    }

    #[test]
    fn test_restore_requires_both_user_and_token() {
        let store = SessionStore::memory();
        store.save(&admin_session()).unwrap();
        store.inner.remove(ACCESS_TOKEN_KEY);
        assert_eq!(store.restore(), None);
    }

    #[test]
    fn test_legacy_token_keys() {
        let store = SessionStore::memory();
        store.inner.set(LEGACY_TOKEN_KEY, "old").unwrap();
        store.inner.set(LEGACY_REFRESH_KEY, "old-refresh").unwrap();
        assert_eq!(store.access_token().as_deref(), Some("old"));
        assert_eq!(store.refresh_token().as_deref(), Some("old-refresh"));
    }

    #[test]
    fn test_malformed_user_purges() {
        let store = SessionStore::memory();
        store.inner.set(USER_KEY, "{not json").unwrap();
        store.inner.set(ACCESS_TOKEN_KEY, "acc").unwrap();
        assert_eq!(store.restore(), None);
        assert!(!store.has_any_key());
    }

    #[test]
    fn test_failed_save_leaves_no_partial_session() {
        let store = crate::api::testing::RejectingStore::session(&[REFRESH_TOKEN_KEY], &[]);
        let result = store.save(&admin_session());
        assert!(matches!(result, Err(ApiError::Storage(_))));
        assert!(!store.has_any_key());
        assert_eq!(store.restore(), None);
    }

    #[test]
    fn test_clear_removes_every_key() {
        let store = SessionStore::memory();
        for key in SESSION_KEYS {
            store.inner.set(key, "x").unwrap();
        }
        store.clear();
        assert!(!store.has_any_key());
    }
}
