//! Client-side session state.
//!
//! A [`SessionStore`] is a small persistent key/value store holding the auth
//! token, the username and a mirrored favorites list. [`SessionState`] is the
//! typed layer every other component goes through.

mod file;
mod memory;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

use crate::error::Result;
use crate::token;
use crate::types::FavoriteRef;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Store key for the bearer token
pub const KEY_AUTH_TOKEN: &str = "authToken";

/// Store key for the authenticated username
pub const KEY_USERNAME: &str = "username";

/// Store key for the JSON-encoded favorites mirror
pub const KEY_FAVORITE_MOVIES: &str = "favoriteMovies";

/// Persistent key/value storage for session data.
///
/// Multi-entry writes and removals must be applied as a single mutation:
/// an observer never sees half of a `set_many` or `remove`.
pub trait SessionStore: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write several values in one mutation
    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()>;

    /// Remove several keys in one mutation
    fn remove(&self, keys: &[&str]) -> Result<()>;

    /// Write a single value
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_many(&[(key, value)])
    }
}

/// An authenticated identity: bearer token plus username.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub username: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("username", &self.username)
            .finish()
    }
}

/// Typed access to the session store.
#[derive(Clone)]
pub struct SessionState {
    store: Arc<dyn SessionStore>,
}

impl SessionState {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Record a successful login.
    pub fn set(&self, token: &str, username: &str) -> Result<()> {
        self.store
            .set_many(&[(KEY_AUTH_TOKEN, token), (KEY_USERNAME, username)])?;
        debug!(username = %username, "Session stored");
        Ok(())
    }

    /// Remove token, username and favorites mirror together.
    pub fn clear(&self) -> Result<()> {
        self.store
            .remove(&[KEY_AUTH_TOKEN, KEY_USERNAME, KEY_FAVORITE_MOVIES])?;
        debug!("Session cleared");
        Ok(())
    }

    pub fn token(&self) -> Result<Option<String>> {
        self.store.get(KEY_AUTH_TOKEN)
    }

    pub fn username(&self) -> Result<Option<String>> {
        self.store.get(KEY_USERNAME)
    }

    /// The stored session, if both token and username are present.
    ///
    /// Expiry is not checked; see [`SessionState::is_valid`].
    pub fn current(&self) -> Result<Option<Session>> {
        let token = self.token()?;
        let username = self.username()?;
        Ok(match (token, username) {
            (Some(token), Some(username)) if !token.is_empty() && !username.is_empty() => {
                Some(Session { token, username })
            }
            _ => None,
        })
    }

    /// Whether a token is stored and its `exp` claim is still in the future.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// [`SessionState::is_valid`] against an explicit clock.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match self.token() {
            Ok(Some(token)) => !token::is_expired_at(&token, now),
            Ok(None) => false,
            Err(e) => {
                warn!(error = %e, "Failed to read session token");
                false
            }
        }
    }

    /// Replace the favorites mirror with `favorites`. Never merges.
    pub fn mirror_favorites(&self, favorites: &[FavoriteRef]) -> Result<()> {
        let encoded = serde_json::to_string(favorites)?;
        self.store.set(KEY_FAVORITE_MOVIES, &encoded)
    }

    /// The cached favorites mirror. Missing or unreadable data yields an empty list.
    pub fn cached_favorites(&self) -> Vec<FavoriteRef> {
        let raw = match self.store.get(KEY_FAVORITE_MOVIES) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read favorites mirror");
                return Vec::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring corrupt favorites mirror");
            Vec::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::test_tokens::token_expiring_at;
    use chrono::Duration;

    fn state() -> (Arc<MemorySessionStore>, SessionState) {
        let store = Arc::new(MemorySessionStore::new());
        let state = SessionState::new(store.clone());
        (store, state)
    }

    #[test]
    fn test_set_stores_token_and_username_only() {
        let (store, state) = state();
        state.set("tok", "alice").unwrap();

        assert_eq!(store.get(KEY_AUTH_TOKEN).unwrap().as_deref(), Some("tok"));
        assert_eq!(store.get(KEY_USERNAME).unwrap().as_deref(), Some("alice"));
        assert_eq!(store.len(), 2);
        assert_eq!(
            state.current().unwrap(),
            Some(Session {
                token: "tok".into(),
                username: "alice".into()
            })
        );
    }

    #[test]
    fn test_clear_removes_everything() {
        let (store, state) = state();
        state.set("tok", "alice").unwrap();
        state.mirror_favorites(&[FavoriteRef::new("1")]).unwrap();
        assert_eq!(store.len(), 3);

        state.clear().unwrap();

        assert!(store.is_empty());
        assert!(state.current().unwrap().is_none());
        assert!(state.cached_favorites().is_empty());
    }

    #[test]
    fn test_validity() {
        let (_, state) = state();
        let now = Utc::now();
        assert!(!state.is_valid_at(now));

        state
            .set(&token_expiring_at((now + Duration::hours(2)).timestamp()), "alice")
            .unwrap();
        assert!(state.is_valid_at(now));
        assert!(!state.is_valid_at(now + Duration::hours(3)));

        state.set("garbage", "alice").unwrap();
        assert!(!state.is_valid_at(now));
    }

    #[test]
    fn test_mirror_overwrites() {
        let (_, state) = state();
        state
            .mirror_favorites(&[FavoriteRef::new("1"), FavoriteRef::new("2")])
            .unwrap();
        state.mirror_favorites(&[FavoriteRef::new("3")]).unwrap();

        assert_eq!(state.cached_favorites(), vec![FavoriteRef::new("3")]);
    }

    #[test]
    fn test_corrupt_mirror_reads_as_empty() {
        let (store, state) = state();
        store.set(KEY_FAVORITE_MOVIES, "{not json").unwrap();
        assert!(state.cached_favorites().is_empty());
    }

    #[test]
    fn test_session_debug_redacts_token() {
        let session = Session {
            token: "very-secret".into(),
            username: "alice".into(),
        };
        assert!(!format!("{:?}", session).contains("very-secret"));
    }
}
