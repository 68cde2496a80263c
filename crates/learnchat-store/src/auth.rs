//! Cached credentials of the signed-in user.

use crate::error::StoreError;
use crate::kv::KeyValueStore;
use learnchat_protocol::{CURRENT_USER_KEY, TOKEN_KEY, UserProfile};
use log::{info, warn};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Token and profile pair stored under `token` / `currentUser`.
#[derive(Clone)]
pub struct AuthSession {
    store: Arc<dyn KeyValueStore>,
}

impl AuthSession {
    /// Wrap a key-value store.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Bearer token, if signed in.
    pub fn token(&self) -> Result<Option<String>, StoreError> {
        Ok(self
            .store
            .get(TOKEN_KEY)?
            .filter(|token| !token.trim().is_empty()))
    }

    /// Cached profile; an unreadable value counts as signed out.
    pub fn current_user(&self) -> Option<UserProfile> {
        let raw = match self.store.get(CURRENT_USER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!("failed to read cached user: {err}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!("ignoring unreadable cached user: {err}");
                None
            }
        }
    }

    /// Whether a bearer token is stored.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.token(), Ok(Some(_)))
    }

    /// Store the token and profile returned by a login.
    pub fn save_login(&self, token: &str, user: &UserProfile) -> Result<(), StoreError> {
        self.store.set(TOKEN_KEY, token)?;
        self.store
            .set(CURRENT_USER_KEY, &serde_json::to_string(user)?)?;
        info!("stored login (user_id={})", user.id);
        Ok(())
    }

    /// Forget the token and profile.
    pub fn logout(&self) -> Result<(), StoreError> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(CURRENT_USER_KEY)?;
        info!("cleared stored login");
        Ok(())
    }

    /// Overlay `patch` onto the cached profile and store the result.
    ///
    /// Top-level fields of the patch replace cached ones; cached fields the
    /// patch does not mention (such as `role`) are kept.
    pub fn merge_profile(&self, patch: &Value) -> Result<UserProfile, StoreError> {
        let mut merged = match self.current_user() {
            Some(user) => match serde_json::to_value(user)? {
                Value::Object(map) => map,
                _ => Map::new(),
            },
            None => Map::new(),
        };
        if let Value::Object(patch) = patch {
            for (key, value) in patch {
                merged.insert(key.clone(), value.clone());
            }
        }
        let user: UserProfile = serde_json::from_value(Value::Object(merged))?;
        self.store
            .set(CURRENT_USER_KEY, &serde_json::to_string(&user)?)?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::AuthSession;
    use crate::kv::{KeyValueStore, MemoryStore};
    use learnchat_protocol::{CURRENT_USER_KEY, TOKEN_KEY, UserProfile};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn student() -> UserProfile {
        UserProfile {
            id: "u1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            role: Some("student".to_string()),
            ..UserProfile::default()
        }
    }

    #[test]
    fn login_and_logout() {
        let store = Arc::new(MemoryStore::new());
        let session = AuthSession::new(store.clone());
        assert!(!session.is_authenticated());

        session.save_login("tok", &student()).expect("login");
        assert!(session.is_authenticated());
        assert_eq!(session.current_user(), Some(student()));

        session.logout().expect("logout");
        assert!(!store.contains(TOKEN_KEY));
        assert!(!store.contains(CURRENT_USER_KEY));
        assert_eq!(session.current_user(), None);
    }

    #[test]
    fn corrupt_cached_user_reads_as_none() {
        let store = Arc::new(MemoryStore::with_entries([(CURRENT_USER_KEY, "{oops")]));
        assert_eq!(AuthSession::new(store).current_user(), None);
    }

    #[test]
    fn merge_keeps_fields_missing_from_patch() {
        let store = Arc::new(MemoryStore::new());
        let session = AuthSession::new(store.clone());
        session.save_login("tok", &student()).expect("login");

        let merged = session
            .merge_profile(&json!({ "id": "u1", "name": "Ada L.", "email": "ada@example.com" }))
            .expect("merge");
        assert_eq!(merged.name, "Ada L.");
        assert_eq!(merged.role.as_deref(), Some("student"));

        let raw = store.get(CURRENT_USER_KEY).expect("get").expect("stored");
        assert!(raw.contains("Ada L."));
    }
}
