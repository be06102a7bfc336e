//! Authentication session: identity, bearer token and their persistence.

use std::sync::Arc;

use tokio::sync::watch;
use tradepost_core::session::{SessionPayload, SessionState, UserIdentity};
use tradepost_core::state::StateCell;
use tradepost_core::storage::{KeyValueStore, KeyValueStoreExt, StorageKeys};
use tradepost_core::{Result, TradepostError};

/// Single source of truth for "is a user logged in".
///
/// The identity and token are persisted as two independent entries so token
/// presence can be checked without decoding the identity. Whatever happens
/// to storage, the published state always reflects the last transition.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    keys: StorageKeys,
    state: StateCell<SessionState>,
}

impl SessionStore {
    /// Restores the session from storage.
    ///
    /// Never fails: unreadable entries are discarded and the store starts
    /// logged out.
    pub fn new(storage: Arc<dyn KeyValueStore>, keys: StorageKeys) -> Self {
        let initial = restore(storage.as_ref(), &keys);
        tracing::info!(
            "[SessionStore] Restored session: authenticated={}",
            initial.authenticated
        );

        Self {
            storage,
            keys,
            state: StateCell::new(initial),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.state.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read(|s| s.authenticated)
    }

    pub fn token(&self) -> Option<String> {
        self.state.read(|s| s.token.clone())
    }

    pub fn identity(&self) -> Option<UserIdentity> {
        self.state.read(|s| s.identity.clone())
    }

    pub fn storage(&self) -> &Arc<dyn KeyValueStore> {
        &self.storage
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// The only way in or out of a session.
    ///
    /// A payload with a non-empty token logs in; anything else logs out and
    /// removes both persisted entries. Storage failures are returned after
    /// the in-memory state has been published.
    pub fn set_session(&self, payload: Option<SessionPayload>) -> Result<()> {
        match payload {
            Some(SessionPayload {
                identity,
                token: Some(token),
            }) if !token.is_empty() => {
                let persisted = self
                    .storage
                    .set_json(&self.keys.user_key, &identity)
                    .and_then(|_| self.storage.set(&self.keys.token_key, &token));

                tracing::info!(
                    "[SessionStore] Logged in as {} (id {})",
                    identity.username,
                    identity.user_id
                );
                self.state
                    .update(|s| *s = SessionState::authenticated(Some(identity), token));

                persisted.map_err(|e| storage_failure("persist session", e))
            }
            _ => {
                let removed = self.remove_persisted();
                tracing::info!("[SessionStore] Session cleared");
                self.state.update(|s| *s = SessionState::anonymous());
                removed
            }
        }
    }

    pub fn clear_session(&self) -> Result<()> {
        self.set_session(None)
    }

    /// Sets the authenticated flag directly.
    ///
    /// `false` clears the whole session. `true` is refused unless a token is
    /// already held.
    pub fn set_authenticated_flag(&self, value: bool) -> Result<()> {
        if !value {
            return self.clear_session();
        }

        if self.token().is_some() {
            self.state.update(|s| s.authenticated = true);
            Ok(())
        } else {
            tracing::warn!("[SessionStore] Refusing to mark session authenticated without a token");
            Err(TradepostError::precondition(
                "Cannot mark the session authenticated without a token.",
            ))
        }
    }

    fn remove_persisted(&self) -> Result<()> {
        let user = self.storage.remove(&self.keys.user_key);
        let token = self.storage.remove(&self.keys.token_key);
        user.and(token)
            .map_err(|e| storage_failure("remove persisted session", e))
    }
}

fn storage_failure(action: &str, error: TradepostError) -> TradepostError {
    tracing::warn!("[SessionStore] Failed to {}: {}", action, error);
    match error {
        TradepostError::Storage(_) => error,
        other => TradepostError::storage(other.to_string()),
    }
}

fn restore(storage: &dyn KeyValueStore, keys: &StorageKeys) -> SessionState {
    let token = match storage.get(&keys.token_key) {
        Ok(token) => token.filter(|t| !t.is_empty()),
        Err(e) => {
            tracing::warn!("[SessionStore] Could not read persisted token: {}", e);
            None
        }
    };

    let identity = match storage.get_json::<UserIdentity>(&keys.user_key) {
        Ok(identity) => identity,
        Err(TradepostError::MalformedPersistedData { message, .. }) => {
            tracing::warn!("[SessionStore] Discarding malformed identity: {}", message);
            discard(storage, &keys.user_key);
            None
        }
        Err(e) => {
            tracing::warn!("[SessionStore] Could not read persisted identity: {}", e);
            None
        }
    };

    match token {
        Some(token) => SessionState::authenticated(identity, token),
        None => {
            if identity.is_some() {
                tracing::warn!("[SessionStore] Discarding identity persisted without a token");
                discard(storage, &keys.user_key);
            }
            SessionState::anonymous()
        }
    }
}

fn discard(storage: &dyn KeyValueStore, key: &str) {
    if let Err(e) = storage.remove(key) {
        tracing::warn!("[SessionStore] Failed to remove '{}': {}", key, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingStore, identity};
    use tradepost_infrastructure::InMemoryKeyValueStore;

    fn store_with(entries: &[(&str, &str)]) -> (Arc<InMemoryKeyValueStore>, SessionStore) {
        let storage = Arc::new(InMemoryKeyValueStore::with_entries(entries.iter().copied()));
        let session = SessionStore::new(storage.clone(), StorageKeys::default());
        (storage, session)
    }

    #[test]
    fn test_starts_anonymous_with_empty_storage() {
        let (_, session) = store_with(&[]);
        assert_eq!(session.state(), SessionState::anonymous());
    }

    #[test]
    fn test_restores_token_and_identity() {
        let (_, session) = store_with(&[
            ("access_token", "tok"),
            ("authUser", r#"{"user_id":3,"username":"ana","created_at":"2024-01-01T00:00:00"}"#),
        ]);

        let state = session.state();
        assert!(state.authenticated);
        assert_eq!(state.token.as_deref(), Some("tok"));
        assert_eq!(state.user_id(), Some(3));
    }

    #[test]
    fn test_malformed_identity_is_discarded_and_removed() {
        let (storage, session) = store_with(&[("access_token", "tok"), ("authUser", "{oops")]);

        assert!(session.is_authenticated());
        assert!(session.identity().is_none());
        assert_eq!(storage.get("authUser").unwrap(), None);
    }

    #[test]
    fn test_identity_without_token_is_discarded() {
        let (storage, session) = store_with(&[("authUser", r#"{"user_id":3,"username":"ana"}"#)]);

        assert!(!session.is_authenticated());
        assert!(session.identity().is_none());
        assert_eq!(storage.get("authUser").unwrap(), None);
    }

    #[test]
    fn test_set_session_persists_both_entries() {
        let (storage, session) = store_with(&[]);
        let mut rx = session.subscribe();

        session
            .set_session(Some(SessionPayload::new(identity(7, "kim"), "tok-7")))
            .unwrap();

        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update().clone();
        assert!(state.authenticated);
        assert_eq!(state.user_id(), Some(7));
        assert_eq!(storage.get("access_token").unwrap().as_deref(), Some("tok-7"));
        let persisted: Option<UserIdentity> = storage.get_json("authUser").unwrap();
        assert_eq!(persisted.map(|u| u.username), Some("kim".to_string()));
    }

    #[test]
    fn test_payload_without_token_logs_out() {
        let (storage, session) = store_with(&[("access_token", "tok")]);

        session
            .set_session(Some(SessionPayload {
                identity: identity(1, "x"),
                token: None,
            }))
            .unwrap();

        assert_eq!(session.state(), SessionState::anonymous());
        assert_eq!(storage.get("access_token").unwrap(), None);
    }

    #[test]
    fn test_flag_false_clears_everything() {
        let (storage, session) = store_with(&[]);
        session
            .set_session(Some(SessionPayload::new(identity(2, "lee"), "t")))
            .unwrap();

        session.set_authenticated_flag(false).unwrap();

        assert_eq!(session.state(), SessionState::anonymous());
        assert!(!storage.contains("authUser").unwrap());
        assert!(!storage.contains("access_token").unwrap());
    }

    #[test]
    fn test_flag_true_without_token_is_refused() {
        let (_, session) = store_with(&[]);
        let result = session.set_authenticated_flag(true);

        assert!(matches!(result, Err(TradepostError::Precondition(_))));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_storage_failure_still_publishes() {
        let session = SessionStore::new(Arc::new(FailingStore), StorageKeys::default());

        let result = session.set_session(Some(SessionPayload::new(identity(4, "mo"), "tok")));

        assert!(matches!(result, Err(TradepostError::Storage(_))));
        assert!(session.is_authenticated());
        assert_eq!(session.token().as_deref(), Some("tok"));
    }

    #[test]
    fn test_custom_keys() {
        let storage = Arc::new(InMemoryKeyValueStore::new());
        let keys = StorageKeys {
            user_key: "tp_user".to_string(),
            token_key: "tp_token".to_string(),
        };
        let session = SessionStore::new(storage.clone(), keys);
        session
            .set_session(Some(SessionPayload::new(identity(1, "a"), "t")))
            .unwrap();

        assert!(storage.contains("tp_token").unwrap());
        assert!(!storage.contains("access_token").unwrap());
    }
}
