use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::models::{AuthTokens, Session, UserProfile};
use crate::storage::keys::{ACCESS_TOKEN, REFRESH_TOKEN, SESSION_KEYS, USER_PROFILE};
use crate::storage::{Storage, StorageScope, load_json, save_json};

/// Owns the current session and persists it in one of the two storage scopes
///
/// Passed explicitly to whatever needs to know who is signed in.
pub struct SessionStore {
    storage: Storage,
    current: Option<Session>,
}

impl SessionStore {
    /// Unauthenticated store; call [`SessionStore::restore`] to pick up a saved session
    pub fn new(storage: Storage) -> Self {
        Self { storage, current: None }
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// Persist tokens and profile in the scope picked by `remember`
    pub fn login(
        &mut self,
        tokens: AuthTokens,
        user: UserProfile,
        remember: bool,
    ) -> Result<&Session> {
        self.establish(Session { tokens, user, scope: StorageScope::for_remember(remember) })
    }

    /// Persist a session produced by an auth provider in its own scope
    ///
    /// Clears any session left in the other scope, so the next restore finds this one.
    pub fn establish(&mut self, session: Session) -> Result<&Session> {
        for scope in StorageScope::ALL.into_iter().filter(|scope| *scope != session.scope) {
            let store = self.storage.scope(scope);
            for key in SESSION_KEYS {
                store
                    .remove(key)
                    .with_context(|| format!("Failed to clear {} from {:?} storage", key, scope))?;
            }
        }

        let store = self.storage.scope(session.scope);
        store.set(ACCESS_TOKEN, &session.tokens.access).context("Failed to store access token")?;
        store
            .set(REFRESH_TOKEN, &session.tokens.refresh)
            .context("Failed to store refresh token")?;
        save_json(store, USER_PROFILE, &session.user).context("Failed to store user profile")?;

        info!(username = %session.user.username, scope = ?session.scope, "Session started");
        Ok(&*self.current.insert(session))
    }

    /// Clear both scopes unconditionally, whichever one the session used
    pub fn logout(&mut self) -> Result<()> {
        self.current = None;

        let mut first_error = None;
        for scope in StorageScope::ALL {
            let store = self.storage.scope(scope);
            for key in SESSION_KEYS {
                if let Err(e) = store.remove(key) {
                    warn!("Failed to clear {} from {:?} storage: {}", key, scope, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e).context("Failed to clear stored session"),
            None => {
                info!("Session ended");
                Ok(())
            }
        }
    }

    /// Rehydrate from durable storage first, then session storage
    pub fn restore(&mut self) -> Option<&Session> {
        self.current = StorageScope::ALL.into_iter().find_map(|scope| self.read_scope(scope));
        match &self.current {
            Some(session) => debug!(
                username = %session.user.username,
                scope = ?session.scope,
                "Restored session"
            ),
            None => debug!("No stored session"),
        }
        self.current.as_ref()
    }

    fn read_scope(&self, scope: StorageScope) -> Option<Session> {
        let store = self.storage.scope(scope);

        let access = match store.get(ACCESS_TOKEN) {
            Ok(Some(token)) => token,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read access token from {:?} storage: {}", scope, e);
                return None;
            }
        };

        let user: UserProfile = match load_json(store, USER_PROFILE) {
            Ok(Some(user)) => user,
            Ok(None) => return None,
            Err(e) => {
                warn!("Ignoring unreadable profile in {:?} storage: {}", scope, e);
                return None;
            }
        };

        let refresh = store.get(REFRESH_TOKEN).ok().flatten().unwrap_or_default();

        Some(Session { tokens: AuthTokens { access, refresh }, user, scope })
    }
}
