use std::thread;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use super::session_store::SessionStore;
use crate::models::{AuthTokens, Session, UserId, UserProfile};
use crate::storage::StorageScope;

/// Fixed password accepted for the `admin` account
pub const ADMIN_PASSWORD: &str = "admin123";

const GUEST_USERNAME: &str = "guest";
const ADMIN_USERNAME: &str = "admin";

#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    /// Persist the session durably instead of for this terminal session only
    pub remember: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid username or password. Please try again.")]
    InvalidCredentials,

    #[error("Username is required")]
    MissingUsername,
}

/// Decides whether credentials open a session
pub trait AuthProvider {
    fn login(&self, credentials: &Credentials) -> Result<Session, AuthError>;

    /// Session that bypasses credentials entirely
    fn guest(&self) -> Session;

    /// Rehydrate a previously stored session, if one is still valid
    fn restore_session(&self, sessions: &mut SessionStore) -> Option<Session> {
        sessions.restore().cloned()
    }
}

/// Hard-coded stand-in for a real authentication backend
#[derive(Debug, Clone, Default)]
pub struct MockAuthProvider {
    latency: Duration,
}

impl MockAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long before answering a credential login
    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }
}

impl AuthProvider for MockAuthProvider {
    fn login(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }

        let username = credentials.username.trim();
        if username.is_empty() {
            return Err(AuthError::MissingUsername);
        }

        let accepted = username == GUEST_USERNAME
            || (username == ADMIN_USERNAME && credentials.password == ADMIN_PASSWORD);
        if !accepted {
            warn!(username, "Rejected login");
            return Err(AuthError::InvalidCredentials);
        }

        info!(username, remember = credentials.remember, "Accepted login");
        Ok(Session {
            tokens: AuthTokens {
                access: "mock_jwt_access".to_string(),
                refresh: "mock_jwt_refresh".to_string(),
            },
            user: UserProfile {
                id: UserId::Number(1),
                username: username.to_string(),
                email: None,
                is_guest: username == GUEST_USERNAME,
            },
            scope: StorageScope::for_remember(credentials.remember),
        })
    }

    fn guest(&self) -> Session {
        Session {
            tokens: AuthTokens {
                access: "guest_token".to_string(),
                refresh: "guest_refresh".to_string(),
            },
            user: UserProfile {
                id: UserId::Text(format!("guest_{}", Utc::now().timestamp_millis())),
                username: "Guest User".to_string(),
                email: None,
                is_guest: true,
            },
            scope: StorageScope::Session,
        }
    }
}
