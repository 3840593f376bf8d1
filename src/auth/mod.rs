//! Mocked authentication and session persistence
//!
//! [`AuthProvider`] decides who may sign in; [`SessionStore`] owns the resulting session and
//! its lifecycle (create on login, restore on start, destroy on logout). Swapping the mock for a
//! real backend only touches the provider.

pub mod provider;
pub mod session_store;

pub use provider::{ADMIN_PASSWORD, AuthError, AuthProvider, Credentials, MockAuthProvider};
pub use session_store::SessionStore;
