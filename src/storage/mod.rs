//! Key-value storage with two scopes
//!
//! Mirrors browser `localStorage`/`sessionStorage`: string values addressed by string keys,
//! split into a durable scope and a session scope. Callers pick a [`StorageScope`] once and talk
//! to a uniform [`KeyValueStore`] rather than branching on a flag at every call site.
//!
//! Default locations:
//! - Durable: `<data_dir>/store/` (platform data dir, e.g. `~/.local/share/chemvis/store/`)
//! - Session: `<temp_dir>/chemvis-sessions/<parent pid>/`, so one terminal shares a session and
//!   the OS discards it with the temp dir

pub mod file_store;
pub mod keys;
pub mod memory_store;

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;

/// Which storage a value lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageScope {
    /// Survives restarts
    Durable,
    /// Lives as long as the terminal session
    Session,
}

impl StorageScope {
    pub const ALL: [StorageScope; 2] = [StorageScope::Durable, StorageScope::Session];

    /// Scope chosen by a "remember me" flag
    pub fn for_remember(remember: bool) -> Self {
        if remember { StorageScope::Durable } else { StorageScope::Session }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),

    #[error("storage I/O error for key {key:?}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode or decode value for key {key:?}: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// String key-value store: `get/set/remove(key) -> string | null`
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
}

pub type SharedStore = Arc<dyn KeyValueStore>;

/// Both storage scopes behind one handle
#[derive(Clone)]
pub struct Storage {
    durable: SharedStore,
    session: SharedStore,
}

impl Storage {
    pub fn new(durable: SharedStore, session: SharedStore) -> Self {
        Self { durable, session }
    }

    /// File-backed storage rooted at the given directories
    pub fn open(durable_dir: &Path, session_dir: &Path) -> Self {
        Self::new(Arc::new(FileStore::new(durable_dir)), Arc::new(FileStore::new(session_dir)))
    }

    /// Volatile storage for tests and one-shot commands
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }

    pub fn scope(&self, scope: StorageScope) -> &dyn KeyValueStore {
        match scope {
            StorageScope::Durable => self.durable.as_ref(),
            StorageScope::Session => self.session.as_ref(),
        }
    }

    pub fn durable(&self) -> &dyn KeyValueStore {
        self.scope(StorageScope::Durable)
    }
}

/// Read and decode a JSON value; `Ok(None)` when the key is absent
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> StorageResult<Option<T>> {
    match store.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Json { key: key.to_string(), source }),
        None => Ok(None),
    }
}

/// Encode a value as JSON and store it
pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> StorageResult<()> {
    let raw = serde_json::to_string(value)
        .map_err(|source| StorageError::Json { key: key.to_string(), source })?;
    store.set(key, &raw)
}

/// Keys become file names, so only a conservative character set is accepted
pub(crate) fn validate_key(key: &str) -> StorageResult<()> {
    let valid = !key.is_empty()
        && key.len() <= 128
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid { Ok(()) } else { Err(StorageError::InvalidKey(key.to_string())) }
}
