//! Persistence port: load and save graph states through a key-value store.
//!
//! Saving is best effort. [`Persistence::save`] logs failures and moves on;
//! [`Persistence::try_save`] hands them back for callers that care.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::schema::{to_persisted_string, try_migrate};
use crate::store::{FileStore, InMemoryStore, KeyValueStore, StoreError};
use crate::types::GraphState;

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "skill-tree:v1";

/// Environment variable overriding the storage key.
pub const STORAGE_KEY_ENV: &str = "SKILL_TREE_STORAGE_KEY";

/// Environment variable selecting a directory for file-backed storage.
pub const DATA_DIR_ENV: &str = "SKILL_TREE_DATA_DIR";

/// Error type for persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// The backing store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    /// The state could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Where and under which key graph state is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceConfig {
    /// Key the state is stored under.
    pub key: String,
    /// Directory for file-backed storage; `None` keeps state in memory.
    pub data_dir: Option<PathBuf>,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_STORAGE_KEY.to_string(),
            data_dir: None,
        }
    }
}

impl PersistenceConfig {
    /// Read configuration from the environment.
    ///
    /// - `SKILL_TREE_STORAGE_KEY`: storage key (default `skill-tree:v1`)
    /// - `SKILL_TREE_DATA_DIR`: directory for file-backed storage (default: in memory)
    ///
    /// Empty values count as unset.
    pub fn from_env() -> Self {
        let non_empty = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            key: non_empty(STORAGE_KEY_ENV).unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string()),
            data_dir: non_empty(DATA_DIR_ENV).map(PathBuf::from),
        }
    }
}

/// Loads and saves graph state under a fixed key.
pub struct Persistence<S: KeyValueStore> {
    key: String,
    store: S,
}

impl Persistence<Box<dyn KeyValueStore>> {
    /// Build a persistence port from configuration.
    ///
    /// A configured `data_dir` selects a [`FileStore`]; otherwise an
    /// [`InMemoryStore`] is used.
    pub fn from_config(config: PersistenceConfig) -> Self {
        let store: Box<dyn KeyValueStore> = match config.data_dir {
            Some(dir) => Box::new(FileStore::new(dir)),
            None => Box::new(InMemoryStore::new()),
        };
        Self::new(config.key, store)
    }
}

impl<S: KeyValueStore> Persistence<S> {
    /// Create a port over `store` using `key`.
    pub fn new(key: impl Into<String>, store: S) -> Self {
        Self {
            key: key.into(),
            store,
        }
    }

    /// Create a port over `store` using [`DEFAULT_STORAGE_KEY`].
    pub fn with_default_key(store: S) -> Self {
        Self::new(DEFAULT_STORAGE_KEY, store)
    }

    /// Storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the persisted state.
    ///
    /// Absent or empty values, unreadable stores, unparsable JSON and
    /// documents that fail migration all yield `None`.
    pub fn load(&self) -> Option<GraphState> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => return None,
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to read persisted state");
                return None;
            }
        };

        let value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %self.key, error = %e, "persisted state is not valid JSON");
                return None;
            }
        };

        match try_migrate(&value) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!(key = %self.key, error = %e, "discarding persisted state");
                None
            }
        }
    }

    /// Save `state`, logging and swallowing any failure.
    pub fn save(&self, state: &GraphState) {
        if let Err(e) = self.try_save(state) {
            warn!(key = %self.key, error = %e, "failed to persist state");
        }
    }

    /// Save `state`, returning any failure.
    ///
    /// Skips the write when the store already holds exactly this document.
    /// An unreadable current value never blocks the write.
    pub fn try_save(&self, state: &GraphState) -> Result<(), PersistenceError> {
        let raw = to_persisted_string(state)?;
        if let Ok(Some(current)) = self.store.get(&self.key) {
            if current == raw {
                debug!(key = %self.key, "stored state already current, skipping write");
                return Ok(());
            }
        }

        self.store.set(&self.key, &raw)?;
        debug!(key = %self.key, bytes = raw.len(), "state persisted");
        Ok(())
    }
}
