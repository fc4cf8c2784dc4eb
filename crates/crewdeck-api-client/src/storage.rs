//! Durable session storage
//!
//! Key/value storage for everything that must survive an application reload:
//! tokens, the cached user profile, and UI selections. Writes are synchronous
//! and last-writer-wins; there is no cross-process coordination.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Well-known storage keys
pub mod keys {
    /// Short-lived bearer token
    pub const ACCESS_TOKEN: &str = "access_token";
    /// Long-lived refresh token
    pub const REFRESH_TOKEN: &str = "refresh_token";
    /// Cached current-user profile (JSON)
    pub const CACHED_USER: &str = "user";
    /// Last selected team id
    pub const SELECTED_TEAM: &str = "selected_team_id";
    /// Last selected space id
    pub const SELECTED_SPACE: &str = "selected_space_id";
    /// Theme preference
    pub const THEME: &str = "theme";
    /// Language preference
    pub const LANGUAGE: &str = "language";
}

/// Durable string key/value storage for session state.
///
/// Implementations are injected into the session client so tests and multiple
/// client instances do not share ambient state.
pub trait SessionStore: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value
    fn set(&self, key: &str, value: &str);

    /// Remove a value
    fn remove(&self, key: &str);

    /// Remove everything
    fn clear(&self);
}

/// In-memory store for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values.lock().unwrap().remove(key);
    }

    fn clear(&self) {
        self.values.lock().unwrap().clear();
    }
}

/// File-backed store: a single JSON object, rewritten on every mutation.
///
/// A failed write keeps the in-memory view and logs; the next successful
/// mutation repairs the file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open a store at the given path, loading existing values if present.
    /// A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = std::fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();

        Self {
            path,
            values: Mutex::new(values),
        }
    }

    fn persist(&self, values: &HashMap<String, String>) {
        match serde_json::to_string_pretty(values) {
            Ok(json) => {
                if let Err(err) = std::fs::write(&self.path, json) {
                    tracing::warn!("Failed to persist session store to {:?}: {}", self.path, err);
                }
            }
            Err(err) => tracing::warn!("Failed to serialize session store: {}", err),
        }
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut values = self.values.lock().unwrap();
        values.insert(key.to_string(), value.to_string());
        self.persist(&values);
    }

    fn remove(&self, key: &str) {
        let mut values = self.values.lock().unwrap();
        values.remove(key);
        self.persist(&values);
    }

    fn clear(&self) {
        let mut values = self.values.lock().unwrap();
        values.clear();
        self.persist(&values);
    }
}
