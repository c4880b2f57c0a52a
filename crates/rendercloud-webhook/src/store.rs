//! Persistence of subscription state.
//!
//! State is keyed by a trigger key so several triggers can share one store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::error::Result;

/// What is remembered about a registered subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_secret: Option<String>,
}

impl SubscriptionState {
    pub fn is_empty(&self) -> bool {
        self.webhook_id.is_none() && self.webhook_secret.is_none()
    }
}

/// Storage for [`SubscriptionState`].
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load state; a key never saved yields the empty state.
    async fn load(&self, key: &str) -> Result<SubscriptionState>;

    async fn save(&self, key: &str, state: &SubscriptionState) -> Result<()>;

    /// Forget the state of `key`. Clearing an unknown key is not an error.
    async fn clear(&self, key: &str) -> Result<()>;
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, SubscriptionState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<SubscriptionState> {
        Ok(self.entries.lock().get(key).cloned().unwrap_or_default())
    }

    async fn save(&self, key: &str, state: &SubscriptionState) -> Result<()> {
        self.entries.lock().insert(key.to_string(), state.clone());
        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// One JSON file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding `key`. Characters outside `[A-Za-z0-9_-]` become `_`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", name))
    }
}

#[async_trait]
impl StateStore for FileStore {
    async fn load(&self, key: &str) -> Result<SubscriptionState> {
        let path = self.path_for(key);
        let text = match fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SubscriptionState::default());
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&text)?)
    }

    async fn save(&self, key: &str, state: &SubscriptionState) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(key);
        fs::write(&path, serde_json::to_string_pretty(state)?).await?;
        debug!(path = %path.display(), "saved subscription state");
        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> SubscriptionState {
        SubscriptionState {
            webhook_id: Some("whk-1".to_string()),
            webhook_secret: Some("abc".to_string()),
        }
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.load("t").await.unwrap().is_empty());

        store.save("t", &state()).await.unwrap();
        assert_eq!(store.load("t").await.unwrap(), state());
        assert!(store.load("other").await.unwrap().is_empty());

        store.clear("t").await.unwrap();
        assert!(store.load("t").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("state"));

        assert!(store.load("default").await.unwrap().is_empty());
        store.save("default", &state()).await.unwrap();

        let text = std::fs::read_to_string(store.path_for("default")).unwrap();
        assert!(text.contains("\"webhookId\": \"whk-1\""));
        assert_eq!(store.load("default").await.unwrap(), state());

        store.clear("default").await.unwrap();
        assert!(!store.path_for("default").exists());
        store.clear("default").await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_sanitizes_keys() {
        let store = FileStore::new("/tmp/state");
        assert_eq!(
            store.path_for("../etc/passwd"),
            PathBuf::from("/tmp/state/___etc_passwd.json")
        );
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        std::fs::write(store.path_for("k"), "not json").unwrap();
        assert!(store.load("k").await.is_err());
    }
}
