use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::kv::KeyValueStore;

/// In-memory KeyValueStore for testing and ephemeral sessions.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    async fn set(&self, key: &str, value: &str) {
        self.lock().insert(key.to_string(), value.to_string());
    }

    async fn remove(&self, key: &str) {
        self.lock().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Snapshot {
        name: String,
        count: u32,
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.get("accessToken").await.is_none());

        store.set("accessToken", "abc123").await;
        assert_eq!(store.get("accessToken").await.as_deref(), Some("abc123"));

        store.set("accessToken", "xyz789").await;
        assert_eq!(store.get("accessToken").await.as_deref(), Some("xyz789"));
        assert_eq!(store.len(), 1);

        store.remove("accessToken").await;
        assert!(store.get("accessToken").await.is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set("k", "v").await;
        assert_eq!(other.get("k").await.as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_json_helpers() {
        let store = MemoryStore::new();
        let snapshot = Snapshot {
            name: "alice".to_string(),
            count: 3,
        };
        store.save_json("snap", &snapshot).await;

        let loaded: Option<Snapshot> = store.load_json("snap").await;
        assert_eq!(loaded, Some(snapshot));

        // Garbage under the key reads as absent
        store.set("snap", "{not json").await;
        let loaded: Option<Snapshot> = store.load_json("snap").await;
        assert!(loaded.is_none());
    }
}
