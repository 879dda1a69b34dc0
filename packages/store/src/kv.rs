//! # Key-value storage — the persistence boundary of the client
//!
//! Everything the client keeps between reloads (the access credential, the
//! session snapshot, the post-login redirect target) is a small string value
//! under a fixed key. [`KeyValueStore`] is the one interface those callers see,
//! so the backend can be swapped per platform without touching them:
//!
//! | Backend | Platform | Durability |
//! |---------|----------|------------|
//! | [`crate::MemoryStore`] | tests, ephemeral sessions | process lifetime |
//! | [`crate::FileStore`] | desktop / mobile | survives restarts |
//! | `IdbStore` | web (`wasm32` + `web` feature) | survives reloads, scoped to the origin |
//!
//! ## Error handling
//!
//! Implementations never surface storage errors. A failed read is `None`, a
//! failed write is dropped. A broken local store therefore looks like "logged
//! out", which the server can always correct.
//!
//! ## JSON helpers
//!
//! [`load_json`](KeyValueStore::load_json) and [`save_json`](KeyValueStore::save_json)
//! are provided on top of the raw string API for structured values such as the
//! session snapshot. A value that no longer deserializes is treated as absent.

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Async string key-value store.
pub trait KeyValueStore: Clone {
    fn get(&self, key: &str) -> impl Future<Output = Option<String>>;
    fn set(&self, key: &str, value: &str) -> impl Future<Output = ()>;
    fn remove(&self, key: &str) -> impl Future<Output = ()>;

    /// Read and deserialize a JSON value.
    fn load_json<T: DeserializeOwned>(&self, key: &str) -> impl Future<Output = Option<T>> {
        async move {
            let raw = self.get(key).await?;
            match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::debug!("discarding unreadable value under {key}: {e}");
                    None
                }
            }
        }
    }

    /// Serialize a value as JSON and store it.
    fn save_json<T: Serialize>(&self, key: &str, value: &T) -> impl Future<Output = ()> {
        async move {
            match serde_json::to_string(value) {
                Ok(raw) => self.set(key, &raw).await,
                Err(e) => tracing::warn!("failed to serialize value for {key}: {e}"),
            }
        }
    }
}
