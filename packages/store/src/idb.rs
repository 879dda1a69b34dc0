//! # IndexedDB key-value store — browser-side persistence
//!
//! [`IdbStore`] is the [`KeyValueStore`] implementation used on the **web platform**.
//! It persists the client's credential and session snapshot into the browser's
//! IndexedDB via the [`rexie`] crate, so a signed-in tab survives reloads.
//!
//! ## Database schema
//!
//! A single IndexedDB database named `"blog-client"` (version 1) with one object store:
//!
//! | IndexedDB store | Key | Value |
//! |-----------------|-----|-------|
//! | `"kv"` | storage key (e.g. `"accessToken"`) | string (serialised via `serde_wasm_bindgen`) |
//!
//! ## Connection management
//!
//! `IdbStore` only carries the database name and opens a fresh [`Rexie`]
//! connection on every operation. `Rexie` does not implement `Clone`, and the
//! browser caches IndexedDB connections internally.
//!
//! ## Error handling
//!
//! All trait methods silently swallow errors (returning `None` for reads, doing
//! nothing for writes). An unavailable IndexedDB degrades to "logged out".

use crate::kv::KeyValueStore;
use rexie::{ObjectStore as RexieObjectStore, Rexie, TransactionMode};
use wasm_bindgen::JsValue;

const DEFAULT_DB_NAME: &str = "blog-client";
const DB_VERSION: u32 = 1;
const KV_STORE: &str = "kv";

/// IndexedDB-backed KeyValueStore for web platform.
///
/// When a namespace is provided, the database is named `"blog-client-<namespace>"`,
/// which keeps several deployments on one origin apart.
#[derive(Clone)]
pub struct IdbStore {
    db_name: String,
}

impl Default for IdbStore {
    fn default() -> Self {
        Self::new()
    }
}

impl IdbStore {
    /// Create a store using the default `"blog-client"` database.
    pub fn new() -> Self {
        Self::with_namespace(None)
    }

    pub fn with_namespace(namespace: Option<&str>) -> Self {
        let db_name = match namespace {
            Some(ns) => format!("{DEFAULT_DB_NAME}-{ns}"),
            None => DEFAULT_DB_NAME.to_string(),
        };
        Self { db_name }
    }

    async fn open_db(&self) -> Result<Rexie, rexie::Error> {
        Rexie::builder(&self.db_name)
            .version(DB_VERSION)
            .add_object_store(RexieObjectStore::new(KV_STORE))
            .build()
            .await
    }
}

impl KeyValueStore for IdbStore {
    async fn get(&self, key: &str) -> Option<String> {
        let db = self.open_db().await.ok()?;
        let tx = db
            .transaction(&[KV_STORE], TransactionMode::ReadOnly)
            .ok()?;
        let store = tx.store(KV_STORE).ok()?;

        let value = store.get(JsValue::from_str(key)).await.ok()?;
        serde_wasm_bindgen::from_value(value?).ok()
    }

    async fn set(&self, key: &str, value: &str) {
        let Ok(db) = self.open_db().await else {
            return;
        };
        let Ok(tx) = db.transaction(&[KV_STORE], TransactionMode::ReadWrite) else {
            return;
        };
        let Ok(store) = tx.store(KV_STORE) else {
            return;
        };

        let js_key = JsValue::from_str(key);
        let js_value = JsValue::from_str(value);
        if let Err(e) = store.put(&js_value, Some(&js_key)).await {
            tracing::warn!("IndexedDB put failed for {key}: {e}");
        }
        let _ = tx.done().await;
    }

    async fn remove(&self, key: &str) {
        let Ok(db) = self.open_db().await else {
            return;
        };
        let Ok(tx) = db.transaction(&[KV_STORE], TransactionMode::ReadWrite) else {
            return;
        };
        let Ok(store) = tx.store(KV_STORE) else {
            return;
        };

        let _ = store.delete(JsValue::from_str(key)).await;
        let _ = tx.done().await;
    }
}
