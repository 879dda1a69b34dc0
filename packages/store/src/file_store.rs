//! # Filesystem-backed key-value store
//!
//! [`FileStore`] is a [`KeyValueStore`] implementation that keeps one file per
//! key under a base directory. It is used on desktop and mobile platforms so a
//! login survives app restarts.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! ├── accessToken         # raw bearer credential
//! ├── auth-storage        # JSON session snapshot
//! └── redirectAfterLogin  # path to return to after signing in
//! ```
//!
//! ## Platform data directories
//!
//! Use [`dirs::data_dir()`] to obtain a platform-appropriate base:
//!
//! | Platform | Path |
//! |----------|------|
//! | macOS / iOS | `~/Library/Application Support/blog-client/` |
//! | Linux | `~/.local/share/blog-client/` |
//! | Windows | `C:\Users\<user>\AppData\Roaming\blog-client\` |

use std::path::{Path, PathBuf};

use crate::kv::KeyValueStore;

/// Filesystem-backed KeyValueStore for desktop and mobile persistence.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Keys are fixed identifiers; anything outside `[A-Za-z0-9._-]` is
    /// replaced so a key can never escape the base directory.
    fn key_path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let name = name.trim_start_matches('.');
        self.base.join(if name.is_empty() { "_" } else { name })
    }

    /// Delete every stored key.
    pub fn purge(&self) {
        let _ = std::fs::remove_dir_all(&self.base);
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.key_path(key)).ok()
    }

    async fn set(&self, key: &str, value: &str) {
        if let Err(e) = std::fs::create_dir_all(&self.base) {
            tracing::warn!("cannot create store directory {}: {e}", self.base.display());
            return;
        }
        if let Err(e) = std::fs::write(self.key_path(key), value) {
            tracing::warn!("cannot persist {key}: {e}");
        }
    }

    async fn remove(&self, key: &str) {
        let _ = std::fs::remove_file(self.key_path(key));
    }
}
