//! Platform-appropriate client construction.
//!
//! The [`Client`] alias pins the storage backend per target:
//! - **Web** (WASM + `web` feature): IndexedDB via [`store::IdbStore`]
//! - **Desktop / Mobile** (native): one file per key under `<data_dir>/blog-client/`
//! - **WASM without `web`**: in-memory only

use api::{ApiClient, ApiConfig, ApiError, SharedNavigator};

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub type PlatformStore = store::IdbStore;
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformStore = store::FileStore;
#[cfg(all(target_arch = "wasm32", not(feature = "web")))]
pub type PlatformStore = store::MemoryStore;

pub type Client = ApiClient<PlatformStore>;

/// Open the durable store for this platform.
pub fn make_storage() -> PlatformStore {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        store::IdbStore::new()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let base = dirs::data_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join("blog-client");
        store::FileStore::new(base)
    }
    #[cfg(all(target_arch = "wasm32", not(feature = "web")))]
    {
        store::MemoryStore::new()
    }
}

/// Resolve the API location: `blog-client.toml` next to the binary if present
/// (native only), otherwise the environment.
pub fn load_config() -> ApiConfig {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let path = std::path::Path::new(ApiConfig::filename());
        if let Ok(raw) = std::fs::read_to_string(path) {
            match ApiConfig::from_toml(&raw) {
                Ok(config) => return config,
                Err(e) => tracing::error!("ignoring {}: {e}", path.display()),
            }
        }
    }
    ApiConfig::from_env().unwrap_or_else(|e| {
        tracing::error!("falling back to default API location: {e}");
        ApiConfig::default()
    })
}

pub fn make_client(config: ApiConfig, navigator: SharedNavigator) -> Result<Client, ApiError> {
    tracing::info!("using API at {}{}", config.base_url(), config.api_prefix());
    ApiClient::new(config, make_storage(), navigator)
}
