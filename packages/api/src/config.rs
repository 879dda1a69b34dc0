//! # Client configuration — where the external API lives
//!
//! The client needs exactly one setting: the base URL of the external HTTP API.
//! All REST endpoints are resolved under `base_url + api_prefix` (the prefix
//! defaults to `/api`), while OAuth provider redirects are resolved under the
//! bare `base_url`, because they are served by the authorization server rather
//! than the REST API.
//!
//! ## Sources
//!
//! | Source | Used by |
//! |--------|---------|
//! | [`ApiConfig::from_env`] | Runtime `API_URL` / `API_PREFIX` (after loading `.env` via `dotenvy` on native), then the compile-time `API_URL` baked into browser builds, then `http://localhost:8080`. |
//! | [`ApiConfig::from_toml`] | A `blog-client.toml` file shipped next to a desktop build. |
//!
//! ```toml
//! [api]
//! base_url = "https://blog.example.com"
//! prefix = "/api"
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_API_PREFIX: &str = "/api";

/// Resolved endpoint configuration for the external API.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiConfig {
    base_url: String,
    api_prefix: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct ConfigFile {
    #[serde(default)]
    api: ApiSection,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct ApiSection {
    base_url: Option<String>,
    prefix: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
        }
    }
}

impl ApiConfig {
    /// Create a config for `base_url` with the default `/api` prefix.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::default().with_base_url(base_url)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, ApiError> {
        let base_url = base_url.into();
        let trimmed = base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ApiError::Config(format!(
                "base URL must start with http:// or https://, got {base_url:?}"
            )));
        }
        self.base_url = trimmed.to_string();
        Ok(self)
    }

    /// Builder method to set the REST prefix. An empty prefix means endpoints
    /// live directly under the base URL.
    pub fn with_api_prefix(mut self, prefix: &str) -> Self {
        let prefix = prefix.trim().trim_end_matches('/');
        self.api_prefix = if prefix.is_empty() || prefix.starts_with('/') {
            prefix.to_string()
        } else {
            format!("/{prefix}")
        };
        self
    }

    /// Read `API_URL` / `API_PREFIX` from the environment.
    pub fn from_env() -> Result<Self, ApiError> {
        #[cfg(not(target_arch = "wasm32"))]
        dotenvy::dotenv().ok();

        let runtime = std::env::var("API_URL").ok();
        let base_url = runtime
            .or_else(|| option_env!("API_URL").map(str::to_string))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let mut config = Self::new(base_url)?;
        if let Ok(prefix) = std::env::var("API_PREFIX") {
            config = config.with_api_prefix(&prefix);
        }
        Ok(config)
    }

    /// Parse from a TOML string. Missing keys keep their defaults.
    pub fn from_toml(s: &str) -> Result<Self, ApiError> {
        let file: ConfigFile =
            toml::from_str(s).map_err(|e| ApiError::Config(e.to_string()))?;
        let mut config = Self::default();
        if let Some(base_url) = file.api.base_url {
            config = config.with_base_url(base_url)?;
        }
        if let Some(prefix) = file.api.prefix {
            config = config.with_api_prefix(&prefix);
        }
        Ok(config)
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "blog-client.toml"
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    /// Absolute URL of a REST endpoint, e.g. `endpoint("/login")`.
    pub fn endpoint(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}{}/{}", self.base_url, self.api_prefix, path)
    }

    /// Absolute URL served directly under the base URL (OAuth entry points).
    pub fn site_url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }
}
