//! The Token Holder: a durable slot for the current access credential.
//!
//! The credential is an opaque bearer string. It is only ever stored here,
//! never inside the session snapshot, and is read on every outbound request.

use store::KeyValueStore;

/// Storage key of the bearer credential.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone, Debug)]
pub struct TokenHolder<S> {
    storage: S,
}

impl<S: KeyValueStore> TokenHolder<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub async fn get(&self) -> Option<String> {
        self.storage
            .get(ACCESS_TOKEN_KEY)
            .await
            .filter(|token| !token.is_empty())
    }

    pub async fn set(&self, token: &str) {
        self.storage.set(ACCESS_TOKEN_KEY, token).await;
    }

    pub async fn clear(&self) {
        self.storage.remove(ACCESS_TOKEN_KEY).await;
    }
}

/// Extract the credential from an `Authorization: Bearer <token>` value.
pub fn parse_bearer(value: &str) -> Option<&str> {
    value
        .trim()
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Format a credential as an `Authorization` header value.
pub fn bearer_value(token: &str) -> String {
    format!("{BEARER_PREFIX}{token}")
}
