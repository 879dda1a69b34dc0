//! Error taxonomy for every client operation.
//!
//! The Request Client owns classification of authentication failures; anything
//! else is handed back to the calling workflow unchanged. [`ApiError::class`]
//! groups the variants the way callers decide on user-facing behaviour:
//!
//! | Class | Variants | Caller reaction |
//! |-------|----------|-----------------|
//! | [`ErrorClass::SessionFatal`] | `SessionExpired`, `ReissueFailed` | Local state is already purged and the login route requested; show nothing else. |
//! | [`ErrorClass::Validation`] | `InvalidCredentials`, `Validation`, `EmailNotVerified`, `VerificationExpired`, `InvalidVerificationCode`, 400/409/422 statuses | Show inline; no state changes. |
//! | [`ErrorClass::NotFound`] | `NotFound` | Generic "not found" message. |
//! | [`ErrorClass::Unclassified`] | everything else | Feature-specific handling (toast, retry button). |
//!
//! A reissue-eligible 401 never appears here: it is recovered inside the client.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request failed with status {status}{}", message_suffix(.message))]
    Status {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("the requested resource could not be found")]
    NotFound,

    #[error("session is no longer valid (status {status}); sign in again")]
    SessionExpired { status: StatusCode },

    #[error("access token reissue failed: {0}")]
    ReissueFailed(Box<ApiError>),

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("{0}")]
    Validation(String),

    #[error("email address has not been verified")]
    EmailNotVerified,

    #[error("verification code has expired; request a new one")]
    VerificationExpired,

    #[error("verification code is incorrect")]
    InvalidVerificationCode,

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("configuration error: {0}")]
    Config(String),
}

fn message_suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

/// Coarse grouping of [`ApiError`] used by callers to pick a reaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    SessionFatal,
    Validation,
    NotFound,
    Unclassified,
}

impl ApiError {
    pub fn class(&self) -> ErrorClass {
        match self {
            ApiError::SessionExpired { .. } | ApiError::ReissueFailed(_) => {
                ErrorClass::SessionFatal
            }
            ApiError::InvalidCredentials
            | ApiError::Validation(_)
            | ApiError::EmailNotVerified
            | ApiError::VerificationExpired
            | ApiError::InvalidVerificationCode => ErrorClass::Validation,
            ApiError::Status { status, .. }
                if matches!(
                    *status,
                    StatusCode::BAD_REQUEST
                        | StatusCode::CONFLICT
                        | StatusCode::UNPROCESSABLE_ENTITY
                ) =>
            {
                ErrorClass::Validation
            }
            ApiError::NotFound => ErrorClass::NotFound,
            _ => ErrorClass::Unclassified,
        }
    }

    /// Whether the error already forced a local logout.
    pub fn is_session_fatal(&self) -> bool {
        self.class() == ErrorClass::SessionFatal
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } | ApiError::SessionExpired { status } => Some(*status),
            ApiError::NotFound => Some(StatusCode::NOT_FOUND),
            ApiError::ReissueFailed(inner) => inner.status(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}
