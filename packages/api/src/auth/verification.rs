//! # Email verification gate
//!
//! Registration is only allowed for an address that proved ownership through a
//! 6-digit code. [`EmailVerification`] tracks the client side of that exchange
//! as a small state machine:
//!
//! | State | Entered by | Leaves by |
//! |-------|-----------|-----------|
//! | `Idle` | start, [`reset`](EmailVerification::reset) | code request |
//! | `CodeSent` | [`request_verification_code`](crate::ApiClient::request_verification_code) | verify, new request |
//! | `Verified` | [`confirm_verification_code`](crate::ApiClient::confirm_verification_code) | new request, reset |
//!
//! The code's validity window is stored as an absolute expiry instant, not a
//! countdown, so the remaining time stays correct across reloads and throttled
//! background tabs. "Expired" is derived from the clock: a `CodeSent` state
//! whose expiry has passed reports [`VerificationPhase::Expired`] and rejects
//! submissions with [`ApiError::VerificationExpired`] without a network call.
//!
//! Every transition returns a new value, which makes the type easy to keep in a
//! UI signal. The client also writes each non-idle state under
//! [`VERIFICATION_STORAGE_KEY`], so a reloaded form can pick up a pending code
//! with [`restore_verification`](crate::ApiClient::restore_verification).

use std::sync::LazyLock;

use chrono::{DateTime, TimeDelta, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use store::KeyValueStore;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::transport::{ApiRequest, Transport};

/// Seconds a verification code stays valid after it is issued.
pub const CODE_VALIDITY_SECS: i64 = 300;

pub const CODE_LENGTH: usize = 6;

pub const VERIFICATION_STORAGE_KEY: &str = "emailVerification";

static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").ok());

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(email))
}

pub fn validate_email(email: &str) -> Result<(), ApiError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(ApiError::Validation("invalid email address".to_string()))
    }
}

fn validate_code(code: &str) -> Result<(), ApiError> {
    if code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "verification code must be {CODE_LENGTH} digits"
        )))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum EmailVerification {
    #[default]
    Idle,
    #[serde(rename_all = "camelCase")]
    CodeSent {
        email: String,
        expires_at: DateTime<Utc>,
    },
    Verified {
        email: String,
    },
}

/// What the form should show at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationPhase {
    Idle,
    Pending,
    Expired,
    Verified,
}

impl EmailVerification {
    /// State right after a code for `email` was issued at `issued_at`.
    pub fn code_sent(email: &str, issued_at: DateTime<Utc>) -> Self {
        Self::CodeSent {
            email: email.to_string(),
            expires_at: issued_at + TimeDelta::seconds(CODE_VALIDITY_SECS),
        }
    }

    pub fn reset(&self) -> Self {
        Self::Idle
    }

    pub fn phase(&self, now: DateTime<Utc>) -> VerificationPhase {
        match self {
            Self::Idle => VerificationPhase::Idle,
            Self::CodeSent { expires_at, .. } if now < *expires_at => VerificationPhase::Pending,
            Self::CodeSent { .. } => VerificationPhase::Expired,
            Self::Verified { .. } => VerificationPhase::Verified,
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::CodeSent { expires_at, .. } => Some(*expires_at),
            _ => None,
        }
    }

    /// Time left on a pending code, clamped at zero.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        self.expires_at()
            .map(|expires_at| (expires_at - now).max(TimeDelta::zero()))
    }

    /// Countdown label such as `4:59`.
    pub fn countdown(&self, now: DateTime<Utc>) -> Option<String> {
        self.remaining(now).map(|left| {
            let secs = left.num_seconds();
            format!("{}:{:02}", secs / 60, secs % 60)
        })
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified { .. })
    }

    pub fn verified_email(&self) -> Option<&str> {
        match self {
            Self::Verified { email } => Some(email),
            _ => None,
        }
    }

    /// Address a code is pending for, if any.
    pub fn pending_email(&self) -> Option<&str> {
        match self {
            Self::CodeSent { email, .. } => Some(email),
            _ => None,
        }
    }

    /// Local checks before a verify call: a pending, unexpired code and a
    /// well-formed submission.
    pub fn check_submission(&self, code: &str, now: DateTime<Utc>) -> Result<&str, ApiError> {
        let email = match self {
            Self::CodeSent { email, .. } => email,
            Self::Verified { email } => return Ok(email),
            Self::Idle => {
                return Err(ApiError::Validation(
                    "request a verification code first".to_string(),
                ))
            }
        };
        if self.phase(now) == VerificationPhase::Expired {
            return Err(ApiError::VerificationExpired);
        }
        validate_code(code)?;
        Ok(email)
    }
}

#[derive(Serialize)]
struct SendCodeRequest<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct VerifyCodeRequest<'a> {
    email: &'a str,
    code: &'a str,
}

#[derive(Deserialize)]
struct VerifyCodeResponse {
    verified: bool,
}

impl<S: KeyValueStore, T: Transport> ApiClient<S, T> {
    /// Ask the server to email a code. Re-requesting restarts the window, which
    /// is how an expired state is left.
    pub async fn request_verification_code(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<EmailVerification, ApiError> {
        validate_email(email)?;
        self.call(ApiRequest::post("/email/send/code").json(&SendCodeRequest { email })?)
            .await?;
        tracing::debug!("verification code requested");
        let state = EmailVerification::code_sent(email, now);
        self.save_verification(&state).await;
        Ok(state)
    }

    /// Submit a code. Returns the verified state on success.
    pub async fn confirm_verification_code(
        &self,
        state: &EmailVerification,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<EmailVerification, ApiError> {
        if state.is_verified() {
            return Ok(state.clone());
        }
        let email = state.check_submission(code, now)?;
        let response: VerifyCodeResponse = self
            .post("/email/verify/code", &VerifyCodeRequest { email, code })
            .await?;
        if !response.verified {
            return Err(ApiError::InvalidVerificationCode);
        }
        let verified = EmailVerification::Verified {
            email: email.to_string(),
        };
        self.save_verification(&verified).await;
        Ok(verified)
    }

    /// The last persisted verification state, or `Idle`.
    pub async fn restore_verification(&self) -> EmailVerification {
        self.storage()
            .load_json(VERIFICATION_STORAGE_KEY)
            .await
            .unwrap_or_default()
    }

    /// Persist `state`; `Idle` removes the stored entry.
    pub async fn save_verification(&self, state: &EmailVerification) {
        match state {
            EmailVerification::Idle => self.storage().remove(VERIFICATION_STORAGE_KEY).await,
            _ => self.storage().save_json(VERIFICATION_STORAGE_KEY, state).await,
        }
    }
}
