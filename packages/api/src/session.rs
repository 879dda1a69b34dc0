//! # Session Store — who is signed in, kept consistent with the server
//!
//! [`SessionStore`] is an explicit, injectable session context. It owns the
//! process-wide [`Session`] value, persists a snapshot of it through a
//! [`KeyValueStore`] and purges the [`TokenHolder`] when the session ends.
//!
//! ## States
//!
//! | `is_loading` | `identity` | Meaning |
//! |--------------|------------|---------|
//! | `true` | `None` | Unknown: bootstrap in progress. Never render as "anonymous". |
//! | `false` | `Some(_)` | Authenticated. |
//! | `false` | `None` | Anonymous. |
//!
//! `is_authenticated` is derived from `identity`, so the two can never disagree.
//! [`Session`] has no public constructor other than the three states above.
//!
//! ## Lifecycle
//!
//! - [`initialize`](SessionStore::initialize): load-on-init. Restores the
//!   persisted snapshot and reconciles it with the Token Holder: no credential
//!   means anonymous; a credential without a cached identity triggers one
//!   identity fetch, and a failed fetch leaves the session anonymous.
//!   Concurrent calls collapse into one.
//! - [`set_authenticated`](SessionStore::set_authenticated): save-on-mutate.
//! - [`clear`](SessionStore::clear): purges the credential, then the session.
//!
//! Changes are broadcast over a [`tokio::sync::watch`] channel so UI layers can
//! mirror them with [`subscribe`](SessionStore::subscribe).

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use store::KeyValueStore;
use tokio::sync::watch;

use crate::error::ApiError;
use crate::models::UserIdentity;
use crate::token::TokenHolder;

/// Storage key of the persisted session snapshot.
pub const SESSION_STORAGE_KEY: &str = "auth-storage";

/// Client-side view of the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    identity: Option<UserIdentity>,
    is_loading: bool,
}

/// Borrowed view of [`Session`] as one of its three states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus<'a> {
    Loading,
    Authenticated(&'a UserIdentity),
    Anonymous,
}

impl Default for Session {
    fn default() -> Self {
        Self::loading()
    }
}

impl Session {
    pub fn loading() -> Self {
        Self {
            identity: None,
            is_loading: true,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            identity: None,
            is_loading: false,
        }
    }

    pub fn authenticated(identity: UserIdentity) -> Self {
        Self {
            identity: Some(identity),
            is_loading: false,
        }
    }

    pub fn identity(&self) -> Option<&UserIdentity> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn status(&self) -> SessionStatus<'_> {
        match (&self.identity, self.is_loading) {
            (Some(identity), _) => SessionStatus::Authenticated(identity),
            (None, true) => SessionStatus::Loading,
            (None, false) => SessionStatus::Anonymous,
        }
    }
}

/// What survives a reload. `isLoading` is deliberately process-local.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionSnapshot {
    user: Option<UserIdentity>,
    #[serde(default)]
    is_authenticated: bool,
}

impl From<&Session> for SessionSnapshot {
    fn from(session: &Session) -> Self {
        Self {
            user: session.identity.clone(),
            is_authenticated: session.is_authenticated(),
        }
    }
}

#[derive(Clone)]
pub struct SessionStore<S> {
    state: Arc<watch::Sender<Session>>,
    storage: S,
    tokens: TokenHolder<S>,
    initializing: Arc<AtomicBool>,
}

struct InitGuard<'a>(&'a AtomicBool);

impl Drop for InitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<S: KeyValueStore> SessionStore<S> {
    /// A store in the "unknown" state; call [`initialize`](Self::initialize) to resolve it.
    pub fn new(storage: S, tokens: TokenHolder<S>) -> Self {
        let (state, _) = watch::channel(Session::loading());
        Self {
            state: Arc::new(state),
            storage,
            tokens,
            initializing: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn current(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn tokens(&self) -> &TokenHolder<S> {
        &self.tokens
    }

    /// Resolve the session from storage, fetching the identity if needed.
    ///
    /// `fetch_identity` is only invoked when a credential exists and no
    /// identity is cached.
    pub async fn initialize<F, Fut>(&self, fetch_identity: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<UserIdentity, ApiError>>,
    {
        if self.initializing.swap(true, Ordering::AcqRel) {
            tracing::debug!("session initialization already in progress");
            return;
        }
        let _guard = InitGuard(&self.initializing);

        let cached = match self.current().identity {
            Some(identity) => Some(identity),
            None => self.restore_snapshot().await,
        };

        match (self.tokens.get().await, cached) {
            (None, cached) => {
                if cached.is_some() {
                    tracing::debug!("dropping cached identity without a credential");
                }
                self.clear().await;
            }
            (Some(_), Some(identity)) => {
                tracing::debug!("session restored for {}", identity.username);
                self.set_authenticated(identity).await;
            }
            (Some(_), None) => {
                self.state.send_replace(Session::loading());
                match fetch_identity().await {
                    Ok(identity) => {
                        tracing::info!("session initialized for {}", identity.username);
                        self.set_authenticated(identity).await;
                    }
                    // The client already purged local state for fatal errors.
                    Err(e) if e.is_session_fatal() => {
                        tracing::debug!("session bootstrap ended the session: {e}");
                    }
                    Err(e) => {
                        tracing::debug!("session bootstrap failed, continuing anonymously: {e}");
                        self.clear().await;
                    }
                }
            }
        }
    }

    pub async fn set_authenticated(&self, identity: UserIdentity) {
        let session = Session::authenticated(identity);
        self.persist(&session).await;
        self.state.send_replace(session);
    }

    /// Purge the credential and reset to anonymous. Safe to call when already
    /// logged out.
    pub async fn clear(&self) {
        self.tokens.clear().await;
        let session = Session::anonymous();
        self.persist(&session).await;
        self.state.send_replace(session);
    }

    async fn restore_snapshot(&self) -> Option<UserIdentity> {
        let snapshot: SessionSnapshot = self.storage.load_json(SESSION_STORAGE_KEY).await?;
        if snapshot.is_authenticated != snapshot.user.is_some() {
            tracing::debug!("normalizing inconsistent session snapshot");
        }
        snapshot.user
    }

    async fn persist(&self, session: &Session) {
        self.storage
            .save_json(SESSION_STORAGE_KEY, &SessionSnapshot::from(session))
            .await;
    }
}
