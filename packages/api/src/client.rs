//! # Request Client — the single chokepoint for API calls
//!
//! Every call to the external API goes through [`ApiClient::execute`], which
//! wraps the [`Transport`] with two interceptors:
//!
//! - **Request side**: the Token Holder is re-read before *every* send and its
//!   credential attached as `Authorization: Bearer`. A resend after reissue
//!   therefore always carries the fresh credential.
//! - **Response side**: [`classify`] decides what happens next. A recoverable
//!   401 triggers one reissue (`POST /token/reissue`, cookies only) followed by
//!   exactly one resend; the retried request is never sent before the reissue
//!   resolves. A rejected session is torn down through
//!   [`expire_session`](ApiClient::expire_session).
//!
//! Calls that must not trigger the decision table (login, reissue) use
//! [`send_unintercepted`](ApiClient::send_unintercepted). Password reset is
//! unauthenticated and goes out through
//! [`send_anonymous`](ApiClient::send_anonymous) without any credential.
//!
//! ## Forced logout
//!
//! 1. Remember the current route under `redirectAfterLogin`, unless it is the
//!    login route itself.
//! 2. [`SessionStore::clear`], which also purges the Token Holder.
//! 3. Navigate to `/login` unless already there.
//!
//! Each step is idempotent, so concurrent failures of several requests leave
//! the same state as one.
//!
//! The startup identity fetch in
//! [`initialize_session`](ApiClient::initialize_session) tears down quietly:
//! on a public route it only purges local state and stays where it is.

use serde::de::DeserializeOwned;
use serde::Serialize;
use store::KeyValueStore;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::interceptor::{classify, RequestContext, ResponseAction};
use crate::models::UserIdentity;
use crate::navigation::{
    is_public_route, redirect_to_login, SharedNavigator, LOGIN_ROUTE, REDIRECT_AFTER_LOGIN_KEY,
};
use crate::session::SessionStore;
use crate::token::TokenHolder;
use crate::transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};

pub const REISSUE_PATH: &str = "/token/reissue";
pub const IDENTITY_PATH: &str = "/user/my";

/// How a rejected session is torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Teardown {
    /// Remember the route and send the user to `/login`.
    Redirect,
    /// Purge local state; navigate only away from protected routes.
    Quiet,
}

#[derive(Clone)]
pub struct ApiClient<S, T = ReqwestTransport> {
    config: ApiConfig,
    transport: T,
    storage: S,
    session: SessionStore<S>,
    navigator: SharedNavigator,
}

impl<S: KeyValueStore> ApiClient<S, ReqwestTransport> {
    pub fn new(
        config: ApiConfig,
        storage: S,
        navigator: SharedNavigator,
    ) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(config.clone())?;
        Ok(Self::with_transport(config, transport, storage, navigator))
    }
}

impl<S: KeyValueStore, T: Transport> ApiClient<S, T> {
    pub fn with_transport(
        config: ApiConfig,
        transport: T,
        storage: S,
        navigator: SharedNavigator,
    ) -> Self {
        let session = SessionStore::new(storage.clone(), TokenHolder::new(storage.clone()));
        Self {
            config,
            transport,
            storage,
            session,
            navigator,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    pub fn tokens(&self) -> &TokenHolder<S> {
        self.session.tokens()
    }

    pub fn navigator(&self) -> &SharedNavigator {
        &self.navigator
    }

    pub(crate) fn storage(&self) -> &S {
        &self.storage
    }

    /// Resolve the session once at startup; see [`SessionStore::initialize`].
    ///
    /// A stale credential on a public route leaves the user anonymous in place.
    pub async fn initialize_session(&self) {
        self.session
            .initialize(move || async move {
                self.dispatch(ApiRequest::get(IDENTITY_PATH), Teardown::Quiet)
                    .await?
                    .json::<UserIdentity>()
            })
            .await;
    }

    /// Send through both interceptors and the decision table.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.dispatch(request, Teardown::Redirect).await
    }

    async fn dispatch(
        &self,
        request: ApiRequest,
        teardown: Teardown,
    ) -> Result<ApiResponse, ApiError> {
        let mut ctx = RequestContext::new(request);
        loop {
            ctx.request.bearer = self.tokens().get().await;
            let response = self.transport.send(&ctx.request).await?;

            match classify(&ctx, &response) {
                ResponseAction::Accept => return Ok(response),
                ResponseAction::ReissueAndRetry => {
                    ctx.retried = true;
                    tracing::info!("access token rejected on {}, reissuing", ctx.request.path);
                    if let Err(e) = self.reissue().await {
                        tracing::warn!("token reissue failed: {e}");
                        self.teardown(teardown).await;
                        return Err(ApiError::ReissueFailed(Box::new(e)));
                    }
                }
                ResponseAction::ForceLogout => {
                    tracing::warn!(
                        "{} on {}, ending session",
                        response.status,
                        ctx.request.path
                    );
                    self.teardown(teardown).await;
                    return Err(ApiError::SessionExpired {
                        status: response.status,
                    });
                }
                ResponseAction::NotFound => return Err(ApiError::NotFound),
                ResponseAction::Propagate => return Err(response.into_error()),
            }
        }
    }

    /// Attach the credential but skip the response decision table. Non-success
    /// statuses come back as `Ok` for the caller to interpret.
    pub async fn send_unintercepted(
        &self,
        mut request: ApiRequest,
    ) -> Result<ApiResponse, ApiError> {
        request.bearer = self.tokens().get().await;
        self.transport.send(&request).await
    }

    /// Like [`send_unintercepted`](Self::send_unintercepted) but never carries
    /// a credential, even when one is stored.
    pub async fn send_anonymous(&self, mut request: ApiRequest) -> Result<ApiResponse, ApiError> {
        request.bearer = None;
        self.transport.send(&request).await
    }

    /// Exchange the refresh cookie for a new access credential and store it.
    pub async fn reissue(&self) -> Result<String, ApiError> {
        let response = self.send_unintercepted(ApiRequest::post(REISSUE_PATH)).await?;
        if !response.is_success() {
            return Err(response.into_error());
        }
        let token = response.bearer_token().ok_or_else(|| {
            ApiError::Decode("reissue response carried no bearer credential".to_string())
        })?;
        self.tokens().set(&token).await;
        tracing::info!("access token reissued");
        Ok(token)
    }

    /// Tear down the local session and send the user to the login route.
    pub async fn expire_session(&self) {
        self.teardown(Teardown::Redirect).await;
    }

    async fn teardown(&self, teardown: Teardown) {
        let current = self.navigator.current_path();
        if teardown == Teardown::Quiet && current.as_deref().is_some_and(is_public_route) {
            tracing::debug!("session ended quietly on a public route");
            self.session.clear().await;
            return;
        }
        match current {
            Some(path) if path != LOGIN_ROUTE => {
                self.storage.set(REDIRECT_AFTER_LOGIN_KEY, &path).await;
            }
            _ => {}
        }
        self.session.clear().await;
        redirect_to_login(self.navigator.as_ref());
    }

    /// Consume the route remembered by the last forced logout.
    pub async fn take_redirect_target(&self) -> Option<String> {
        let target = self.storage.get(REDIRECT_AFTER_LOGIN_KEY).await?;
        self.storage.remove(REDIRECT_AFTER_LOGIN_KEY).await;
        Some(target).filter(|t| t.starts_with('/') && t != LOGIN_ROUTE)
    }

    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.execute(ApiRequest::get(path)).await?.json()
    }

    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        self.execute(ApiRequest::post(path).json(body)?).await?.json()
    }

    pub async fn put<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        self.execute(ApiRequest::put(path).json(body)?).await?.json()
    }

    /// Send and ignore any response body.
    pub async fn call(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.execute(request).await.map(|_| ())
    }
}
