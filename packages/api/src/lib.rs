//! # API crate — authenticated client for the blog backend
//!
//! Everything the frontends need to talk to the blog REST API while keeping a
//! consistent view of who is signed in. The UI crates never touch HTTP or
//! storage directly; they hold an [`ApiClient`] and read the [`Session`].
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Base URL and API prefix, from the environment or `blog-client.toml` |
//! | [`error`] | [`ApiError`] and its coarse [`ErrorClass`] |
//! | [`token`] | Token Holder: the durable slot for the access credential |
//! | [`session`] | Session Store: identity, loading flag, persistence, change broadcast |
//! | [`navigation`] | Navigator seam used for forced redirects, public-route table |
//! | [`transport`] | Raw HTTP send (`reqwest` on every platform) |
//! | [`interceptor`] | The response decision table |
//! | [`client`] | Request Client: credential attachment, reissue-and-retry, forced logout |
//! | [`auth`] | Login, logout, registration behind the email verification gate, password reset, profile update, OAuth URLs |
//! | [`posts`] | Posts, comments, likes and feed pagination |
//! | [`models`] | Wire types and the pure pagination/search helpers |
//!
//! ## Request flow
//!
//! ```text
//! caller ─► ApiClient::execute ─► attach Bearer ─► Transport::send
//!                ▲                                       │
//!                │  resend once        classify(response)│
//!                └──── reissue ◄── 401 + x-reissue-token ┤
//!                                  401/403 ─► expire_session ─► /login
//!                                  404 ─► ApiError::NotFound
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod interceptor;
pub mod models;
pub mod navigation;
pub mod posts;
pub mod session;
pub mod token;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{EmailVerification, OAuthProvider, VerificationPhase};
pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::{ApiError, ErrorClass};
pub use models::{PublicProfile, UserIdentity};
pub use navigation::{is_public_route, HistoryNavigator, Navigator, SharedNavigator};
pub use posts::{CursorFeed, PostService};
pub use session::{Session, SessionStatus, SessionStore};
pub use token::TokenHolder;
pub use transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};
