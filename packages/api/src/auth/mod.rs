//! # Auth workflows
//!
//! Multi-step flows built on the Request Client and the Session Store. Each is
//! a method on [`ApiClient`] so it shares the client's credential, session and
//! navigation seams.
//!
//! | Workflow | Calls | Session effect |
//! |----------|-------|----------------|
//! | [`login`](ApiClient::login) | `POST /login` (unintercepted), `GET /user/my` | authenticated |
//! | [`logout`](ApiClient::logout) | `POST /logout` | always cleared, then `/login` |
//! | [`register`](ApiClient::register) | `POST /join` | none; navigates to `/login` |
//! | [`update_profile`](ApiClient::update_profile) | `PUT /user/{username}`, `GET /user/my` | identity refreshed, credential rotated if the server sent one |
//! | [`delete_account`](ApiClient::delete_account) | `DELETE /user/{username}` | cleared |
//! | [`reset_password`](ApiClient::reset_password) | `POST /user/password/reset` (anonymous) | none |
//!
//! The email verification gate lives in [`verification`]; social sign-in URLs
//! in [`oauth`].

pub mod oauth;
pub mod verification;

pub use oauth::OAuthProvider;
pub use verification::{
    is_valid_email, EmailVerification, VerificationPhase, CODE_VALIDITY_SECS,
    VERIFICATION_STORAGE_KEY,
};

use reqwest::StatusCode;
use serde::Serialize;
use store::KeyValueStore;

use crate::client::{ApiClient, IDENTITY_PATH};
use crate::error::ApiError;
use crate::models::user::DuplicateCheck;
use crate::models::{JoinRequest, LoginRequest, PublicProfile, UserIdentity, UserUpdateRequest};
use crate::navigation::{redirect_to_login, LOGIN_ROUTE};
use crate::transport::{ApiRequest, ApiResponse, Transport};
use verification::validate_email;

pub const PASSWORD_SPECIALS: &str = "@$!%*?&";

/// 6 to 20 characters drawn from letters, digits and `@$!%*?&`, with at least
/// one of each of lowercase, uppercase, digit and special.
pub fn validate_password(password: &str) -> Result<(), ApiError> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c);
    let ok = (6..=20).contains(&password.chars().count())
        && password.chars().all(allowed)
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c));
    if ok {
        Ok(())
    } else {
        Err(ApiError::Validation(
            "password must be 6-20 characters with upper and lower case letters, a digit and one \
             of @$!%*?&"
                .to_string(),
        ))
    }
}

fn validate_login(request: &LoginRequest) -> Result<(), ApiError> {
    if request.username.trim().is_empty() {
        return Err(ApiError::Validation("enter your username".to_string()));
    }
    if request.password.chars().count() < 6 {
        return Err(ApiError::Validation(
            "password must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}

fn expect_success(response: ApiResponse) -> Result<ApiResponse, ApiError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(response.into_error())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordResetRequest<'a> {
    token: &'a str,
    new_password: &'a str,
}

#[derive(Serialize)]
struct EmailBody<'a> {
    email: &'a str,
}

impl<S: KeyValueStore, T: Transport> ApiClient<S, T> {
    /// Authenticate, store the credential from the `Authorization` header and
    /// populate the session.
    pub async fn login(&self, request: &LoginRequest) -> Result<UserIdentity, ApiError> {
        validate_login(request)?;
        let response = self
            .send_unintercepted(ApiRequest::post("/login").json(request)?)
            .await?;
        if matches!(
            response.status,
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            return Err(ApiError::InvalidCredentials);
        }
        let response = expect_success(response)?;
        let Some(token) = response.bearer_token() else {
            tracing::warn!("login succeeded without a bearer credential");
            return Err(ApiError::InvalidCredentials);
        };
        self.tokens().set(&token).await;

        let identity = self.fetch_me().await?;
        self.session().set_authenticated(identity.clone()).await;
        tracing::info!("signed in as {}", identity.username);
        Ok(identity)
    }

    pub async fn fetch_me(&self) -> Result<UserIdentity, ApiError> {
        self.get(IDENTITY_PATH).await
    }

    /// Public profile of any user.
    pub async fn fetch_profile(&self, username: &str) -> Result<PublicProfile, ApiError> {
        self.get(&format!("/user/{username}")).await
    }

    /// Tell the server, then end the local session whatever it answered.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self
            .send_unintercepted(ApiRequest::post("/logout"))
            .await
            .and_then(expect_success)
            .map(|_| ());
        if let Err(e) = &result {
            tracing::warn!("server logout failed, clearing local session anyway: {e}");
        }
        self.session().clear().await;
        redirect_to_login(self.navigator().as_ref());
        result
    }

    /// Create an account for an address that passed the verification gate.
    /// Does not sign in; sends the user to the login route on success.
    pub async fn register(
        &self,
        request: &JoinRequest,
        verification: &EmailVerification,
    ) -> Result<(), ApiError> {
        if verification.verified_email() != Some(request.email.as_str()) {
            return Err(ApiError::EmailNotVerified);
        }
        validate_password(&request.password)?;
        self.call(ApiRequest::post("/join").json(request)?).await?;
        tracing::info!("account registered");
        self.save_verification(&EmailVerification::Idle).await;
        self.navigator().navigate(LOGIN_ROUTE);
        Ok(())
    }

    /// Apply a profile change. A rotated credential in the response replaces
    /// the stored one before the identity is refetched.
    pub async fn update_profile(
        &self,
        username: &str,
        update: &UserUpdateRequest,
    ) -> Result<UserIdentity, ApiError> {
        if let Some(new) = &update.new_password {
            validate_password(new)?;
        }

        let response = self
            .execute(ApiRequest::put(format!("/user/{username}")).json(update)?)
            .await?;
        if let Some(token) = response.bearer_token() {
            tracing::info!("credential rotated by profile update");
            self.tokens().set(&token).await;
        }

        let identity = self.fetch_me().await?;
        self.session().set_authenticated(identity.clone()).await;
        Ok(identity)
    }

    pub async fn delete_account(&self, username: &str) -> Result<(), ApiError> {
        self.call(ApiRequest::delete(format!("/user/{username}"))).await?;
        tracing::info!("account deleted");
        self.session().clear().await;
        redirect_to_login(self.navigator().as_ref());
        Ok(())
    }

    /// Whether `username` is already taken.
    pub async fn check_username(&self, username: &str) -> Result<bool, ApiError> {
        let check: DuplicateCheck = self
            .execute(ApiRequest::get("/user/check/username").query("username", username))
            .await?
            .json()?;
        Ok(check.duplicate)
    }

    /// Whether `email` is already registered.
    pub async fn check_email(&self, email: &str) -> Result<bool, ApiError> {
        validate_email(email)?;
        let check: DuplicateCheck = self
            .execute(ApiRequest::get("/user/check/email").query("email", email))
            .await?
            .json()?;
        Ok(check.duplicate)
    }

    /// Email a password-reset link.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), ApiError> {
        validate_email(email)?;
        let request = ApiRequest::post("/email/send/password-reset").json(&EmailBody { email })?;
        self.send_anonymous(request)
            .await
            .and_then(expect_success)
            .map(|_| ())
    }

    /// Set a new password using the token from an emailed link.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), ApiError> {
        if token.trim().is_empty() {
            return Err(ApiError::Validation("the reset link is invalid".to_string()));
        }
        validate_password(new_password)?;
        let body = PasswordResetRequest {
            token,
            new_password,
        };
        self.send_anonymous(ApiRequest::post("/user/password/reset").json(&body)?)
            .await
            .and_then(expect_success)
            .map(|_| ())
    }

    pub fn oauth_authorize_url(&self, provider: OAuthProvider) -> String {
        provider.authorize_url(self.config())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStatus;
    use crate::testing::{identity_json, Harness, Reply};
    use chrono::Utc;
    use reqwest::Method;

    fn verified(email: &str) -> EmailVerification {
        EmailVerification::Verified {
            email: email.to_string(),
        }
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("Secret1!").is_ok());
        assert!(validate_password("Sec1!").is_err());
        assert!(validate_password("secret1!").is_err());
        assert!(validate_password("SECRET1!").is_err());
        assert!(validate_password("Secret!!").is_err());
        assert!(validate_password("Secret12").is_err());
        assert!(validate_password("Secret1!#").is_err());
        assert!(validate_password("Secret1!Secret1!Secret1!").is_err());
    }

    #[tokio::test]
    async fn test_login_stores_credential_and_session() {
        let h = Harness::at(LOGIN_ROUTE);
        h.transport
            .on(Method::POST, "/login", Reply::ok().bearer("abc123"))
            .on(Method::GET, "/user/my", Reply::ok().json(identity_json("alice")));

        let identity = h
            .client
            .login(&LoginRequest::new("alice", "Secret1!"))
            .await
            .unwrap();

        assert_eq!(identity.username, "alice");
        assert_eq!(h.client.tokens().get().await.as_deref(), Some("abc123"));
        assert!(h.client.session().current().is_authenticated());

        let login = &h.transport.calls(Method::POST, "/login")[0];
        let body = login.body.clone().unwrap();
        assert_eq!(body["username"], "alice");
        assert_eq!(body["rememberMe"], false);
        let me = &h.transport.calls(Method::GET, "/user/my")[0];
        assert_eq!(me.bearer.as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_login_without_header_is_invalid_credentials() {
        let h = Harness::at(LOGIN_ROUTE);
        h.transport.on(Method::POST, "/login", Reply::ok());

        let err = h
            .client
            .login(&LoginRequest::new("alice", "Secret1!"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials));
        assert!(h.client.tokens().get().await.is_none());
        assert!(h.transport.calls(Method::GET, "/user/my").is_empty());
    }

    #[tokio::test]
    async fn test_rejected_login_does_not_force_logout() {
        let h = Harness::at(LOGIN_ROUTE);
        h.transport.on(Method::POST, "/login", Reply::status(401));

        let err = h
            .client
            .login(&LoginRequest::new("alice", "wrong-pass"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials));
        assert_eq!(err.class(), crate::ErrorClass::Validation);
        assert_eq!(h.navigator.history(), [LOGIN_ROUTE]);
    }

    #[tokio::test]
    async fn test_login_form_checks() {
        let h = Harness::at(LOGIN_ROUTE);
        assert!(matches!(
            h.client.login(&LoginRequest::new("", "Secret1!")).await,
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            h.client.login(&LoginRequest::new("alice", "123")).await,
            Err(ApiError::Validation(_))
        ));
        assert!(h.transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_server_fails() {
        let h = Harness::signed_in("/mypage", "alice", "abc123").await;
        h.transport.on(Method::POST, "/logout", Reply::status(500));

        let err = h.client.logout().await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(h.client.tokens().get().await.is_none());
        assert_eq!(h.client.session().current().status(), SessionStatus::Anonymous);
        assert_eq!(h.navigator.visits(LOGIN_ROUTE), 1);
    }

    #[tokio::test]
    async fn test_logout_offline_still_clears() {
        let h = Harness::signed_in("/", "alice", "abc123").await;
        assert!(matches!(h.client.logout().await, Err(ApiError::Network(_))));
        assert!(!h.client.session().current().is_authenticated());
        assert!(h.client.tokens().get().await.is_none());
    }

    #[tokio::test]
    async fn test_register_requires_verification() {
        let h = Harness::at("/join");
        let request = JoinRequest {
            email: "alice@example.com".to_string(),
            password: "Secret1!".to_string(),
        };

        for state in [
            EmailVerification::Idle,
            EmailVerification::code_sent("alice@example.com", Utc::now()),
            verified("mallory@example.com"),
        ] {
            let err = h.client.register(&request, &state).await.unwrap_err();
            assert!(matches!(err, ApiError::EmailNotVerified));
        }
        assert!(h.transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_register_redirects_without_signing_in() {
        let h = Harness::at("/join");
        h.transport.on(Method::POST, "/join", Reply::ok());
        let request = JoinRequest {
            email: "alice@example.com".to_string(),
            password: "Secret1!".to_string(),
        };

        let state = verified("alice@example.com");
        h.client.save_verification(&state).await;

        h.client.register(&request, &state).await.unwrap();
        assert_eq!(h.navigator.visits(LOGIN_ROUTE), 1);
        assert_eq!(h.client.restore_verification().await, EmailVerification::Idle);
        assert!(h.client.tokens().get().await.is_none());
        assert!(!h.client.session().current().is_authenticated());
    }

    #[tokio::test]
    async fn test_username_change_rotates_credential() {
        let h = Harness::signed_in("/alice/edit", "alice", "abc123").await;
        h.transport
            .on(Method::PUT, "/user/alice", Reply::ok().bearer("rotated"))
            .on(Method::GET, "/user/my", Reply::ok().json(identity_json("alice2")));

        let update = UserUpdateRequest {
            username: Some("alice2".to_string()),
            ..Default::default()
        };
        let identity = h.client.update_profile("alice", &update).await.unwrap();

        assert_eq!(identity.username, "alice2");
        assert_eq!(h.client.tokens().get().await.as_deref(), Some("rotated"));
        assert_eq!(
            h.client.session().current().identity().unwrap().username,
            "alice2"
        );
        let put = &h.transport.calls(Method::PUT, "/user/alice")[0];
        assert_eq!(put.bearer.as_deref(), Some("abc123"));
        let refetch = &h.transport.calls(Method::GET, "/user/my")[0];
        assert_eq!(refetch.bearer.as_deref(), Some("rotated"));
    }

    #[tokio::test]
    async fn test_update_without_rotation_keeps_credential() {
        let h = Harness::signed_in("/alice/edit", "alice", "abc123").await;
        h.transport
            .on(Method::PUT, "/user/alice", Reply::ok())
            .on(Method::GET, "/user/my", Reply::ok().json(identity_json("alice")));

        let update = UserUpdateRequest {
            bio: Some("hello".to_string()),
            ..Default::default()
        };
        h.client.update_profile("alice", &update).await.unwrap();
        assert_eq!(h.client.tokens().get().await.as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_delete_account_logs_out() {
        let h = Harness::signed_in("/mypage/settings", "alice", "abc123").await;
        h.transport.on(Method::DELETE, "/user/alice", Reply::status(204));

        h.client.delete_account("alice").await.unwrap();
        assert!(h.client.tokens().get().await.is_none());
        assert_eq!(h.navigator.visits(LOGIN_ROUTE), 1);
    }

    #[tokio::test]
    async fn test_duplicate_checks() {
        let h = Harness::at("/join");
        h.transport
            .on(
                Method::GET,
                "/user/check/username",
                Reply::ok().json(serde_json::json!({"duplicate": true})),
            )
            .on(
                Method::GET,
                "/user/check/email",
                Reply::ok().json(serde_json::json!({"duplicate": false})),
            );

        assert!(h.client.check_username("alice").await.unwrap());
        assert!(!h.client.check_email("new@example.com").await.unwrap());
        let sent = h.transport.calls(Method::GET, "/user/check/username");
        assert_eq!(sent[0].query, [("username".to_string(), "alice".to_string())]);
    }

    #[tokio::test]
    async fn test_password_reset_does_not_touch_session() {
        let h = Harness::signed_in("/reset-password", "alice", "abc123").await;
        h.transport.on(Method::POST, "/user/password/reset", Reply::status(401));

        let err = h.client.reset_password("tok", "Secret1!").await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert!(h.client.session().current().is_authenticated());
        assert_eq!(h.client.tokens().get().await.as_deref(), Some("abc123"));

        let sent = &h.transport.sent()[0];
        assert!(sent.bearer.is_none());
        let body = sent.body.clone().unwrap();
        assert_eq!(body["token"], "tok");
        assert_eq!(body["newPassword"], "Secret1!");
    }

    #[tokio::test]
    async fn test_password_reset_email_is_sent_without_credential() {
        let h = Harness::signed_in("/find-password", "alice", "abc123").await;
        h.transport.on(Method::POST, "/email/send/password-reset", Reply::ok());

        h.client.request_password_reset("alice@example.com").await.unwrap();
        let sent = h.transport.calls(Method::POST, "/email/send/password-reset");
        assert!(sent[0].bearer.is_none());
        assert_eq!(sent[0].body.as_ref().unwrap()["email"], "alice@example.com");
    }

    #[tokio::test]
    async fn test_password_reset_rejects_empty_token() {
        let h = Harness::at("/reset-password");
        assert!(matches!(
            h.client.reset_password("", "Secret1!").await,
            Err(ApiError::Validation(_))
        ));
        assert!(h.transport.sent().is_empty());
    }
}
