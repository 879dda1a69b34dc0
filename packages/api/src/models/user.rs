//! # User models exchanged with the external API
//!
//! ## [`UserIdentity`]
//!
//! The signed-in user as returned by `GET /user/my`. It is an immutable value:
//! the session replaces it wholesale after every successful fetch or update and
//! never patches individual fields.
//!
//! ## [`PublicProfile`]
//!
//! The subset anyone can see on `/{username}` (`GET /user/{username}`). It omits
//! the numeric id and the email address.
//!
//! ## Requests
//!
//! [`LoginRequest`], [`JoinRequest`] and [`UserUpdateRequest`] are the JSON
//! bodies of `/login`, `/join` and `PUT /user/{username}`. Field names follow
//! the server's camelCase convention.

use serde::{Deserialize, Serialize};

/// Image shown when a user has not uploaded a profile picture.
pub const DEFAULT_PROFILE_IMAGE: &str = "/exampleProfile.jpg";

/// The authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

impl UserIdentity {
    /// Get display name, falling back to the username if name is blank.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.username
        } else {
            &self.name
        }
    }

    pub fn profile_image(&self) -> &str {
        profile_image_or_default(self.profile_image_url.as_deref())
    }
}

/// Publicly visible profile of any user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub username: String,
    pub name: String,
    pub created_at: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

impl PublicProfile {
    pub fn profile_image(&self) -> &str {
        profile_image_or_default(self.profile_image_url.as_deref())
    }
}

fn profile_image_or_default(url: Option<&str>) -> &str {
    match url {
        Some(url) if !url.is_empty() => url,
        _ => DEFAULT_PROFILE_IMAGE,
    }
}

/// Body of `POST /login`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub remember_me: bool,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            remember_me: false,
        }
    }

    pub fn remember(mut self, remember_me: bool) -> Self {
        self.remember_me = remember_me;
        self
    }
}

/// Body of `POST /join`.
#[derive(Debug, Clone, Serialize)]
pub struct JoinRequest {
    pub email: String,
    pub password: String,
}

/// Body of `PUT /user/{username}`. Unset fields are left unchanged server-side.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
}

/// Response of the duplicate-check endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct DuplicateCheck {
    pub duplicate: bool,
}
