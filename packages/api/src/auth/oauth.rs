//! Social sign-in entry points.
//!
//! The backend runs the whole authorization-code exchange; the client only
//! sends the browser to `{base_url}/oauth2/authorization/{provider}`. These
//! URLs live outside the API prefix.

use std::fmt;
use std::str::FromStr;

use crate::config::ApiConfig;
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OAuthProvider {
    Kakao,
    Google,
    Naver,
}

impl OAuthProvider {
    pub const ALL: [OAuthProvider; 3] = [Self::Kakao, Self::Google, Self::Naver];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kakao => "kakao",
            Self::Google => "google",
            Self::Naver => "naver",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Kakao => "Kakao",
            Self::Google => "Google",
            Self::Naver => "Naver",
        }
    }

    pub fn authorize_url(&self, config: &ApiConfig) -> String {
        config.site_url(&format!("/oauth2/authorization/{}", self.as_str()))
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OAuthProvider {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|provider| provider.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ApiError::Validation(format!("unknown sign-in provider: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_urls_skip_api_prefix() {
        let config = ApiConfig::new("https://blog.example.com").unwrap();
        assert_eq!(
            OAuthProvider::Kakao.authorize_url(&config),
            "https://blog.example.com/oauth2/authorization/kakao"
        );
        assert_eq!(
            OAuthProvider::Naver.authorize_url(&config),
            "https://blog.example.com/oauth2/authorization/naver"
        );
    }

    #[test]
    fn test_parse_provider() {
        assert_eq!("Google".parse::<OAuthProvider>().unwrap(), OAuthProvider::Google);
        assert!("github".parse::<OAuthProvider>().is_err());
    }
}
