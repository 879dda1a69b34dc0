//! Navigation seam between the client and whatever hosts it.
//!
//! The Request Client has to send the user to the login entry point when a
//! session ends, and has to know the current route to remember where to return
//! afterwards. Browsers implement [`Navigator`] on `window.location`; native
//! hosts and tests use [`HistoryNavigator`].

use std::sync::{Arc, Mutex, MutexGuard};
use std::sync::LazyLock;

use regex::Regex;

pub const LOGIN_ROUTE: &str = "/login";
pub const HOME_ROUTE: &str = "/";

/// Storage key of the route to return to after signing in.
pub const REDIRECT_AFTER_LOGIN_KEY: &str = "redirectAfterLogin";

pub trait Navigator: Send + Sync {
    /// Path of the current route, e.g. `/posts/3`.
    fn current_path(&self) -> Option<String>;

    fn navigate(&self, path: &str);
}

/// Send the user to the login entry point unless they are already there.
pub fn redirect_to_login(navigator: &dyn Navigator) -> bool {
    if navigator.current_path().as_deref() == Some(LOGIN_ROUTE) {
        return false;
    }
    navigator.navigate(LOGIN_ROUTE);
    true
}

/// In-memory navigator that records every navigation.
#[derive(Clone, Debug, Default)]
pub struct HistoryNavigator {
    history: Arc<Mutex<Vec<String>>>,
}

impl HistoryNavigator {
    pub fn new(start: &str) -> Self {
        Self {
            history: Arc::new(Mutex::new(vec![start.to_string()])),
        }
    }

    /// Every path visited, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Number of navigations to `path` after the start route.
    pub fn visits(&self, path: &str) -> usize {
        self.lock().iter().skip(1).filter(|p| *p == path).count()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.history.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Navigator for HistoryNavigator {
    fn current_path(&self) -> Option<String> {
        self.lock().last().cloned()
    }

    fn navigate(&self, path: &str) {
        tracing::debug!("navigate to {path}");
        self.lock().push(path.to_string());
    }
}

static PUBLIC_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^/$",
        r"^/login$",
        r"^/join$",
        r"^/find-password$",
        r"^/reset-password$",
        r"^/posts/\d+$",
        r"^/posts/grid$",
        r"^/posts/list$",
        r"^/[^/]+$",
        r"^/[^/]+/posts$",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Whether `path` can be shown without a session.
pub fn is_public_route(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    PUBLIC_PATTERNS.iter().any(|re| re.is_match(path))
}

/// Shared handle used by the client.
pub type SharedNavigator = Arc<dyn Navigator>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_routes() {
        for path in [
            "/",
            "/login",
            "/join",
            "/posts/42",
            "/posts/grid",
            "/posts/list",
            "/alice",
            "/alice/posts",
        ] {
            assert!(is_public_route(path), "{path} should be public");
        }
        for path in ["/posts/new", "/posts/3/edit", "/mypage/edit", "/alice/edit", "/alice/likes"] {
            assert!(!is_public_route(path), "{path} should be protected");
        }
        assert!(is_public_route("/posts/42?tab=comments"));
    }

    #[test]
    fn test_redirect_to_login_is_idempotent() {
        let nav = HistoryNavigator::new("/mypage");
        assert!(redirect_to_login(&nav));
        assert!(!redirect_to_login(&nav));
        assert_eq!(nav.visits(LOGIN_ROUTE), 1);
        assert_eq!(nav.history(), vec!["/mypage".to_string(), "/login".to_string()]);
    }
}
