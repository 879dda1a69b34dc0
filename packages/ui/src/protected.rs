//! Route guard for pages that need a session.

use api::navigation::LOGIN_ROUTE;
use api::{is_public_route, SessionStatus};
use dioxus::prelude::*;

use crate::auth::use_auth;

/// Renders `children` for public routes and for signed-in users. Anonymous
/// visitors of any other route are sent to the login page; while the session is
/// still being resolved nothing but a placeholder is rendered.
#[component]
pub fn ProtectedRoute(path: String, children: Element) -> Element {
    let session = use_auth();
    let router = use_navigator();

    use_effect(use_reactive!(|(path)| {
        let anonymous = session.read().status() == SessionStatus::Anonymous;
        if anonymous && !is_public_route(&path) {
            router.replace(LOGIN_ROUTE.to_string());
        }
    }));

    if is_public_route(&path) {
        return children;
    }
    let (loading, signed_in) = {
        let session = session.read();
        (session.is_loading(), session.is_authenticated())
    };
    if signed_in {
        children
    } else if loading {
        rsx! {
            div { class: "session-loading", "Loading..." }
        }
    } else {
        rsx! {}
    }
}
