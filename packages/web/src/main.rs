use api::SessionStatus;
use dioxus::prelude::*;

use ui::{AuthProvider, LogoutButton, ProtectedRoute};
use views::{FindPassword, Home, Join, Login, MyPage, Profile, ResetPassword};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Shell)]
        #[route("/")]
        Home {},
        #[route("/login")]
        Login {},
        #[route("/join")]
        Join {},
        #[route("/find-password")]
        FindPassword {},
        #[route("/reset-password?:token")]
        ResetPassword { token: String },
        #[route("/mypage")]
        MyPage {},
        #[route("/:username")]
        Profile { username: String },
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        use tracing_subscriber::EnvFilter;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,api=debug")),
            )
            .init();
    }

    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        AuthProvider {
            Router::<Route> {}
        }
    }
}

/// Header plus the route guard around every page.
#[component]
fn Shell() -> Element {
    let path = use_route::<Route>().to_string();
    ui::use_navigation_bridge(path.clone());
    let session = ui::use_auth();

    let account = match session.read().status() {
        SessionStatus::Loading => rsx! { span { class: "spinner", "Loading" } },
        SessionStatus::Authenticated(user) => rsx! {
            span { "Welcome, {user.display_name()}" }
            Link { to: Route::Profile { username: user.username.clone() }, "Profile" }
            Link { to: Route::MyPage {}, "My page" }
            LogoutButton {}
        },
        SessionStatus::Anonymous => rsx! {
            Link { to: Route::Login {}, "Log in" }
            Link { to: Route::Join {}, "Sign up" }
        },
    };

    rsx! {
        header {
            class: "site-header",
            Link { to: Route::Home {}, class: "brand", "Blog" }
            nav { {account} }
        }
        main {
            ProtectedRoute { path, Outlet::<Route> {} }
        }
    }
}
