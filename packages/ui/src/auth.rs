//! Session context and auth widgets.

use std::sync::Arc;

use api::{OAuthProvider, Session};
use dioxus::prelude::*;

use crate::client::{load_config, make_client, Client};
use crate::navigation::RouterNavigator;

/// The current session. Updates whenever the client signs in or out,
/// including forced logouts triggered by any request.
pub fn use_auth() -> Signal<Session> {
    use_context::<Signal<Session>>()
}

pub fn use_client() -> Client {
    use_context::<Client>()
}

/// Builds the client, provides it with the session as context and resolves the
/// session once on mount. Wrap the router with this component.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let navigator = use_context_provider(RouterNavigator::new);
    let client = use_hook(move || {
        make_client(load_config(), Arc::new(navigator)).map_err(|e| e.to_string())
    });

    match client {
        Ok(client) => rsx! {
            SessionProvider { client, {children} }
        },
        Err(message) => {
            tracing::error!("cannot start API client: {message}");
            rsx! {
                div { class: "fatal-error", "Unable to start: {message}" }
            }
        }
    }
}

#[derive(Props, Clone)]
struct SessionProviderProps {
    client: Client,
    children: Element,
}

// The client is created once per provider, so only children decide re-renders.
impl PartialEq for SessionProviderProps {
    fn eq(&self, other: &Self) -> bool {
        self.children == other.children
    }
}

#[allow(non_snake_case)]
fn SessionProvider(props: SessionProviderProps) -> Element {
    let SessionProviderProps { client, children } = props;
    let client = use_context_provider(|| client);
    let mut session = use_context_provider(|| Signal::new(client.session().current()));

    // Mirror the store into the signal
    let mirror = client.clone();
    use_future(move || {
        let client = mirror.clone();
        async move {
            let mut changes = client.session().subscribe();
            session.set(changes.borrow_and_update().clone());
            while changes.changed().await.is_ok() {
                session.set(changes.borrow_and_update().clone());
            }
        }
    });

    use_future(move || {
        let client = client.clone();
        async move {
            client.initialize_session().await;
        }
    });

    rsx! {
        {children}
    }
}

/// Button that sends the browser to a social sign-in provider.
#[component]
pub fn LoginButton(
    provider: OAuthProvider,
    #[props(default = "".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let client = use_client();
    let mut loading = use_signal(|| false);
    let label = if label.is_empty() {
        format!("Continue with {}", provider.label())
    } else {
        label
    };

    let onclick = move |_| {
        let url = client.oauth_authorize_url(provider);
        loading.set(true);
        #[cfg(target_arch = "wasm32")]
        {
            let opened = web_sys::window().map(|window| window.location().set_href(&url));
            if !matches!(opened, Some(Ok(()))) {
                tracing::error!("failed to open {provider} sign-in");
                loading.set(false);
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            tracing::warn!("{provider} sign-in needs a browser: {url}");
            loading.set(false);
        }
    };

    rsx! {
        button {
            class: "{class}",
            disabled: loading(),
            onclick: onclick,
            if loading() {
                "Redirecting..."
            } else {
                "{label}"
            }
        }
    }
}

/// Button to log out the current user. The local session ends even if the
/// server cannot be reached.
#[component]
pub fn LogoutButton(
    #[props(default = "Log out".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let client = use_client();

    let onclick = move |_| {
        let client = client.clone();
        async move {
            if let Err(e) = client.logout().await {
                tracing::error!("logout: {e}");
            }
        }
    };

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            "{label}"
        }
    }
}
