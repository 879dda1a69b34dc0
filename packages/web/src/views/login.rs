//! Login page: username/password form plus social sign-in.

use api::models::LoginRequest;
use api::navigation::HOME_ROUTE;
use api::OAuthProvider;
use dioxus::prelude::*;
use ui::{use_auth, use_client, LoginButton};

use super::describe;
use crate::Route;

#[component]
pub fn Login() -> Element {
    let client = use_client();
    let session = use_auth();
    let router = use_navigator();
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut remember = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    // Already signed in
    use_effect(move || {
        if session.read().is_authenticated() && !loading() {
            router.replace(Route::Home {});
        }
    });

    let handle_login = move |evt: FormEvent| {
        evt.prevent_default();
        let client = client.clone();
        spawn(async move {
            error.set(None);
            loading.set(true);
            let request = LoginRequest::new(username().trim(), password()).remember(remember());
            match client.login(&request).await {
                Ok(_) => {
                    let target = client
                        .take_redirect_target()
                        .await
                        .unwrap_or_else(|| HOME_ROUTE.to_string());
                    router.push(target);
                }
                Err(e) => {
                    error.set(Some(describe(&e)));
                    loading.set(false);
                }
            }
        });
    };

    rsx! {
        div {
            class: "auth-page",
            h1 { "Sign in" }

            form {
                onsubmit: handle_login,
                class: "auth-form",

                if let Some(err) = error() {
                    div { class: "form-error", "{err}" }
                }

                input {
                    r#type: "text",
                    placeholder: "Username",
                    value: username(),
                    oninput: move |evt: FormEvent| username.set(evt.value()),
                }
                input {
                    r#type: "password",
                    placeholder: "Password",
                    value: password(),
                    oninput: move |evt: FormEvent| password.set(evt.value()),
                }
                label {
                    input {
                        r#type: "checkbox",
                        checked: remember(),
                        onchange: move |evt: FormEvent| remember.set(evt.checked()),
                    }
                    "Keep me signed in"
                }
                button {
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Signing in..." } else { "Sign in" }
                }
            }

            div {
                class: "social-login",
                for provider in OAuthProvider::ALL {
                    LoginButton { key: "{provider}", provider, class: "social-btn {provider}" }
                }
            }

            p {
                Link { to: Route::FindPassword {}, "Forgot your password?" }
                " · "
                Link { to: Route::Join {}, "Create an account" }
            }
        }
    }
}
