//! Password reset form reached from the emailed link.

use dioxus::prelude::*;
use ui::use_client;

use super::describe;
use crate::Route;

#[component]
pub fn ResetPassword(token: String) -> Element {
    let client = use_client();
    let router = use_navigator();
    let mut password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    if token.trim().is_empty() {
        return rsx! {
            div {
                class: "auth-page",
                p { class: "form-error", "This reset link is invalid." }
                Link { to: Route::FindPassword {}, "Request a new link" }
            }
        };
    }

    let handle_reset = move |evt: FormEvent| {
        evt.prevent_default();
        let client = client.clone();
        let token = token.clone();
        spawn(async move {
            error.set(None);
            if password() != confirm_password() {
                error.set(Some("Passwords do not match".to_string()));
                return;
            }
            loading.set(true);
            match client.reset_password(&token, &password()).await {
                Ok(()) => {
                    router.push(Route::Login {});
                }
                Err(e) => error.set(Some(describe(&e))),
            }
            loading.set(false);
        });
    };

    rsx! {
        div {
            class: "auth-page",
            h1 { "Choose a new password" }
            form {
                onsubmit: handle_reset,
                class: "auth-form",
                if let Some(err) = error() {
                    div { class: "form-error", "{err}" }
                }
                input {
                    r#type: "password",
                    placeholder: "New password",
                    value: password(),
                    oninput: move |evt: FormEvent| password.set(evt.value()),
                }
                input {
                    r#type: "password",
                    placeholder: "Confirm new password",
                    value: confirm_password(),
                    oninput: move |evt: FormEvent| confirm_password.set(evt.value()),
                }
                button {
                    r#type: "submit",
                    disabled: loading(),
                    "Reset password"
                }
            }
        }
    }
}
