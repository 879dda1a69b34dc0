use dioxus::prelude::*;
use ui::use_client;

use super::describe;
use crate::Route;

#[component]
pub fn FindPassword() -> Element {
    let client = use_client();
    let mut email = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut sent = use_signal(|| false);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let client = client.clone();
        spawn(async move {
            error.set(None);
            match client.request_password_reset(email().trim()).await {
                Ok(()) => sent.set(true),
                Err(e) => error.set(Some(describe(&e))),
            }
        });
    };

    rsx! {
        div {
            class: "auth-page",
            h1 { "Reset your password" }

            if sent() {
                p { "A password reset link was sent to your email." }
            } else {
                form {
                    onsubmit: handle_submit,
                    class: "auth-form",
                    if let Some(err) = error() {
                        div { class: "form-error", "{err}" }
                    }
                    input {
                        r#type: "email",
                        placeholder: "Email",
                        value: email(),
                        oninput: move |evt: FormEvent| email.set(evt.value()),
                    }
                    button { r#type: "submit", "Send reset link" }
                }
            }

            Link { to: Route::Login {}, "Back to sign in" }
        }
    }
}
