//! Registration page with the email verification gate.

use std::time::Duration;

use api::models::JoinRequest;
use api::{EmailVerification, VerificationPhase};
use chrono::Utc;
use dioxus::prelude::*;
use ui::{use_client, use_clock};

use super::describe;
use crate::Route;

#[component]
pub fn Join() -> Element {
    let client = use_client();
    let now = use_clock(Duration::from_secs(1));
    let mut email = use_signal(String::new);
    let mut code = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);
    let mut verification = use_signal(EmailVerification::default);
    let mut error = use_signal(|| Option::<String>::None);
    let mut notice = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    // Pick up a code requested before a reload
    let restore_client = client.clone();
    use_future(move || {
        let client = restore_client.clone();
        async move {
            let restored = client.restore_verification().await;
            let address = restored
                .pending_email()
                .or(restored.verified_email())
                .map(str::to_string);
            if let Some(address) = address {
                email.set(address);
                verification.set(restored);
            }
        }
    });

    let phase = verification.read().phase(now());
    let countdown = verification.read().countdown(now());

    let send_client = client.clone();
    let send_code = move |_| {
        let client = send_client.clone();
        spawn(async move {
            error.set(None);
            match client.request_verification_code(email().trim(), Utc::now()).await {
                Ok(state) => {
                    verification.set(state);
                    code.set(String::new());
                    notice.set(Some("A verification code was sent to your email.".to_string()));
                }
                Err(e) => error.set(Some(describe(&e))),
            }
        });
    };

    let verify_client = client.clone();
    let verify_code = move |_| {
        let client = verify_client.clone();
        spawn(async move {
            error.set(None);
            let state = verification();
            match client
                .confirm_verification_code(&state, code().trim(), Utc::now())
                .await
            {
                Ok(verified) => {
                    verification.set(verified);
                    notice.set(Some("Email verified.".to_string()));
                }
                Err(e) => error.set(Some(describe(&e))),
            }
        });
    };

    let reset_client = client.clone();
    let mut forget_code = move || {
        verification.set(EmailVerification::Idle);
        let client = reset_client.clone();
        spawn(async move {
            client.save_verification(&EmailVerification::Idle).await;
        });
    };

    let handle_join = move |evt: FormEvent| {
        evt.prevent_default();
        let client = client.clone();
        spawn(async move {
            error.set(None);
            if password() != confirm_password() {
                error.set(Some("Passwords do not match".to_string()));
                return;
            }
            loading.set(true);
            let request = JoinRequest {
                email: email().trim().to_string(),
                password: password(),
            };
            // Navigates to the login page on success
            if let Err(e) = client.register(&request, &verification()).await {
                error.set(Some(describe(&e)));
            }
            loading.set(false);
        });
    };

    let verified = phase == VerificationPhase::Verified;

    rsx! {
        div {
            class: "auth-page",
            h1 { "Create account" }

            form {
                onsubmit: handle_join,
                class: "auth-form",

                if let Some(err) = error() {
                    div { class: "form-error", "{err}" }
                }
                if let Some(message) = notice() {
                    div { class: "form-notice", "{message}" }
                }

                div {
                    class: "inline-field",
                    input {
                        r#type: "email",
                        placeholder: "Email",
                        disabled: verified,
                        value: email(),
                        oninput: move |evt: FormEvent| {
                            email.set(evt.value());
                            // A different address needs its own code
                            if verification.read().pending_email() != Some(evt.value().trim())
                                && verification.read().verified_email() != Some(evt.value().trim())
                            {
                                forget_code();
                            }
                        },
                    }
                    button {
                        r#type: "button",
                        disabled: verified,
                        onclick: send_code,
                        if phase == VerificationPhase::Idle { "Send code" } else { "Resend code" }
                    }
                }

                if matches!(phase, VerificationPhase::Pending | VerificationPhase::Expired) {
                    div {
                        class: "inline-field",
                        input {
                            r#type: "text",
                            inputmode: "numeric",
                            maxlength: "6",
                            placeholder: "6-digit code",
                            value: code(),
                            oninput: move |evt: FormEvent| code.set(evt.value()),
                        }
                        if let Some(left) = countdown.clone() {
                            span { class: "countdown", "{left}" }
                        }
                        button {
                            r#type: "button",
                            disabled: phase == VerificationPhase::Expired,
                            onclick: verify_code,
                            "Verify"
                        }
                    }
                }
                if phase == VerificationPhase::Expired {
                    div { class: "form-error", "The code has expired. Request a new one." }
                }

                input {
                    r#type: "password",
                    placeholder: "Password",
                    value: password(),
                    oninput: move |evt: FormEvent| password.set(evt.value()),
                }
                input {
                    r#type: "password",
                    placeholder: "Confirm password",
                    value: confirm_password(),
                    oninput: move |evt: FormEvent| confirm_password.set(evt.value()),
                }

                button {
                    r#type: "submit",
                    disabled: loading() || !verified,
                    if loading() { "Creating account..." } else { "Sign up" }
                }
            }

            p {
                "Already have an account? "
                Link { to: Route::Login {}, "Sign in" }
            }
        }
    }
}
