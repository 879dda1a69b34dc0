//! Signed-in user's page: profile summary and profile editing.

use api::models::UserUpdateRequest;
use api::SessionStatus;
use dioxus::prelude::*;
use ui::{use_auth, use_client, LogoutButton};

use super::describe;

#[component]
pub fn MyPage() -> Element {
    let client = use_client();
    let session = use_auth();
    let mut name = use_signal(String::new);
    let mut bio = use_signal(String::new);
    let mut message = use_signal(|| Option::<String>::None);

    let Some(user) = (match session.read().status() {
        SessionStatus::Authenticated(user) => Some(user.clone()),
        _ => None,
    }) else {
        return rsx! {};
    };

    let username = user.username.clone();
    let handle_save = move |evt: FormEvent| {
        evt.prevent_default();
        let client = client.clone();
        let username = username.clone();
        spawn(async move {
            let update = UserUpdateRequest {
                name: Some(name()).filter(|n| !n.trim().is_empty()),
                bio: Some(bio()).filter(|b| !b.trim().is_empty()),
                ..Default::default()
            };
            match client.update_profile(&username, &update).await {
                Ok(_) => message.set(Some("Profile updated.".to_string())),
                Err(e) => message.set(Some(describe(&e))),
            }
        });
    };

    rsx! {
        section {
            class: "my-page",
            img { src: "{user.profile_image()}", alt: "profile image", width: "96" }
            h1 { "{user.display_name()}" }
            p { "@{user.username} · {user.email}" }
            if let Some(bio) = user.bio.as_deref() {
                p { class: "bio", "{bio}" }
            }

            form {
                onsubmit: handle_save,
                class: "auth-form",
                if let Some(text) = message() {
                    div { class: "form-notice", "{text}" }
                }
                input {
                    r#type: "text",
                    placeholder: "Name",
                    value: name(),
                    oninput: move |evt: FormEvent| name.set(evt.value()),
                }
                textarea {
                    placeholder: "Bio",
                    value: bio(),
                    oninput: move |evt: FormEvent| bio.set(evt.value()),
                }
                button { r#type: "submit", "Save" }
            }

            LogoutButton {}
        }
    }
}
