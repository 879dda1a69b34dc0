//! Public profile page.

use dioxus::prelude::*;
use ui::use_client;

use super::describe;

#[component]
pub fn Profile(username: String) -> Element {
    let client = use_client();

    let profile = use_resource(use_reactive!(|(username)| {
        let client = client.clone();
        async move { client.fetch_profile(&username).await }
    }));

    let view = match &*profile.read() {
        None => rsx! { p { "Loading..." } },
        Some(Err(e)) => {
            let text = describe(e);
            rsx! { p { class: "form-error", "{text}" } }
        }
        Some(Ok(profile)) => rsx! {
            section {
                class: "profile",
                img { src: "{profile.profile_image()}", alt: "profile image", width: "96" }
                h1 { "{profile.name}" }
                p { "@{profile.username} · joined {profile.created_at}" }
                if let Some(bio) = profile.bio.as_deref() {
                    p { class: "bio", "{bio}" }
                }
            }
        },
    };
    view
}
