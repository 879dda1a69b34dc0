//! Front page: all posts with offset pagination.

use api::models::PageWindow;
use api::posts::DEFAULT_PAGE_SIZE;
use dioxus::prelude::*;
use ui::use_client;

use super::describe;
use crate::Route;

#[component]
pub fn Home() -> Element {
    let client = use_client();
    let mut page = use_signal(|| 0u32);

    let posts = use_resource(move || {
        let client = client.clone();
        async move { client.posts().list_page(page(), DEFAULT_PAGE_SIZE).await }
    });

    let body = match &*posts.read() {
        None => rsx! { p { "Loading posts..." } },
        Some(Err(e)) => {
            let text = describe(e);
            rsx! { p { class: "form-error", "{text}" } }
        }
        Some(Ok(result)) => {
            let window =
                PageWindow::new(result.number, result.total_pages, PageWindow::DEFAULT_GROUP);
            rsx! {
                ul {
                    class: "post-list",
                    for post in result.content.iter() {
                        li {
                            key: "{post.id}",
                            span { class: "post-title", "{post.title}" }
                            " by "
                            Link { to: Route::Profile { username: post.user.username.clone() }, "{post.user.name}" }
                            span { class: "post-meta", " · {post.likes} likes · {post.comment_count} comments" }
                        }
                    }
                }
                nav {
                    class: "pagination",
                    if let Some(previous) = window.previous_group {
                        button { onclick: move |_| page.set(previous), "«" }
                    }
                    for number in window.pages.clone() {
                        button {
                            key: "{number}",
                            class: if number == result.number { "current" } else { "" },
                            onclick: move |_| page.set(number),
                            {(number + 1).to_string()}
                        }
                    }
                    if let Some(next) = window.next_group {
                        button { onclick: move |_| page.set(next), "»" }
                    }
                }
            }
        }
    };

    rsx! {
        section {
            h1 { "Latest posts" }
            {body}
        }
    }
}
