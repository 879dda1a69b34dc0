//! Router-backed [`api::Navigator`].
//!
//! The client runs outside the component tree, so it cannot call the Dioxus
//! router directly. [`RouterNavigator`] records the current route (fed by
//! [`use_navigation_bridge`]) and publishes navigation requests on a watch
//! channel that the bridge forwards to the router.

use std::sync::{Arc, Mutex};

use dioxus::prelude::*;
use tokio::sync::watch;

#[derive(Clone)]
pub struct RouterNavigator {
    current: Arc<Mutex<String>>,
    requests: Arc<watch::Sender<Option<String>>>,
}

impl Default for RouterNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl RouterNavigator {
    pub fn new() -> Self {
        let (requests, _) = watch::channel(None);
        Self {
            current: Arc::new(Mutex::new(api::navigation::HOME_ROUTE.to_string())),
            requests: Arc::new(requests),
        }
    }

    pub fn set_current(&self, path: &str) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if *current != path {
            *current = path.to_string();
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.requests.subscribe()
    }
}

impl api::Navigator for RouterNavigator {
    fn current_path(&self) -> Option<String> {
        Some(self.current.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn navigate(&self, path: &str) {
        self.set_current(path);
        self.requests.send_replace(Some(path.to_string()));
    }
}

pub fn use_route_navigator() -> RouterNavigator {
    use_context::<RouterNavigator>()
}

/// Keep the navigator in sync with the router. Call once from the layout that
/// wraps every route.
pub fn use_navigation_bridge(current_path: String) {
    let navigator = use_route_navigator();
    navigator.set_current(&current_path);

    let router = use_navigator();
    use_future(move || {
        let navigator = navigator.clone();
        async move {
            let mut requests = navigator.subscribe();
            while requests.changed().await.is_ok() {
                let target = requests.borrow_and_update().clone();
                if let Some(path) = target {
                    router.push(path);
                }
            }
        }
    });
}
