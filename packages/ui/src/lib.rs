//! This crate contains all shared UI for the workspace.

mod client;
pub use client::{load_config, make_client, make_storage, Client, PlatformStore};

mod navigation;
pub use navigation::{use_navigation_bridge, use_route_navigator, RouterNavigator};

mod auth;
pub use auth::{use_auth, use_client, AuthProvider, LoginButton, LogoutButton};

mod protected;
pub use protected::ProtectedRoute;

mod clock;
pub use clock::use_clock;
