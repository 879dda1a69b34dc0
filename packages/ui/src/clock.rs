//! Wall-clock signal for countdowns.

use std::time::Duration;

use chrono::{DateTime, Utc};
use dioxus::prelude::*;

/// Current time, refreshed every `period`. Countdowns derive their value from
/// this and an absolute deadline, so a throttled timer only delays the display.
pub fn use_clock(period: Duration) -> Signal<DateTime<Utc>> {
    let mut now = use_signal(Utc::now);

    use_future(move || async move {
        loop {
            #[cfg(target_arch = "wasm32")]
            gloo_timers::future::sleep(period).await;
            #[cfg(not(target_arch = "wasm32"))]
            tokio::time::sleep(period).await;

            now.set(Utc::now());
        }
    });

    now
}
