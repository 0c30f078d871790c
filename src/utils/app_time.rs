// src/utils/app_time.rs
// Monotonic clock used to time pending fetches; web_time keeps it usable in the browser.

#[cfg(not(target_arch = "wasm32"))]
pub type AppInstant = std::time::Instant;

#[cfg(target_arch = "wasm32")]
pub type AppInstant = web_time::Instant;

#[cfg(not(target_arch = "wasm32"))]
pub fn now() -> AppInstant {
    std::time::Instant::now()
}

#[cfg(target_arch = "wasm32")]
pub fn now() -> AppInstant {
    web_time::Instant::now()
}

/// Milliseconds elapsed since `since`, saturating at `u64::MAX`.
pub fn elapsed_ms(since: AppInstant) -> u64 {
    u64::try_from(since.elapsed().as_millis()).unwrap_or(u64::MAX)
}
