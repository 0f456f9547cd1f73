//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time (run record timestamps)
//! - Logger installation
//! - Storage (LocalStorage on web)

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Install the logger for this platform
///
/// Safe to call more than once; later calls are ignored.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Install the logger for this platform
///
/// `RUST_LOG` controls verbosity, defaulting to `info`.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// The window's LocalStorage, if the browser grants it
#[cfg(target_arch = "wasm32")]
pub fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(now_ms() > 1_577_836_800_000.0);
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging();
        init_logging();
    }
}
