/// Conditional console logging for development builds
///
/// The `log!` macro traces the diagram pipeline (walk steps, cache hits,
/// reconstruction timing) and is compiled out of release builds by default.
/// Warnings and errors go through `leptos::logging::warn!` and
/// `leptos::logging::error!` so they survive release builds.
///
/// Logging is enabled when either:
/// - Building in debug mode (`cfg(debug_assertions)`)
/// - The `console_logging` feature is explicitly enabled
///
/// # Examples
///
/// ```rust
/// use edr_graph::log;
/// # let station_id = "8000105";
/// # let duration = 1.5_f64;
///
/// log!("Walking forward from {}", station_id);
/// log!("Reconstruction took {:.2}ms", duration);
/// ```
/// Conditionally log to the browser console
///
/// On wasm this expands to `web_sys::console::log_1()`. Native builds (tests,
/// benches) have no console to write to, so the arguments are only
/// type-checked.
#[macro_export]
macro_rules! log {
    ($($arg:expr),+ $(,)?) => {
        #[cfg(all(target_arch = "wasm32", any(debug_assertions, feature = "console_logging")))]
        {
            web_sys::console::log_1(&format!($($arg),+).into());
        }
        #[cfg(not(all(target_arch = "wasm32", any(debug_assertions, feature = "console_logging"))))]
        {
            let _ = || format!($($arg),+);
        }
    };
}

pub use log;
