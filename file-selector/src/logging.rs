//! Logging utilities
//!
//! The selector emits `tracing` events when the `tracing` feature is enabled
//! (default). Applications that do not install their own subscriber can call
//! [`init_tracing`] once at startup.

/// Initialize a tracing subscriber with sensible defaults.
///
/// Honors `RUST_LOG`; falls back to `info` for this crate and `warn` for everything else.
#[cfg(feature = "tracing")]
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "native_file_selector=info,warn".into());

    // A subscriber may already be installed by the host application.
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .try_init();
}

/// Initialize a tracing subscriber with a custom filter directive.
#[cfg(feature = "tracing")]
pub fn init_tracing_with_filter(filter: &str) {
    use tracing_subscriber::{EnvFilter, fmt};

    let _ = fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(true)
        .with_thread_ids(true)
        .try_init();
}

/// No-op without the `tracing` feature.
#[cfg(not(feature = "tracing"))]
pub fn init_tracing() {
    eprintln!("Warning: tracing feature not enabled, logging disabled");
}

/// No-op without the `tracing` feature.
#[cfg(not(feature = "tracing"))]
pub fn init_tracing_with_filter(_filter: &str) {
    eprintln!("Warning: tracing feature not enabled, logging disabled");
}

macro_rules! selector_trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::trace!($($arg)*);
    };
}

macro_rules! selector_debug {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::debug!($($arg)*);
    };
}

pub(crate) use {selector_debug, selector_trace};
