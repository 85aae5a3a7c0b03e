#![forbid(unsafe_code)]

//! Structured logging hooks.
//!
//! With the `tracing` feature the detector logs state transitions at debug
//! level and every emitted gesture at trace level, under the
//! `xgesture_core::detector` target. Without it, logging compiles away.
//!
//! The `tracing-json` feature adds [`json_subscriber`], a ready-made
//! line-delimited JSON subscriber filtered by `RUST_LOG`.

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Build a JSON subscriber honouring `RUST_LOG`, defaulting to `info`.
///
/// Install it with `tracing::subscriber::set_global_default`.
#[cfg(feature = "tracing-json")]
#[must_use]
pub fn json_subscriber() -> impl tracing::Subscriber + Send + Sync + 'static {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(true)
        .finish()
}
