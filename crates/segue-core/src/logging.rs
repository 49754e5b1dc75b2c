#![forbid(unsafe_code)]

//! Logging facade.
//!
//! With the `tracing` feature the usual macros are re-exported so call sites
//! can write `segue_core::debug!`. With `tracing-json` a JSON subscriber
//! honouring `RUST_LOG` can be installed once at startup.

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, error, info, trace, warn};

/// Install a global JSON subscriber filtered by `RUST_LOG`.
///
/// Falls back to `segue=info` when `RUST_LOG` is unset or unparsable.
/// Returns `false` if a global subscriber was already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_subscriber() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("segue=info"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .try_init()
        .is_ok()
}
