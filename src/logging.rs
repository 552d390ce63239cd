//! Diagnostic tracing for the CLI bridge.
//!
//! The library only emits events; installing a subscriber is the binary's job.
//! Output goes to stderr so stdout stays pure JSON.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`. Defaults to `warn` if unset.
///
/// # Example
/// ```bash
/// RUST_LOG=roomintake_core=debug roomintake-cli replay --events '[]'
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
