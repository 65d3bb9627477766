//! Logging setup for the binary.
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! application's job. `RUST_LOG` wins when set, otherwise the `-v` count
//! picks the level for this crate.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Default filter directive for a verbosity count.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "book_catalog=warn",
        1 => "book_catalog=info",
        2 => "book_catalog=debug",
        _ => "book_catalog=trace",
    }
}

/// Install a stderr subscriber. Safe to call more than once; later calls
/// are no-ops.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
