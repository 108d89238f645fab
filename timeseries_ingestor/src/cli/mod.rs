pub mod commands;
pub mod params;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the stderr tracing subscriber.
/// Uses the RUST_LOG env var for filtering (defaults to info).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
