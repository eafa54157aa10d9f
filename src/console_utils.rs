//! Logging setup shared by the binaries.

use clap_verbosity_flag::{InfoLevel, Verbosity, VerbosityFilter};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the tracing subscriber.
///
/// Everything goes to stderr: Meson consumes these tools' stdout (the
/// `check`/`skip` token and the version string).
pub fn init_logging(verbosity: &Verbosity<InfoLevel>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| get_default_env_filter(verbosity.filter()));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();
}

/// Constructs a default [`EnvFilter`] that is used when the user did not
/// specify a custom `RUST_LOG`.
pub fn get_default_env_filter(verbose: VerbosityFilter) -> EnvFilter {
    let level = match verbose {
        VerbosityFilter::Off => "off",
        VerbosityFilter::Error => "error",
        VerbosityFilter::Warn => "warn",
        VerbosityFilter::Info => "info",
        VerbosityFilter::Debug => "debug",
        VerbosityFilter::Trace => "trace",
    };
    EnvFilter::new(format!("meson_cargo_glue={level}"))
}
