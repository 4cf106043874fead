//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Installs a stderr `fmt` subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level is `warn`, or `debug` for
/// the clamd crates with `--verbose`.
pub fn init(verbose: bool) {
    let default = if verbose {
        "warn,clamd=debug,clamd_proto=debug,clamctl=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
