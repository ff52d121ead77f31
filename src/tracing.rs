//! Log subscriber for the `rebel-highlight` binary
//!
//! Stderr gets `RUST_LOG` filtering (falling back to the level picked on
//! the command line), so span dumps on stdout stay machine readable:
//! - `RUST_LOG=debug` logs one line per batch
//! - `RUST_LOG=rebel_highlight::scheduler=trace` logs every block marked dirty
//!
//! A copy at debug level goes to `<config_dir>/logs/rebel-highlight.log`,
//! rotated daily. The library itself only emits events and never installs
//! a subscriber.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_FILE: &str = "rebel-highlight.log";

/// Console level used when `RUST_LOG` is unset
pub fn default_level(verbose: bool) -> &'static str {
    if verbose {
        "rebel_highlight=debug,info"
    } else {
        "warn"
    }
}

/// Install the console and file layers. Call once, before any batch runs.
pub fn init(verbose: bool) {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level(verbose))),
        );

    let file = crate::config_paths::ensure_logs_dir()
        .map(|dir| {
            fmt::layer()
                .with_writer(tracing_appender::rolling::daily(dir, LOG_FILE))
                .with_ansi(false)
                .with_line_number(true)
                .with_filter(EnvFilter::new("rebel_highlight=debug,warn"))
        })
        .map_err(|e| eprintln!("rebel-highlight: file logging disabled: {e}"))
        .ok();

    tracing_subscriber::registry().with(console).with(file).init();
}
