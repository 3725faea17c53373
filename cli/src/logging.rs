//! Logging setup for the `utxo-tx` binary.
//!
//! Events from the library (fee branches, min-fee measurements, witness
//! production) and from the binary go through one `tracing` subscriber.
//! Everything is written to stderr: stdout carries only command output
//! (hex transactions, JSON) so it can be piped.

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "utxo_tx=info,utxo_tx_cli=info";

/// Log output format, selected with `--log-format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Install the global subscriber. Must run once, before any event is emitted.
///
/// `RUST_LOG` takes precedence over `default_filter`:
///
/// ```text
/// RUST_LOG=utxo_tx=trace utxo-tx build --plan plan.json
/// ```
pub fn init_logging(default_filter: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }

    tracing::debug!(?format, "logging initialized");
}
