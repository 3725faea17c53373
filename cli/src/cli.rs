//! # CLI Interface
//!
//! Defines the command-line argument structure for `utxo-tx` using `clap`
//! derive. Supports five subcommands: `decode`, `id`, `build`, `keygen`,
//! and `version`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::logging::LogFormat;

/// Build, sign, and inspect UTXO ledger transactions.
///
/// Transactions are exchanged as hex-encoded CBOR. Nothing is submitted to
/// the network; the output of `build` is meant for whatever submits it.
#[derive(Parser, Debug)]
#[command(
    name = "utxo-tx",
    about = "Build, sign, and inspect UTXO ledger transactions",
    version,
    propagate_version = true
)]
pub struct UtxoTxCli {
    /// Log output format. Logs go to stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode a hex transaction and print it as JSON.
    Decode(DecodeArgs),
    /// Print the ID of a hex transaction.
    Id(IdArgs),
    /// Build, balance, and sign a transaction from a JSON build plan.
    Build(BuildArgs),
    /// Generate a fresh Ed25519 key pair.
    Keygen,
    /// Print version information and exit.
    Version,
}

/// Arguments for the `decode` subcommand.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Hex-encoded transaction.
    pub tx: String,

    /// Also check every witness signature against the body.
    #[arg(long)]
    pub verify: bool,
}

/// Arguments for the `id` subcommand.
#[derive(Args, Debug)]
pub struct IdArgs {
    /// Hex-encoded transaction.
    pub tx: String,
}

/// Arguments for the `build` subcommand.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Path to the JSON build plan: protocol parameters, inputs, outputs,
    /// TTL, and either a change address or a fixed fee.
    #[arg(long, short = 'p', env = "UTXO_TX_PLAN")]
    pub plan: PathBuf,

    /// Print a JSON summary (id, fee, hex) instead of the bare hex.
    #[arg(long)]
    pub json: bool,
}
