// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # utxo-tx
//!
//! Entry point for the `utxo-tx` binary. Parses CLI arguments, initializes
//! logging, and dispatches to one of the subcommands:
//!
//! - `decode`  — decode a hex transaction and print it as JSON
//! - `id`      — print the ID of a hex transaction
//! - `build`   — draft, balance, and sign a transaction from a build plan
//! - `keygen`  — generate an Ed25519 key pair
//! - `version` — print build version information
//!
//! Command output goes to stdout, logs go to stderr.

mod cli;
mod logging;
mod plan;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;

use utxo_tx::crypto::Ed25519Keypair;
use utxo_tx::transaction::{verify_transaction, Transaction};

use cli::{Commands, UtxoTxCli};

fn main() -> Result<()> {
    let cli = UtxoTxCli::parse();
    logging::init_logging(logging::DEFAULT_FILTER, cli.log_format);

    match cli.command {
        Commands::Decode(args) => decode(args),
        Commands::Id(args) => print_id(args),
        Commands::Build(args) => build(args),
        Commands::Keygen => {
            keygen();
            Ok(())
        }
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

fn parse_tx(hex_str: &str) -> Result<Transaction> {
    Transaction::from_hex(hex_str).context("failed to decode transaction")
}

fn decode(args: cli::DecodeArgs) -> Result<()> {
    let tx = parse_tx(&args.tx)?;

    if args.verify {
        verify_transaction(&tx).context("witness verification failed")?;
        tracing::info!(witnesses = tx.witness_set.len(), "all witnesses verify");
    }

    let out = json!({
        "id": tx.id(),
        "signed": tx.is_signed(),
        "transaction": tx,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn print_id(args: cli::IdArgs) -> Result<()> {
    let tx = parse_tx(&args.tx)?;
    println!("{}", tx.id());
    Ok(())
}

fn build(args: cli::BuildArgs) -> Result<()> {
    let plan = plan::load(&args.plan)?;
    tracing::debug!(
        inputs = plan.inputs.len(),
        outputs = plan.outputs.len(),
        "build plan loaded"
    );
    let built = plan.execute()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&built)?);
    } else {
        println!("{}", built.hex);
    }
    Ok(())
}

/// Generates a key pair and prints the secret. The secret is the only copy.
fn keygen() {
    let key = Ed25519Keypair::generate();
    let public_key = key.public_key();
    println!("Secret key : {}", hex::encode(key.secret_key_bytes()));
    println!("Public key : {}", public_key.to_hex());
    println!("Key hash   : {}", public_key.key_hash());
}

fn print_version() {
    println!("{}", version_text());
}

/// Binary and library versions. Both are fixed at compile time.
fn version_text() -> String {
    format!(
        "utxo-tx     {}\nutxo-tx lib {}",
        env!("CARGO_PKG_VERSION"),
        utxo_tx::VERSION
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_text_has_no_placeholders() {
        let text = version_text();
        assert!(text.contains(env!("CARGO_PKG_VERSION")));
        assert!(text.contains(utxo_tx::VERSION));
        assert!(!text.contains("unknown"));
        assert_eq!(text.lines().count(), 2);
    }
}
