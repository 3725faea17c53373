//! # Build Plans
//!
//! A build plan is a JSON document describing one transaction: the protocol
//! parameters in force, the already-selected inputs (optionally with the
//! hex secret key that signs for them), the outputs, the TTL, and how to
//! settle the fee.
//!
//! ```json
//! {
//!   "params": { "minimum_utxo_value": 1000000, "min_fee_a": 44, "min_fee_b": 155381 },
//!   "inputs": [
//!     { "transaction_id": "2432fc62...", "index": 0, "amount": 20982558002,
//!       "signing_key": "0101..." }
//!   ],
//!   "outputs": [ { "address": "addr_test1...", "amount": 10000000000 } ],
//!   "ttl": 39851191,
//!   "change_address": "addr_test1..."
//! }
//! ```
//!
//! Addresses are bech32 strings or raw hex. Exactly one of `change_address`
//! (balance with change) and `fee` (fixed fee, no change) must be given.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use utxo_tx::config::ProtocolParams;
use utxo_tx::crypto::Ed25519Keypair;
use utxo_tx::transaction::{Bech32Address, FeeBalance, Transaction, TransactionId, TxBuilder};

/// One input of a build plan.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanInput {
    pub transaction_id: TransactionId,
    pub index: u64,
    pub amount: u64,
    /// Hex secret key controlling the spent output. Inputs without one are
    /// added unsigned.
    #[serde(default)]
    pub signing_key: Option<String>,
}

/// One output of a build plan.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanOutput {
    pub address: String,
    pub amount: u64,
}

/// A complete build plan.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildPlan {
    pub params: ProtocolParams,
    pub inputs: Vec<PlanInput>,
    pub outputs: Vec<PlanOutput>,
    pub ttl: u64,
    #[serde(default)]
    pub change_address: Option<String>,
    #[serde(default)]
    pub fee: Option<u64>,
}

/// What `build` prints with `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct BuiltTransaction {
    pub id: TransactionId,
    pub fee: u64,
    pub witnesses: usize,
    pub hex: String,
    #[serde(skip)]
    pub transaction: Transaction,
}

/// Read and parse a plan file.
pub fn load(path: &Path) -> Result<BuildPlan> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read build plan {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse build plan {}", path.display()))
}

/// Decode an address given as bech32 or as raw hex.
pub fn parse_address(s: &str) -> Result<Vec<u8>> {
    use utxo_tx::transaction::Address;

    if let Ok(addr) = Bech32Address::parse(s) {
        return Ok(addr.to_bytes());
    }
    match hex::decode(s) {
        Ok(bytes) if !bytes.is_empty() => Ok(bytes),
        _ => bail!("address {s:?} is neither bech32 nor hex"),
    }
}

impl BuildPlan {
    /// Draft, balance, and sign the planned transaction.
    pub fn execute(&self) -> Result<BuiltTransaction> {
        let mut builder = TxBuilder::new(self.params);
        let mut keys = Vec::new();

        for (position, input) in self.inputs.iter().enumerate() {
            match &input.signing_key {
                Some(secret) => {
                    let key = Ed25519Keypair::from_hex(secret)
                        .with_context(|| format!("input {position}: bad signing key"))?;
                    builder.add_input(key.public_key(), input.transaction_id, input.index, input.amount);
                    keys.push(key);
                }
                None => {
                    builder.add_input_without_sig(input.transaction_id, input.index, input.amount);
                }
            }
        }

        for (position, output) in self.outputs.iter().enumerate() {
            let address = parse_address(&output.address)
                .with_context(|| format!("output {position}"))?;
            builder.add_output(&address, output.amount);
        }
        builder.set_ttl(self.ttl);

        match (&self.change_address, self.fee) {
            (Some(change), None) => {
                let change = parse_address(change).context("change address")?;
                let balance = builder.add_fee(&change)?;
                match balance {
                    FeeBalance::Exact => tracing::info!("inputs match outputs plus fee exactly"),
                    FeeBalance::Burned { dust } => {
                        tracing::warn!(dust, "change below minimum output value, added to fee")
                    }
                    FeeBalance::Change { amount } => tracing::info!(amount, "change output added"),
                }
            }
            (None, Some(fee)) => {
                builder.set_fee(fee);
            }
            (Some(_), Some(_)) => bail!("plan sets both change_address and fee"),
            (None, None) => bail!("plan sets neither change_address nor fee"),
        }

        for key in keys {
            builder.sign(key);
        }
        let transaction = builder.build()?;
        let id = transaction.id();
        tracing::info!(%id, fee = transaction.body.fee, "transaction built");

        Ok(BuiltTransaction {
            id,
            fee: transaction.body.fee,
            witnesses: transaction.witness_set.len(),
            hex: transaction.to_hex(),
            transaction,
        })
    }
}
