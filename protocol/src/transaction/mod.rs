//! # Transaction Module
//!
//! The transaction data model, its canonical encoding, and everything needed
//! to turn a set of already-selected UTXOs into a balanced, signed
//! transaction.
//!
//! ## Architecture
//!
//! ```text
//! types.rs        — Inputs, outputs, body, witnesses, transaction
//! codec.rs        — Canonical CBOR encode/decode and the BLAKE2b-256 ID
//! address.rs      — The Address seam and a bech32 implementation
//! utxo.rs         — UTXOs picked by an external selection step
//! builder.rs      — TxBuilder: draft state, fee/change algorithm, build
//! signing.rs      — Witness production and externally supplied signatures
//! verification.rs — Witness signature checks
//! error.rs        — TransactionError
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Draft**: add inputs, outputs, and a TTL to a [`TxBuilder`].
//! 2. **Balance**: [`TxBuilder::add_fee`] sets the fee and adds change.
//! 3. **Sign**: register signers, then [`TxBuilder::build`]; or finalise and
//!    attach external signatures with [`TxBuilder::add_signatures`].
//! 4. **Ship**: [`Transaction::to_hex`] is the interchange form;
//!    [`decode_transaction`] reads it back.
//!
//! ## Invariants
//!
//! - The ID is BLAKE2b-256 over the body encoding only. Witnesses and
//!   metadata never change it.
//! - Encoding is deterministic: equal values produce identical bytes.
//! - A built transaction conserves value: inputs equal outputs plus fee.
//! - Amounts are `u64` in the smallest unit; sums are checked.

pub mod address;
pub mod builder;
pub mod codec;
pub mod error;
pub mod signing;
pub mod types;
pub mod utxo;
pub mod verification;

pub use address::{Address, AddressError, Bech32Address};
pub use builder::{DraftInput, FeeBalance, TxBuilder};
pub use codec::{decode_transaction, encode_transaction};
pub use error::TransactionError;
pub use signing::{sign_body, sign_id};
pub use types::{
    Certificate, Metadata, Transaction, TransactionBody, TransactionId, TransactionInput,
    TransactionOutput, VKeyWitness, WitnessSet,
};
pub use utxo::Utxo;
pub use verification::verify_transaction;
