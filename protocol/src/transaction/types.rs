//! Core entities of a ledger transaction.
//!
//! The structs here are plain values: they own their data, compare
//! structurally, and are never mutated after the builder hands them out.
//! Their wire form lives in [`super::codec`]; their field order below is the
//! wire order, so do not reorder fields without also touching the codec.
//!
//! Optional protocol features this version does not support (certificates,
//! transaction metadata) are modelled with uninhabited types. The fields
//! exist so the shape matches the ledger, but no value can ever be put in
//! them, which keeps "always absent" a compile-time fact.

use serde::{Deserialize, Serialize};

use super::error::TransactionError;
use crate::config::HASH_LENGTH;
use crate::crypto::{PublicKey, Signature};

// ---------------------------------------------------------------------------
// TransactionId
// ---------------------------------------------------------------------------

/// BLAKE2b-256 digest of a body's canonical encoding.
///
/// Displays and parses as 64 lowercase hex characters. Computing it twice
/// from an unchanged body always yields the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionId([u8; HASH_LENGTH]);

hex_bytes_newtype!(
    TransactionId,
    HASH_LENGTH,
    TransactionError,
    TransactionError::malformed("transaction id must be 32 bytes of hex")
);

// ---------------------------------------------------------------------------
// Inputs & outputs
// ---------------------------------------------------------------------------

/// A reference to exactly one unspent output of an earlier transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionInput {
    /// ID of the transaction that created the output.
    pub transaction_id: TransactionId,
    /// Position of the output within that transaction.
    pub index: u64,
}

impl TransactionInput {
    pub fn new(transaction_id: TransactionId, index: u64) -> Self {
        Self {
            transaction_id,
            index,
        }
    }
}

/// Value locked to an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutput {
    /// Opaque address bytes. Their structure is the address layer's business.
    #[serde(with = "hex::serde")]
    pub address: Vec<u8>,
    /// Amount in the ledger's indivisible base unit.
    pub amount: u64,
}

impl TransactionOutput {
    pub fn new(address: Vec<u8>, amount: u64) -> Self {
        Self { address, amount }
    }
}

/// A delegation or registration certificate.
///
/// Not supported in this version; no value of this type can exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Certificate {}

/// Auxiliary transaction metadata.
///
/// Not supported in this version; no value of this type can exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metadata {}

// ---------------------------------------------------------------------------
// TransactionBody
// ---------------------------------------------------------------------------

/// The unsigned part of a transaction, and the preimage of its ID.
///
/// Inputs and outputs keep insertion order. Withdrawals, update proposals,
/// and the metadata hash are always absent in this version and therefore
/// have no field at all; the codec refuses them on decode.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransactionBody {
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub fee: u64,
    /// Last slot in which the transaction may be included.
    pub ttl: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certificates: Vec<Certificate>,
}

impl TransactionBody {
    /// Sum of all output amounts, or `None` on overflow.
    pub fn output_total(&self) -> Option<u64> {
        self.outputs
            .iter()
            .try_fold(0u64, |acc, out| acc.checked_add(out.amount))
    }
}

// ---------------------------------------------------------------------------
// Witnesses
// ---------------------------------------------------------------------------

/// A verification key and its signature over the transaction ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VKeyWitness {
    pub vkey: PublicKey,
    pub signature: Signature,
}

impl VKeyWitness {
    pub fn new(vkey: PublicKey, signature: Signature) -> Self {
        Self { vkey, signature }
    }
}

/// Witnesses authorizing a transaction, in signing order.
///
/// Duplicates are kept as given; it is the producer's job not to add them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WitnessSet {
    pub vkey_witnesses: Vec<VKeyWitness>,
}

impl WitnessSet {
    pub fn new(vkey_witnesses: Vec<VKeyWitness>) -> Self {
        Self { vkey_witnesses }
    }

    pub fn is_empty(&self) -> bool {
        self.vkey_witnesses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.vkey_witnesses.len()
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A body together with the witnesses that authorize it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub body: TransactionBody,
    pub witness_set: WitnessSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl Transaction {
    pub fn new(body: TransactionBody, witness_set: WitnessSet) -> Self {
        Self {
            body,
            witness_set,
            metadata: None,
        }
    }

    /// Whether the transaction carries at least one witness.
    pub fn is_signed(&self) -> bool {
        !self.witness_set.is_empty()
    }
}
