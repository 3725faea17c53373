//! Errors surfaced by the transaction model, codec, and builder.
//!
//! Every failure is a typed value; nothing in this module tree panics on
//! caller input. Builder operations that fail leave the draft untouched, so
//! the caller can fix the input and retry.

use thiserror::Error;

/// Errors that can occur while encoding, building, or signing a transaction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransactionError {
    /// The byte stream (or its hex rendering) is not a valid encoding.
    #[error("malformed encoding: {reason}")]
    MalformedEncoding { reason: String },

    /// Inputs cannot cover the outputs plus the minimum fee.
    #[error("insufficient input: have {available}, need {required}")]
    InsufficientInput { available: u64, required: u128 },

    /// Summing input or output amounts overflowed a 64-bit quantity.
    #[error("amount overflow while summing {what}")]
    AmountOverflow { what: &'static str },

    /// Registered signing keys do not match registered verification keys.
    #[error(
        "incomplete signature set: {missing} verification key(s) without a signer, \
         {unexpected} signer(s) without a verification key"
    )]
    IncompleteSignatureSet { missing: usize, unexpected: usize },

    /// `add_signatures` received arrays whose lengths disagree.
    #[error(
        "length mismatch: {public_keys} public key(s), {signatures} signature(s), {inputs} input(s)"
    )]
    LengthMismatch {
        public_keys: usize,
        signatures: usize,
        inputs: usize,
    },

    /// A supplied signature is not exactly 64 bytes.
    #[error("invalid signature length at position {index}: {length} bytes")]
    InvalidSignatureLength { index: usize, length: usize },

    /// A supplied public key is not exactly 32 bytes.
    #[error("invalid public key length at position {index}: {length} bytes")]
    InvalidPublicKeyLength { index: usize, length: usize },

    /// The same public key was supplied for more than one input.
    #[error("duplicate witness key at position {index}; one key per input is required here")]
    DuplicateWitness { index: usize },

    /// The body cannot be finalized because no fee was set or computed.
    #[error("fee is not set")]
    FeeNotSet,

    /// The body cannot be finalized because the TTL is zero.
    #[error("ttl is not set")]
    TtlNotSet,

    /// A witness signature does not verify against the body hash.
    #[error("witness {index} does not verify against the transaction body")]
    InvalidWitness { index: usize },
}

impl TransactionError {
    pub(crate) fn malformed(reason: impl ToString) -> Self {
        Self::MalformedEncoding {
            reason: reason.to_string(),
        }
    }
}

impl From<minicbor::decode::Error> for TransactionError {
    fn from(err: minicbor::decode::Error) -> Self {
        Self::malformed(err)
    }
}

impl From<hex::FromHexError> for TransactionError {
    fn from(err: hex::FromHexError) -> Self {
        Self::malformed(format!("invalid hex: {err}"))
    }
}
