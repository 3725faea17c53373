//! # Protocol Parameters & Wire Constants
//!
//! Protocol parameters are external configuration: they come from the live
//! network (or a test fixture) and are handed to the builder by the caller.
//! Nothing in this crate hardcodes a fee coefficient or a minimum UTXO value.
//!
//! The constants below describe the encoding itself. Changing any of them
//! changes transaction hashes, so they are fixed by the ledger, not by us.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Cryptographic sizes
// ---------------------------------------------------------------------------

/// BLAKE2b-256 digest length. Transaction IDs and key hashes are this size.
pub const HASH_LENGTH: usize = 32;

/// Ed25519 public (verification) key length in bytes.
pub const VERIFYING_KEY_LENGTH: usize = 32;

/// Ed25519 secret key (seed) length in bytes.
pub const SIGNING_KEY_LENGTH: usize = 32;

/// Ed25519 signature length. Always 64 bytes.
pub const SIGNATURE_LENGTH: usize = 64;

// ---------------------------------------------------------------------------
// Body map keys
// ---------------------------------------------------------------------------

/// Map key of the inputs array in a transaction body.
pub const BODY_KEY_INPUTS: u64 = 0;

/// Map key of the outputs array.
pub const BODY_KEY_OUTPUTS: u64 = 1;

/// Map key of the fee.
pub const BODY_KEY_FEE: u64 = 2;

/// Map key of the time-to-live slot.
pub const BODY_KEY_TTL: u64 = 3;

/// Map key of the certificates array. Written only when non-empty.
pub const BODY_KEY_CERTIFICATES: u64 = 4;

/// Map key of withdrawals. Never written in this version.
pub const BODY_KEY_WITHDRAWALS: u64 = 5;

/// Map key of a protocol update proposal. Never written in this version.
pub const BODY_KEY_UPDATE: u64 = 6;

/// Map key of the metadata hash. Never written in this version.
pub const BODY_KEY_METADATA_HASH: u64 = 7;

/// Map key of verification-key witnesses inside a witness set.
pub const WITNESS_KEY_VKEYS: u64 = 0;

// ---------------------------------------------------------------------------
// Fee estimation
// ---------------------------------------------------------------------------

/// Fee written into the draft body while measuring the minimum fee.
///
/// It occupies the widest unsigned integer encoding (9 bytes), which stands
/// in for the width of the real fee.
pub const FEE_SENTINEL: u64 = u64::MAX;

// ---------------------------------------------------------------------------
// ProtocolParams
// ---------------------------------------------------------------------------

/// Ledger parameters that govern fees and output minimums.
///
/// All quantities are in the ledger's indivisible base unit. `pool_deposit`
/// and `key_deposit` are carried for completeness; the builder does not
/// consult them because certificates are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolParams {
    /// Smallest amount a standalone output may carry. Change at or below
    /// this value is burned into the fee.
    pub minimum_utxo_value: u64,

    /// Deposit for registering a stake pool.
    #[serde(default)]
    pub pool_deposit: u64,

    /// Deposit for registering a stake key.
    #[serde(default)]
    pub key_deposit: u64,

    /// Per-byte fee coefficient (the `a` in `a * size + b`).
    pub min_fee_a: u64,

    /// Constant fee term (the `b` in `a * size + b`).
    pub min_fee_b: u64,
}

impl ProtocolParams {
    /// Linear fee model over the encoded transaction size in bytes.
    ///
    /// Saturates instead of wrapping; a saturated fee can never be covered
    /// by inputs, so it surfaces as insufficient input rather than as a
    /// silently tiny fee.
    pub fn min_fee(&self, size: usize) -> u64 {
        self.min_fee_a
            .saturating_mul(size as u64)
            .saturating_add(self.min_fee_b)
    }
}
