//! # Hashing
//!
//! The ledger uses a single content hash: BLAKE2b with a 256-bit output.
//! Transaction IDs are the BLAKE2b-256 of the canonical body encoding, and
//! key hashes are the BLAKE2b-256 of raw public key bytes.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

use crate::config::HASH_LENGTH;

/// BLAKE2b parameterised to a 32-byte digest.
type Blake2b256 = Blake2b<U32>;

/// Compute the BLAKE2b-256 digest of `data`.
///
/// # Example
///
/// ```
/// use utxo_tx::crypto::blake2b_256;
///
/// let digest = blake2b_256(b"utxo");
/// assert_eq!(digest.len(), 32);
/// ```
pub fn blake2b_256(data: &[u8]) -> [u8; HASH_LENGTH] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    hasher.finalize().into()
}
