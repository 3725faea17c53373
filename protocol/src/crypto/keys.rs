//! # Key Material
//!
//! Ed25519 key pairs, public keys, signatures, and key hashes.
//!
//! Key material is opaque to the transaction builder: it only ever asks a
//! [`Signer`](super::Signer) for a public key, a key hash, or a signature.
//! [`Ed25519Keypair`] is the in-process implementation; hardware or remote
//! signers implement the same trait.
//!
//! Secret key bytes are never logged and never appear in `Debug` output.

use ed25519_dalek::{Signature as DalekSignature, Signer as _, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use std::fmt;
use thiserror::Error;

use super::hash::blake2b_256;
use crate::config::{HASH_LENGTH, SIGNATURE_LENGTH, SIGNING_KEY_LENGTH, VERIFYING_KEY_LENGTH};

/// Errors that can occur while parsing or reconstructing key material.
///
/// Messages stay vague about the secret key on purpose.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("invalid secret key bytes: expected {SIGNING_KEY_LENGTH} bytes")]
    InvalidSecretKey,

    #[error("invalid public key: expected {VERIFYING_KEY_LENGTH} bytes")]
    InvalidPublicKey,

    #[error("invalid signature: expected {SIGNATURE_LENGTH} bytes")]
    InvalidSignature,

    #[error("invalid key hash: expected {HASH_LENGTH} bytes")]
    InvalidKeyHash,
}

// ---------------------------------------------------------------------------
// Fixed-size byte newtypes
// ---------------------------------------------------------------------------

/// A 32-byte Ed25519 verification key as it appears on the wire.
///
/// The bytes are not checked to be a valid curve point on construction;
/// [`PublicKey::verify`] simply fails for points that do not decode.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey([u8; VERIFYING_KEY_LENGTH]);

hex_bytes_newtype!(PublicKey, VERIFYING_KEY_LENGTH, KeyError, KeyError::InvalidPublicKey);

impl PublicKey {
    /// The key hash used to index this key: BLAKE2b-256 of the raw bytes.
    pub fn key_hash(&self) -> KeyHash {
        KeyHash(blake2b_256(&self.0))
    }

    /// Verify an Ed25519 signature over `message`.
    ///
    /// Returns `false` for malformed keys as well as for bad signatures.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.0) else {
            return false;
        };
        let dalek_sig = DalekSignature::from_bytes(&signature.0);
        verifying_key.verify(message, &dalek_sig).is_ok()
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", &self.to_hex()[..16])
    }
}

/// A 64-byte Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_LENGTH]);

hex_bytes_newtype!(Signature, SIGNATURE_LENGTH, KeyError, KeyError::InvalidSignature);

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.to_hex();
        write!(f, "Signature({}...{})", &hex_str[..8], &hex_str[120..])
    }
}

/// BLAKE2b-256 digest of a public key. Compact identifier for a signer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyHash([u8; HASH_LENGTH]);

hex_bytes_newtype!(KeyHash, HASH_LENGTH, KeyError, KeyError::InvalidKeyHash);

impl fmt::Debug for KeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyHash({})", &self.to_hex()[..16])
    }
}

// ---------------------------------------------------------------------------
// Ed25519Keypair
// ---------------------------------------------------------------------------

/// An in-process Ed25519 signing key.
///
/// Deliberately not `Serialize`: exporting a secret should be an explicit
/// call to [`Ed25519Keypair::secret_key_bytes`], never a side effect of
/// putting a key pair in a JSON response.
pub struct Ed25519Keypair {
    signing_key: SigningKey,
}

impl Ed25519Keypair {
    /// Generate a fresh key pair from the OS RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Construct a key pair deterministically from a 32-byte seed.
    pub fn from_seed(seed: &[u8; SIGNING_KEY_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Reconstruct a key pair from a hex-encoded 32-byte secret key.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidSecretKey)?;
        let seed: [u8; SIGNING_KEY_LENGTH] =
            bytes.as_slice().try_into().map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self::from_seed(&seed))
    }

    /// The verification key derived from this secret.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign `message`. Ed25519 is deterministic: same key and message, same bytes.
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.signing_key.sign(message).to_bytes())
    }

    /// Export the raw secret key. Handle with care.
    pub fn secret_key_bytes(&self) -> [u8; SIGNING_KEY_LENGTH] {
        self.signing_key.to_bytes()
    }
}

impl Clone for Ed25519Keypair {
    fn clone(&self) -> Self {
        Self::from_seed(&self.signing_key.to_bytes())
    }
}

impl fmt::Debug for Ed25519Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print secret key material, not even partially.
        write!(f, "Ed25519Keypair(pub={})", self.public_key().to_hex())
    }
}

impl PartialEq for Ed25519Keypair {
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
    }
}

impl Eq for Ed25519Keypair {}
