//! # The Signer Seam
//!
//! The builder never touches key internals. Anything that can produce a
//! public key and an Ed25519 signature can authorize a transaction: the
//! in-process [`Ed25519Keypair`], an HD wallet's derived key, a hardware
//! device behind a synchronous facade.
//!
//! Implementations must be deterministic with respect to the builder's view:
//! `public_key` must always return the same key, or the key hash the builder
//! indexed at registration would no longer match the witness it emits.

use super::keys::{Ed25519Keypair, KeyHash, PublicKey, Signature};

/// A key-pair provider that can authorize transactions.
pub trait Signer {
    /// The verification key derived from the provider's secret.
    fn public_key(&self) -> PublicKey;

    /// Sign `message`, returning a 64-byte signature.
    fn sign(&self, message: &[u8]) -> Signature;

    /// Identifier used to match this signer against registered verification
    /// keys. Defaults to the BLAKE2b-256 of the public key.
    fn public_key_hash(&self) -> KeyHash {
        self.public_key().key_hash()
    }
}

impl Signer for Ed25519Keypair {
    fn public_key(&self) -> PublicKey {
        Ed25519Keypair::public_key(self)
    }

    fn sign(&self, message: &[u8]) -> Signature {
        Ed25519Keypair::sign(self, message)
    }
}

impl<S: Signer + ?Sized> Signer for &S {
    fn public_key(&self) -> PublicKey {
        (**self).public_key()
    }

    fn sign(&self, message: &[u8]) -> Signature {
        (**self).sign(message)
    }

    fn public_key_hash(&self) -> KeyHash {
        (**self).public_key_hash()
    }
}

impl<S: Signer + ?Sized> Signer for Box<S> {
    fn public_key(&self) -> PublicKey {
        (**self).public_key()
    }

    fn sign(&self, message: &[u8]) -> Signature {
        (**self).sign(message)
    }

    fn public_key_hash(&self) -> KeyHash {
        (**self).public_key_hash()
    }
}

/// Verify `signature` over `message` against `public_key`.
///
/// Returns `true` only for a valid signature; malformed keys are a plain `false`.
pub fn verify(public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
    public_key.verify(message, signature)
}
