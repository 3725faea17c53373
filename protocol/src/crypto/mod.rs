//! # Cryptographic Primitives
//!
//! Thin, typed wrappers over audited implementations: BLAKE2b-256 for
//! content hashing and Ed25519 for signatures. Nothing here is hand-rolled.

pub mod hash;
pub mod keys;
pub mod signer;

pub use hash::blake2b_256;
pub use keys::{Ed25519Keypair, KeyError, KeyHash, PublicKey, Signature};
pub use signer::{verify, Signer};
