// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # utxo-tx — Transaction Construction for UTXO Ledgers
//!
//! This crate builds, serializes, fee-balances, and signs transactions for a
//! UTXO ledger whose transaction identifier is the BLAKE2b-256 hash of the
//! body's canonical CBOR encoding. It is meant for wallets and services that
//! need valid, minimally-priced transactions without a full node.
//!
//! ## Architecture
//!
//! - **config** — Protocol parameters supplied by the caller, plus the wire
//!   constants of the encoding.
//! - **crypto** — BLAKE2b hashing, Ed25519 key material, and the [`Signer`]
//!   seam that lets any key provider authorize a transaction.
//! - **transaction** — The data model, its canonical codec, the
//!   [`TxBuilder`] fee/change algorithm, and witness assembly.
//!
//! ## Lifecycle
//!
//! 1. Create a [`TxBuilder`] with the live [`ProtocolParams`].
//! 2. Add inputs (with their verification keys) and outputs, set the TTL.
//! 3. Call [`TxBuilder::add_fee`] to balance the transaction and add change.
//! 4. Register signing keys with [`TxBuilder::sign`], then [`TxBuilder::build`].
//! 5. Ship [`Transaction::to_hex`] to whoever submits it to the network.
//!
//! The transaction ID only ever covers the unsigned body, so the same body
//! can be signed by several independent parties without rehashing.
//!
//! [`Signer`]: crypto::Signer
//! [`TxBuilder`]: transaction::TxBuilder
//! [`TxBuilder::add_fee`]: transaction::TxBuilder::add_fee
//! [`TxBuilder::sign`]: transaction::TxBuilder::sign
//! [`TxBuilder::build`]: transaction::TxBuilder::build
//! [`ProtocolParams`]: config::ProtocolParams
//! [`Transaction::to_hex`]: transaction::Transaction::to_hex

#[macro_use]
mod macros;

pub mod config;
pub mod crypto;
pub mod transaction;

/// Version of this library, as published.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
