//! Witness verification.
//!
//! The builder never needs this: it signs with keys it holds. It exists for
//! callers that receive a transaction from elsewhere (an external signer, a
//! hex blob on the command line) and want to know every witness is genuine
//! before passing it on.

use tracing::trace;

use super::error::TransactionError;
use super::types::Transaction;
use crate::crypto::verify;

/// Checks every witness signature against the ID of the body.
///
/// An unsigned transaction passes trivially. Whether the witnesses are
/// *sufficient* to spend the inputs is a ledger-side question this function
/// does not answer.
///
/// # Errors
///
/// [`TransactionError::InvalidWitness`] with the position of the first
/// witness whose signature does not verify.
pub fn verify_transaction(tx: &Transaction) -> Result<(), TransactionError> {
    let id = tx.id();
    for (index, witness) in tx.witness_set.vkey_witnesses.iter().enumerate() {
        if !verify(&witness.vkey, id.as_bytes(), &witness.signature) {
            return Err(TransactionError::InvalidWitness { index });
        }
        trace!(index, key_hash = %witness.vkey.key_hash(), "witness verified");
    }
    Ok(())
}
