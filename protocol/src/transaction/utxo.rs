//! Unspent outputs handed to the builder by an external selection step.

use serde::{Deserialize, Serialize};

use super::address::Address;
use super::types::{TransactionId, TransactionInput};

/// An already-selected unspent output and the address that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo<A> {
    pub address: A,
    pub transaction_id: TransactionId,
    pub output_index: u64,
    pub amount: u64,
}

impl<A: Address> Utxo<A> {
    pub fn new(address: A, transaction_id: TransactionId, output_index: u64, amount: u64) -> Self {
        Self {
            address,
            transaction_id,
            output_index,
            amount,
        }
    }

    /// The input that spends this output.
    pub fn input(&self) -> TransactionInput {
        TransactionInput::new(self.transaction_id, self.output_index)
    }
}
