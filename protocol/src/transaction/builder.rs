//! Transaction construction, fee balancing, and witness assembly.
//!
//! [`TxBuilder`] accumulates a mutable draft (inputs with their source
//! amounts, outputs, fee, TTL, and two key registries) and turns it into an
//! immutable [`Transaction`] only in [`TxBuilder::build`]. The draft never
//! escapes: every value handed to the caller is freshly finalised.
//!
//! # Fee model
//!
//! The minimum fee is linear in the size of the encoded transaction:
//! `min_fee_a * size + min_fee_b`. Size is measured on a full draft
//! transaction carrying one placeholder witness per registered verification
//! key, so the fee already pays for the signatures `build` will add.
//!
//! [`TxBuilder::add_fee`] measures twice at most: once with a maximal
//! sentinel fee and no change, and once more (with a zero fee) to price the
//! change output. It does not iterate to a fixed point. The sentinel's
//! 9-byte encoding overestimates the real fee's width by a few bytes, which
//! the transaction simply overpays; that result is what existing
//! deployments produced and is kept bit-for-bit.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::address::Address;
use super::error::TransactionError;
use super::signing::sign_id;
use super::types::{
    Transaction, TransactionBody, TransactionId, TransactionInput, TransactionOutput,
    VKeyWitness, WitnessSet,
};
use super::utxo::Utxo;
use crate::config::{ProtocolParams, FEE_SENTINEL, SIGNATURE_LENGTH, VERIFYING_KEY_LENGTH};
use crate::crypto::{KeyHash, PublicKey, Signature, Signer};

// ---------------------------------------------------------------------------
// Draft state
// ---------------------------------------------------------------------------

/// An input as recorded in the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftInput {
    pub input: TransactionInput,
    /// Amount held by the spent output.
    pub amount: u64,
    /// Hash of the verification key that must sign for this input, if any.
    pub key_hash: Option<KeyHash>,
}

/// How [`TxBuilder::add_fee`] balanced the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeBalance {
    /// Inputs cover outputs plus the minimum fee exactly.
    Exact,
    /// The remainder was too small for its own output and went to the fee.
    Burned { dust: u64 },
    /// A change output of `amount` was appended.
    Change { amount: u64 },
}

/// The part of the draft that determines encoded size.
///
/// Measuring a hypothetical extra output works on a snapshot, never on the
/// builder itself, so the key registries are not duplicated.
#[derive(Debug, Clone)]
struct DraftSnapshot {
    tx: Transaction,
}

impl DraftSnapshot {
    fn min_fee(&self, params: &ProtocolParams) -> u64 {
        let size = self.tx.to_bytes().len();
        let fee = params.min_fee(size);
        trace!(size, fee, "measured draft");
        fee
    }

    fn push_output(&mut self, output: TransactionOutput) {
        self.tx.body.outputs.push(output);
    }
}

/// A witness with the exact encoded width of a real one.
fn placeholder_witness() -> VKeyWitness {
    VKeyWitness::new(
        PublicKey::from_bytes([0u8; VERIFYING_KEY_LENGTH]),
        Signature::from_bytes([0u8; SIGNATURE_LENGTH]),
    )
}

// ---------------------------------------------------------------------------
// TxBuilder
// ---------------------------------------------------------------------------

/// Assembles a balanced, signed transaction.
///
/// # Usage
///
/// ```rust,no_run
/// use utxo_tx::config::ProtocolParams;
/// use utxo_tx::crypto::Ed25519Keypair;
/// use utxo_tx::transaction::{Bech32Address, TransactionId, TxBuilder};
///
/// let params = ProtocolParams {
///     minimum_utxo_value: 1_000_000,
///     pool_deposit: 0,
///     key_deposit: 0,
///     min_fee_a: 44,
///     min_fee_b: 155_381,
/// };
/// let key = Ed25519Keypair::generate();
/// let to = Bech32Address::parse("addr_test1vrct863kj4p2tpyzjzmjweyttquttk4z2kw7h42alj4p7gqma8ms5")?;
/// let prev: TransactionId =
///     "2432fc624eb86075fcf035ca198cd89eff491ee38c0ada3434eb70c3af797acc".parse()?;
///
/// let mut builder = TxBuilder::new(params);
/// builder
///     .add_input(key.public_key(), prev, 0, 20_982_558_002)
///     .add_output(&to, 10_000_000_000)
///     .set_ttl(39_851_191);
/// builder.add_fee(&to)?;
/// builder.sign(&key);
/// let tx = builder.build()?;
/// println!("{}", tx.to_hex());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// Keys registered through [`add_input`](Self::add_input) and
/// [`sign`](Self::sign) are indexed by their BLAKE2b-256 key hash, so
/// registering the same key twice is a no-op. Witnesses are emitted in the
/// order signers were registered.
pub struct TxBuilder<'s> {
    params: ProtocolParams,
    inputs: Vec<DraftInput>,
    outputs: Vec<TransactionOutput>,
    fee: Option<u64>,
    ttl: u64,
    vkeys: Vec<(KeyHash, PublicKey)>,
    signers: Vec<(KeyHash, Box<dyn Signer + 's>)>,
}

impl<'s> TxBuilder<'s> {
    /// An empty draft governed by `params`.
    pub fn new(params: ProtocolParams) -> Self {
        Self {
            params,
            inputs: Vec::new(),
            outputs: Vec::new(),
            fee: None,
            ttl: 0,
            vkeys: Vec::new(),
            signers: Vec::new(),
        }
    }

    pub fn params(&self) -> &ProtocolParams {
        &self.params
    }

    pub fn inputs(&self) -> &[DraftInput] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TransactionOutput] {
        &self.outputs
    }

    /// The fee, if one was set or computed.
    pub fn fee(&self) -> Option<u64> {
        self.fee
    }

    pub fn ttl(&self) -> u64 {
        self.ttl
    }

    /// Spend an output controlled by `vkey`. The key must later be matched
    /// by a signer before [`build`](Self::build) succeeds.
    pub fn add_input(
        &mut self,
        vkey: PublicKey,
        transaction_id: TransactionId,
        index: u64,
        amount: u64,
    ) -> &mut Self {
        let key_hash = vkey.key_hash();
        if !self.vkeys.iter().any(|(h, _)| *h == key_hash) {
            self.vkeys.push((key_hash, vkey));
        }
        self.inputs.push(DraftInput {
            input: TransactionInput::new(transaction_id, index),
            amount,
            key_hash: Some(key_hash),
        });
        self
    }

    /// Spend an output whose signature will be supplied by someone else.
    pub fn add_input_without_sig(
        &mut self,
        transaction_id: TransactionId,
        index: u64,
        amount: u64,
    ) -> &mut Self {
        self.inputs.push(DraftInput {
            input: TransactionInput::new(transaction_id, index),
            amount,
            key_hash: None,
        });
        self
    }

    /// Append an output. Minimum values are not checked here.
    pub fn add_output<A: Address + ?Sized>(&mut self, address: &A, amount: u64) -> &mut Self {
        self.outputs
            .push(TransactionOutput::new(address.to_bytes(), amount));
        self
    }

    pub fn set_ttl(&mut self, ttl: u64) -> &mut Self {
        self.ttl = ttl;
        self
    }

    pub fn set_fee(&mut self, fee: u64) -> &mut Self {
        self.fee = Some(fee);
        self
    }

    /// Register a signer for [`build`](Self::build).
    pub fn sign<S: Signer + 's>(&mut self, signer: S) -> &mut Self {
        let key_hash = signer.public_key_hash();
        if !self.signers.iter().any(|(h, _)| *h == key_hash) {
            self.signers.push((key_hash, Box::new(signer)));
        }
        self
    }

    /// Sum of input amounts.
    pub fn input_total(&self) -> Result<u64, TransactionError> {
        self.inputs
            .iter()
            .try_fold(0u64, |acc, i| acc.checked_add(i.amount))
            .ok_or(TransactionError::AmountOverflow { what: "inputs" })
    }

    /// Sum of output amounts.
    pub fn output_total(&self) -> Result<u64, TransactionError> {
        self.outputs
            .iter()
            .try_fold(0u64, |acc, o| acc.checked_add(o.amount))
            .ok_or(TransactionError::AmountOverflow { what: "outputs" })
    }

    // -----------------------------------------------------------------------
    // Fee balancing
    // -----------------------------------------------------------------------

    /// Set the fee and, when worthwhile, append a change output paying
    /// `change_address`.
    ///
    /// Let `remainder = inputs - outputs - min_fee`:
    ///
    /// - zero: the fee is `min_fee`;
    /// - at most `minimum_utxo_value`: the remainder is burned into the fee;
    /// - otherwise the change output is priced, and appended if what is left
    ///   after paying for it still exceeds `minimum_utxo_value`; if not, the
    ///   whole remainder `inputs - outputs` is burned after all. The price of
    ///   the change output that was never added is not subtracted from it.
    ///
    /// In every branch `inputs == outputs + fee` afterwards.
    ///
    /// # Errors
    ///
    /// [`TransactionError::InsufficientInput`] or
    /// [`TransactionError::AmountOverflow`]. The draft is left untouched.
    pub fn add_fee<A: Address + ?Sized>(
        &mut self,
        change_address: &A,
    ) -> Result<FeeBalance, TransactionError> {
        let input_total = self.input_total()?;
        let output_total = self.output_total()?;
        let min_fee = self.snapshot(FEE_SENTINEL).min_fee(&self.params);

        let required = u128::from(output_total) + u128::from(min_fee);
        if u128::from(input_total) < required {
            return Err(TransactionError::InsufficientInput {
                available: input_total,
                required,
            });
        }

        // input_total >= output_total + min_fee from here on.
        let spendable = input_total - output_total;
        let change = spendable - min_fee;
        let minimum = self.params.minimum_utxo_value;

        if change == 0 {
            debug!(fee = min_fee, "exact match, no change");
            self.fee = Some(min_fee);
            return Ok(FeeBalance::Exact);
        }

        if change <= minimum {
            debug!(fee = spendable, dust = change, "change below minimum, burning");
            self.fee = Some(spendable);
            return Ok(FeeBalance::Burned { dust: change });
        }

        let change_bytes = change_address.to_bytes();
        let output_fee = self.fee_for_output(&change_bytes, change);
        let new_fee = min_fee.saturating_add(output_fee);

        match spendable.checked_sub(new_fee) {
            Some(amount) if amount > minimum => {
                debug!(fee = new_fee, change = amount, "adding change output");
                self.outputs
                    .push(TransactionOutput::new(change_bytes, amount));
                self.fee = Some(new_fee);
                Ok(FeeBalance::Change { amount })
            }
            _ => {
                debug!(
                    fee = spendable,
                    dust = change,
                    output_fee,
                    "change cannot pay for its own output, burning"
                );
                self.fee = Some(spendable);
                Ok(FeeBalance::Burned { dust: change })
            }
        }
    }

    /// Marginal fee of appending one output of `amount` to `address`.
    ///
    /// Both measurements use a zero fee, so only the output's own bytes
    /// contribute to the difference.
    fn fee_for_output(&self, address: &[u8], amount: u64) -> u64 {
        let mut draft = self.snapshot(0);
        let before = draft.min_fee(&self.params);
        draft.push_output(TransactionOutput::new(address.to_vec(), amount));
        let after = draft.min_fee(&self.params);
        after.saturating_sub(before)
    }

    fn snapshot(&self, fee: u64) -> DraftSnapshot {
        let body = TransactionBody {
            inputs: self.inputs.iter().map(|i| i.input).collect(),
            outputs: self.outputs.clone(),
            fee,
            ttl: self.ttl,
            certificates: Vec::new(),
        };
        let witnesses = vec![placeholder_witness(); self.vkeys.len()];
        DraftSnapshot {
            tx: Transaction::new(body, WitnessSet::new(witnesses)),
        }
    }

    // -----------------------------------------------------------------------
    // Finalisation
    // -----------------------------------------------------------------------

    /// Freeze the draft into a body.
    fn finalize_body(&self) -> Result<TransactionBody, TransactionError> {
        let fee = self.fee.ok_or(TransactionError::FeeNotSet)?;
        if self.ttl == 0 {
            return Err(TransactionError::TtlNotSet);
        }
        Ok(TransactionBody {
            inputs: self.inputs.iter().map(|i| i.input).collect(),
            outputs: self.outputs.clone(),
            fee,
            ttl: self.ttl,
            certificates: Vec::new(),
        })
    }

    /// The registered signers must be exactly the registered input keys.
    fn check_signature_set(&self) -> Result<(), TransactionError> {
        let signer_hashes: HashSet<&KeyHash> = self.signers.iter().map(|(h, _)| h).collect();
        let vkey_hashes: HashSet<&KeyHash> = self.vkeys.iter().map(|(h, _)| h).collect();

        let missing = vkey_hashes.difference(&signer_hashes).count();
        let unexpected = signer_hashes.difference(&vkey_hashes).count();
        if missing != 0 || unexpected != 0 {
            return Err(TransactionError::IncompleteSignatureSet {
                missing,
                unexpected,
            });
        }
        Ok(())
    }

    /// Finalise the body and sign its ID once per registered signer.
    ///
    /// Does not consume the draft; building twice from an unchanged draft
    /// yields identical transactions.
    ///
    /// # Errors
    ///
    /// [`TransactionError::IncompleteSignatureSet`] when signers and input
    /// keys differ, [`TransactionError::FeeNotSet`] or
    /// [`TransactionError::TtlNotSet`] when the body is incomplete.
    pub fn build(&self) -> Result<Transaction, TransactionError> {
        self.check_signature_set()?;
        let body = self.finalize_body()?;
        let id = body.id();

        let witnesses = self
            .signers
            .iter()
            .map(|(key_hash, signer)| {
                debug!(tx_id = %id, key_hash = %key_hash, "producing witness");
                sign_id(&id, signer.as_ref())
            })
            .collect();

        Ok(Transaction::new(body, WitnessSet::new(witnesses)))
    }

    /// Finalise the body and attach externally produced signatures, one per
    /// input in input order. See [`TransactionBody::add_signatures`].
    pub fn add_signatures<P, S>(
        &self,
        public_keys: &[P],
        signatures: &[S],
    ) -> Result<Transaction, TransactionError>
    where
        P: AsRef<[u8]>,
        S: AsRef<[u8]>,
    {
        self.finalize_body()?.add_signatures(public_keys, signatures)
    }

    // -----------------------------------------------------------------------
    // One-shot helpers
    // -----------------------------------------------------------------------

    /// Spend every picked UTXO (unsigned) to pay `amount` to `receiver`,
    /// balance the fee with change going back to the first UTXO's address,
    /// and return the finalised body.
    ///
    /// The TTL must be set beforehand. On failure the draft is restored to
    /// what it was before the call.
    pub fn build_transaction_body<R, A>(
        &mut self,
        receiver: &R,
        utxos: &[Utxo<A>],
        amount: u64,
    ) -> Result<TransactionBody, TransactionError>
    where
        R: Address + ?Sized,
        A: Address,
    {
        if self.ttl == 0 {
            return Err(TransactionError::TtlNotSet);
        }

        let (inputs_before, outputs_before) = (self.inputs.len(), self.outputs.len());
        for utxo in utxos {
            self.add_input_without_sig(utxo.transaction_id, utxo.output_index, utxo.amount);
        }
        self.add_output(receiver, amount);

        let change_address = utxos
            .first()
            .map(|u| u.address.to_bytes())
            .unwrap_or_default();
        let balanced = self
            .add_fee(change_address.as_slice())
            .and_then(|_| self.finalize_body());
        if balanced.is_err() {
            self.inputs.truncate(inputs_before);
            self.outputs.truncate(outputs_before);
        }
        balanced
    }

    /// Spend every picked UTXO to pay `amount` to `receiver` with the fee
    /// already set by [`set_fee`](Self::set_fee). No change is computed.
    ///
    /// Returns the body's ID and its encoding, ready for external signing.
    pub fn build_raw_transaction<R, A>(
        &mut self,
        receiver: &R,
        utxos: &[Utxo<A>],
        amount: u64,
    ) -> Result<(TransactionId, Vec<u8>), TransactionError>
    where
        R: Address + ?Sized,
        A: Address,
    {
        if self.fee.is_none() {
            return Err(TransactionError::FeeNotSet);
        }
        if self.ttl == 0 {
            return Err(TransactionError::TtlNotSet);
        }

        for utxo in utxos {
            self.add_input_without_sig(utxo.transaction_id, utxo.output_index, utxo.amount);
        }
        self.add_output(receiver, amount);

        let body = self.finalize_body()?;
        Ok((body.id(), body.to_bytes()))
    }
}

impl std::fmt::Debug for TxBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxBuilder")
            .field("params", &self.params)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("fee", &self.fee)
            .field("ttl", &self.ttl)
            .field("vkeys", &self.vkeys.len())
            .field("signers", &self.signers.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
