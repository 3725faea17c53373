//! Witness production.
//!
//! Every witness signs the raw 32-byte [`TransactionId`] of the finalised
//! body, never a draft and never the hex rendering. Because the ID covers
//! the unsigned body only, independent parties can sign the same body in
//! any order and their witnesses can be combined afterwards.
//!
//! Two entry points exist. [`sign_body`] turns a [`Signer`] into a witness
//! and is what [`TxBuilder::build`](super::TxBuilder::build) uses, once per
//! distinct key. [`TransactionBody::add_signatures`] attaches signatures that
//! were produced elsewhere, one per input, in input order.

use std::collections::HashSet;

use super::error::TransactionError;
use super::types::{Transaction, TransactionBody, TransactionId, VKeyWitness, WitnessSet};
use crate::crypto::{PublicKey, Signature, Signer};

/// Sign a transaction ID, producing the witness for `signer`'s key.
pub fn sign_id<S: Signer + ?Sized>(id: &TransactionId, signer: &S) -> VKeyWitness {
    VKeyWitness::new(signer.public_key(), signer.sign(id.as_bytes()))
}

/// Sign a finalised body.
pub fn sign_body<S: Signer + ?Sized>(body: &TransactionBody, signer: &S) -> VKeyWitness {
    sign_id(&body.id(), signer)
}

impl TransactionBody {
    /// Attach externally produced signatures, one per input.
    ///
    /// `public_keys[i]` and `signatures[i]` authorize `inputs[i]`. All three
    /// sequences must have the same length. A key may appear only once: when
    /// one key controls several inputs, sign through the builder instead,
    /// which emits a single witness for it.
    ///
    /// Signatures are not verified here; see
    /// [`verify_transaction`](super::verify_transaction).
    pub fn add_signatures<P, S>(
        &self,
        public_keys: &[P],
        signatures: &[S],
    ) -> Result<Transaction, TransactionError>
    where
        P: AsRef<[u8]>,
        S: AsRef<[u8]>,
    {
        if public_keys.len() != signatures.len() || public_keys.len() != self.inputs.len() {
            return Err(TransactionError::LengthMismatch {
                public_keys: public_keys.len(),
                signatures: signatures.len(),
                inputs: self.inputs.len(),
            });
        }

        let mut seen = HashSet::with_capacity(public_keys.len());
        let mut witnesses = Vec::with_capacity(public_keys.len());
        for (index, (pk, sig)) in public_keys.iter().zip(signatures).enumerate() {
            let (pk, sig) = (pk.as_ref(), sig.as_ref());

            let vkey = PublicKey::try_from_slice(pk).map_err(|_| {
                TransactionError::InvalidPublicKeyLength {
                    index,
                    length: pk.len(),
                }
            })?;
            let signature = Signature::try_from_slice(sig).map_err(|_| {
                TransactionError::InvalidSignatureLength {
                    index,
                    length: sig.len(),
                }
            })?;
            if !seen.insert(vkey) {
                return Err(TransactionError::DuplicateWitness { index });
            }

            witnesses.push(VKeyWitness::new(vkey, signature));
        }

        Ok(Transaction::new(self.clone(), WitnessSet::new(witnesses)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Ed25519Keypair;
    use crate::transaction::types::{TransactionInput, TransactionOutput};

    fn body_with_inputs(n: u8) -> TransactionBody {
        TransactionBody {
            inputs: (0..n)
                .map(|i| TransactionInput::new(TransactionId::from_bytes([i; 32]), 0))
                .collect(),
            outputs: vec![TransactionOutput::new(vec![0x60; 29], 2_000_000)],
            fee: 170_000,
            ttl: 1_000,
            certificates: Vec::new(),
        }
    }

    #[test]
    fn sign_body_signs_the_raw_id() {
        let kp = Ed25519Keypair::from_seed(&[1u8; 32]);
        let body = body_with_inputs(1);
        let witness = sign_body(&body, &kp);
        assert_eq!(witness.vkey, kp.public_key());
        assert!(kp.public_key().verify(body.id().as_bytes(), &witness.signature));
        assert!(!kp
            .public_key()
            .verify(body.id().to_hex().as_bytes(), &witness.signature));
    }

    #[test]
    fn add_signatures_positional() {
        let body = body_with_inputs(2);
        let id = body.id();
        let kps = [
            Ed25519Keypair::from_seed(&[1u8; 32]),
            Ed25519Keypair::from_seed(&[2u8; 32]),
        ];
        let pks: Vec<_> = kps.iter().map(|k| k.public_key().as_bytes().to_vec()).collect();
        let sigs: Vec<_> = kps.iter().map(|k| k.sign(id.as_bytes()).as_bytes().to_vec()).collect();

        let tx = body.add_signatures(&pks, &sigs).unwrap();
        assert_eq!(tx.body, body);
        assert_eq!(tx.witness_set.len(), 2);
        assert_eq!(tx.witness_set.vkey_witnesses[1].vkey, kps[1].public_key());
        assert_eq!(tx.id(), id);
    }

    #[test]
    fn length_mismatch_between_keys_and_signatures() {
        let body = body_with_inputs(1);
        let err = body
            .add_signatures(&[[0u8; 32]], &[[0u8; 64], [1u8; 64]])
            .unwrap_err();
        assert_eq!(
            err,
            TransactionError::LengthMismatch {
                public_keys: 1,
                signatures: 2,
                inputs: 1
            }
        );
    }

    #[test]
    fn length_mismatch_with_inputs() {
        let body = body_with_inputs(2);
        let err = body
            .add_signatures(&[[0u8; 32]], &[[0u8; 64]])
            .unwrap_err();
        assert!(matches!(err, TransactionError::LengthMismatch { inputs: 2, .. }));
    }

    #[test]
    fn wrong_signature_length() {
        let body = body_with_inputs(2);
        let pks = [vec![1u8; 32], vec![2u8; 32]];
        let sigs = [vec![0u8; 64], vec![0u8; 63]];
        assert_eq!(
            body.add_signatures(&pks, &sigs).unwrap_err(),
            TransactionError::InvalidSignatureLength { index: 1, length: 63 }
        );
    }

    #[test]
    fn wrong_public_key_length() {
        let body = body_with_inputs(1);
        assert_eq!(
            body.add_signatures(&[vec![1u8; 33]], &[vec![0u8; 64]])
                .unwrap_err(),
            TransactionError::InvalidPublicKeyLength { index: 0, length: 33 }
        );
    }

    #[test]
    fn repeated_key_is_refused() {
        let body = body_with_inputs(2);
        let pks = [[7u8; 32], [7u8; 32]];
        let sigs = [[0u8; 64], [0u8; 64]];
        assert_eq!(
            body.add_signatures(&pks, &sigs).unwrap_err(),
            TransactionError::DuplicateWitness { index: 1 }
        );
    }
}
