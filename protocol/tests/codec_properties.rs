use proptest::prelude::*;

use utxo_tx::config::ProtocolParams;
use utxo_tx::crypto::{PublicKey, Signature};
use utxo_tx::transaction::{
    FeeBalance, Transaction, TransactionBody, TransactionId, TransactionInput, TransactionOutput,
    TxBuilder, VKeyWitness, WitnessSet,
};

fn arb_input() -> impl Strategy<Value = TransactionInput> {
    (prop::array::uniform32(any::<u8>()), any::<u64>())
        .prop_map(|(id, index)| TransactionInput::new(TransactionId::from_bytes(id), index))
}

fn arb_output() -> impl Strategy<Value = TransactionOutput> {
    (prop::collection::vec(any::<u8>(), 0..64), any::<u64>())
        .prop_map(|(address, amount)| TransactionOutput::new(address, amount))
}

fn arb_body() -> impl Strategy<Value = TransactionBody> {
    (
        prop::collection::vec(arb_input(), 0..5),
        prop::collection::vec(arb_output(), 0..5),
        any::<u64>(), // fee
        any::<u64>(), // ttl
    )
        .prop_map(|(inputs, outputs, fee, ttl)| TransactionBody {
            inputs,
            outputs,
            fee,
            ttl,
            certificates: Vec::new(),
        })
}

fn arb_witness() -> impl Strategy<Value = VKeyWitness> {
    (
        prop::array::uniform32(any::<u8>()),
        prop::collection::vec(any::<u8>(), 64),
    )
        .prop_map(|(vkey, sig)| {
            VKeyWitness::new(
                PublicKey::from_bytes(vkey),
                Signature::try_from_slice(&sig).unwrap(),
            )
        })
}

fn arb_transaction() -> impl Strategy<Value = Transaction> {
    (arb_body(), prop::collection::vec(arb_witness(), 0..4))
        .prop_map(|(body, witnesses)| Transaction::new(body, WitnessSet::new(witnesses)))
}

fn params() -> ProtocolParams {
    ProtocolParams {
        minimum_utxo_value: 1_000_000,
        pool_deposit: 0,
        key_deposit: 0,
        min_fee_a: 44,
        min_fee_b: 155_381,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn transaction_roundtrip(tx in arb_transaction()) {
        let bytes = tx.to_bytes();
        let decoded = Transaction::from_bytes(&bytes).unwrap();
        prop_assert_eq!(&decoded, &tx);
        prop_assert_eq!(decoded.to_bytes(), bytes);
    }

    #[test]
    fn transaction_hex_roundtrip(tx in arb_transaction()) {
        let decoded = Transaction::from_hex(&tx.to_hex()).unwrap();
        prop_assert_eq!(decoded, tx);
    }

    #[test]
    fn body_id_is_deterministic(body in arb_body()) {
        let copy = body.clone();
        prop_assert_eq!(body.id(), copy.id());
        prop_assert_eq!(body.id(), TransactionBody::from_bytes(&body.to_bytes()).unwrap().id());
    }

    #[test]
    fn witnesses_never_affect_id(tx in arb_transaction()) {
        let unsigned = Transaction::new(tx.body.clone(), WitnessSet::default());
        prop_assert_eq!(unsigned.id(), tx.id());
    }

    #[test]
    fn decoding_arbitrary_bytes_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = Transaction::from_bytes(&bytes);
        let _ = TransactionBody::from_bytes(&bytes);
    }

    #[test]
    fn accepted_bytes_reencode_identically(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        if let Ok(tx) = Transaction::from_bytes(&bytes) {
            prop_assert_eq!(tx.to_bytes(), bytes.clone());
        }
        if let Ok(body) = TransactionBody::from_bytes(&bytes) {
            prop_assert_eq!(body.to_bytes(), bytes);
        }
    }

    #[test]
    fn widened_fee_head_is_rejected(
        fee in 0u64..24,
        ttl in any::<u64>(),
        width in prop::sample::select(vec![1usize, 2, 4, 8]),
    ) {
        let body = TransactionBody { fee, ttl, ..TransactionBody::default() };
        // {0: [], 1: [], 2: fee, ...}: the fee value sits at offset 6.
        let canonical = body.to_bytes();
        prop_assert_eq!(canonical[6], fee as u8);

        let head = match width { 1 => 0x18u8, 2 => 0x19, 4 => 0x1a, _ => 0x1b };
        let mut widened = canonical[..6].to_vec();
        widened.push(head);
        widened.extend_from_slice(&fee.to_be_bytes()[8 - width..]);
        widened.extend_from_slice(&canonical[7..]);
        prop_assert!(TransactionBody::from_bytes(&widened).is_err());
    }

    #[test]
    fn add_fee_conserves_value(
        inputs in prop::collection::vec(1_000_000u64..50_000_000_000, 1..5),
        payment in 0u64..50_000_000_000,
    ) {
        let mut builder = TxBuilder::new(params());
        for (i, amount) in inputs.iter().enumerate() {
            builder.add_input_without_sig(TransactionId::from_bytes([i as u8; 32]), 0, *amount);
        }
        builder.add_output(&[0x60u8; 29], payment).set_ttl(1_000);

        match builder.add_fee(&[0x61u8; 29]) {
            Ok(balance) => {
                let input_total = builder.input_total().unwrap();
                let output_total = builder.output_total().unwrap();
                let fee = builder.fee().unwrap();
                prop_assert_eq!(input_total, output_total + fee);
                prop_assert!(fee >= params().min_fee_b);
                if let FeeBalance::Change { amount } = balance {
                    prop_assert!(amount > params().minimum_utxo_value);
                    prop_assert_eq!(builder.outputs().len(), 2);
                } else {
                    prop_assert_eq!(builder.outputs().len(), 1);
                }
            }
            Err(_) => {
                prop_assert_eq!(builder.fee(), None);
                prop_assert_eq!(builder.outputs().len(), 1);
            }
        }
    }
}
