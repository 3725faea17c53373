// Encoding, hashing, and fee-balancing benchmarks for utxo-tx.
//
// Covers body encoding and ID computation, full transaction decode, the
// fee algorithm at various input counts, and signing a built transaction.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use utxo_tx::config::ProtocolParams;
use utxo_tx::crypto::Ed25519Keypair;
use utxo_tx::transaction::{Transaction, TransactionId, TxBuilder};

const ADDRESS: [u8; 29] = [0x60; 29];

fn params() -> ProtocolParams {
    ProtocolParams {
        minimum_utxo_value: 1_000_000,
        pool_deposit: 500_000_000,
        key_deposit: 2_000_000,
        min_fee_a: 44,
        min_fee_b: 155_381,
    }
}

/// A draft spending one 5 000 000 output per key.
fn draft(keys: &[Ed25519Keypair]) -> TxBuilder<'_> {
    let mut builder = TxBuilder::new(params());
    for (i, key) in keys.iter().enumerate() {
        builder.add_input(
            key.public_key(),
            TransactionId::from_bytes([i as u8; 32]),
            i as u64,
            5_000_000,
        );
    }
    builder.add_output(&ADDRESS, 2_000_000).set_ttl(39_851_191);
    builder
}

fn keys(n: usize) -> Vec<Ed25519Keypair> {
    (0..n)
        .map(|i| Ed25519Keypair::from_seed(&[i as u8 + 1; 32]))
        .collect()
}

fn signed(keys: &[Ed25519Keypair]) -> Transaction {
    let mut builder = draft(keys);
    builder.add_fee(&ADDRESS).unwrap();
    for key in keys {
        builder.sign(key);
    }
    builder.build().unwrap()
}

fn bench_body_id(c: &mut Criterion) {
    let tx = signed(&keys(4));

    c.bench_function("codec/body_encode", |b| {
        b.iter(|| tx.body.to_bytes());
    });
    c.bench_function("codec/body_id", |b| {
        b.iter(|| tx.body.id());
    });
}

fn bench_decode(c: &mut Criterion) {
    let hex_str = signed(&keys(4)).to_hex();

    c.bench_function("codec/decode_transaction_hex", |b| {
        b.iter(|| Transaction::from_hex(&hex_str).unwrap());
    });
}

fn bench_add_fee(c: &mut Criterion) {
    let mut group = c.benchmark_group("builder/add_fee");

    for size in [1usize, 4, 16, 64] {
        let keys = keys(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &keys, |b, keys| {
            b.iter(|| {
                let mut builder = draft(keys);
                builder.add_fee(&ADDRESS).unwrap();
                builder
            });
        });
    }

    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let keys = keys(4);
    let mut builder = draft(&keys);
    builder.add_fee(&ADDRESS).unwrap();
    for key in &keys {
        builder.sign(key);
    }

    c.bench_function("builder/build_4_witnesses", |b| {
        b.iter(|| builder.build().unwrap());
    });
}

criterion_group!(
    benches,
    bench_body_id,
    bench_decode,
    bench_add_fee,
    bench_build
);
criterion_main!(benches);
