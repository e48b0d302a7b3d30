// Signing & assembly benchmarks for the account transaction engine.
//
// Covers Ed25519 signing, payload encoding, full single-key assembly, and
// multi-signature assembly at various registry sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use ccd_tx::crypto::Ed25519SignKey;
use ccd_tx::transaction::{AccountTransactionPayload, BlockItem, Signer, TransactionSigner};
use ccd_tx::types::{
    AccountAddress, CcdAmount, CredentialIndex, Expiry, KeyIndex, OnChainData, SequenceNumber,
};

fn transfer() -> AccountTransactionPayload {
    AccountTransactionPayload::transfer_with_memo(
        CcdAmount::from_micro_ccd(1_000_000),
        AccountAddress::new([1; 32]),
        OnChainData::new(vec![0x61; 64]).unwrap(),
    )
}

fn sign_and_frame(signer: &TransactionSigner) -> BlockItem {
    transfer()
        .prepare(
            AccountAddress::new([0; 32]),
            SequenceNumber::FIRST,
            Expiry::from_unix_seconds(1_700_000_000).unwrap(),
        )
        .sign(signer)
        .unwrap()
        .to_block_item()
}

fn bench_sign_digest(c: &mut Criterion) {
    let key = Ed25519SignKey::from_bytes(&[7; 32]);
    let digest = [0x5a; 32];

    c.bench_function("ed25519/sign_digest", |b| {
        b.iter(|| key.sign(black_box(&digest)));
    });
}

fn bench_encode_payload(c: &mut Criterion) {
    let payload = transfer();

    c.bench_function("payload/encode_transfer_with_memo", |b| {
        b.iter(|| black_box(&payload).encode());
    });
}

fn bench_assemble_single(c: &mut Criterion) {
    let signer = TransactionSigner::single(Ed25519SignKey::from_bytes(&[7; 32]));

    c.bench_function("assemble/single_key", |b| {
        b.iter(|| sign_and_frame(black_box(&signer)));
    });
}

fn bench_assemble_multisig(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble/multisig");

    for size in [2u8, 5, 10, 20] {
        let mut builder = TransactionSigner::builder();
        for i in 0..size {
            builder = builder
                .add(
                    CredentialIndex(i / 4),
                    KeyIndex(i % 4),
                    Ed25519SignKey::from_bytes(&[i + 1; 32]),
                )
                .unwrap();
        }
        let signer = builder.build();

        group.throughput(Throughput::Elements(u64::from(size)));
        group.bench_with_input(BenchmarkId::from_parameter(size), &signer, |b, signer| {
            b.iter(|| sign_and_frame(signer));
        });
    }

    group.finish();
}

fn bench_decode_block_item(c: &mut Criterion) {
    let signer = TransactionSigner::single(Ed25519SignKey::from_bytes(&[7; 32]));
    let bytes = sign_and_frame(&signer).into_bytes();

    c.bench_function("block_item/decode", |b| {
        b.iter(|| BlockItem::decode(black_box(&bytes)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_sign_digest,
    bench_encode_payload,
    bench_assemble_single,
    bench_assemble_multisig,
    bench_decode_block_item,
);
criterion_main!(benches);
