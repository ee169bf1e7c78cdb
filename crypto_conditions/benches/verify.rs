//! Benchmarks for decoding and verifying crypto-conditions.
//!
//! Run with: `cargo bench -p crypto_conditions`

#![allow(missing_docs, clippy::unwrap_used)]

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ed25519_dalek::{Signer, SigningKey};

use crypto_conditions::{
    verify, verify_der, Condition, Ed25519Sha256, Fulfill, Fulfillment, PrefixSha256,
    PreimageSha256, ThresholdSha256,
};

const MESSAGE: &[u8] = b"benchmark payment";

// ============================================================================
// Synthetic Fulfillments
// ============================================================================

fn signed(seed: u8) -> Fulfillment {
    let key = SigningKey::from_bytes(&[seed; 32]);
    Ed25519Sha256::new(key.verifying_key().to_bytes(), key.sign(MESSAGE).to_bytes()).into()
}

/// An `m`-of-`n` threshold with the first `m` branches signed.
fn threshold(m: u8, n: u8) -> Fulfillment {
    let subfulfillments = (0..m).map(signed).collect();
    let subconditions = (m..n).map(|seed| signed(seed).condition()).collect();
    ThresholdSha256::new(u32::from(m), subfulfillments, subconditions).into()
}

/// `levels` prefixes over a preimage.
fn nested_prefixes(levels: usize) -> Fulfillment {
    let preimage = Fulfillment::from(PreimageSha256::new(b"secret".to_vec()));
    (0..levels).fold(preimage, |f, _| {
        Fulfillment::from(PrefixSha256::new(Vec::new(), 1024, f))
    })
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_fulfillment");

    for n in [3u8, 16, 64] {
        let der = threshold(n / 2 + 1, n).to_der();
        group.throughput(Throughput::Bytes(der.len() as u64));
        group.bench_with_input(BenchmarkId::new("threshold", n), &der, |b, der| {
            b.iter(|| Fulfillment::from_der(black_box(der)).unwrap());
        });
    }

    for levels in [1, 8, 15] {
        let der = nested_prefixes(levels).to_der();
        group.bench_with_input(BenchmarkId::new("prefix_depth", levels), &der, |b, der| {
            b.iter(|| Fulfillment::from_der(black_box(der)).unwrap());
        });
    }

    group.finish();
}

fn bench_derive_condition(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive_condition");

    for n in [3u8, 16, 64] {
        let f = threshold(n / 2 + 1, n);
        group.bench_with_input(BenchmarkId::new("threshold", n), &f, |b, f| {
            b.iter(|| black_box(f).condition());
        });
    }

    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("verify");

    let single = signed(1);
    let condition: Condition = single.condition();
    group.bench_function("ed25519", |b| {
        b.iter(|| verify(&condition, black_box(&single), MESSAGE).unwrap());
    });

    for n in [3u8, 16] {
        let f = threshold(n / 2 + 1, n);
        let condition = f.condition().to_der();
        let fulfillment = f.to_der();
        group.bench_with_input(BenchmarkId::new("threshold_der", n), &n, |b, _| {
            b.iter(|| verify_der(&condition, black_box(&fulfillment), MESSAGE).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode, bench_derive_condition, bench_verify);
criterion_main!(benches);
