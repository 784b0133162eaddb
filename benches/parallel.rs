use criterion::{Criterion, criterion_group, criterion_main};
use quorum_seal::asymmetric::arithmetic::random_below;
use quorum_seal::asymmetric::primitives::parallel::{par_decrypt, par_encrypt};
use quorum_seal::{CryptoConfig, RsaKeyPair, TextbookRsa};
use rand_chacha::ChaCha20Rng;
use rand_chacha::rand_core::SeedableRng;
use std::hint::black_box;

const BATCH: usize = 256;

fn bench_batch(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::seed_from_u64(42);
    let pair = RsaKeyPair::generate_with_rng(&CryptoConfig::default(), &mut rng).unwrap();
    let messages: Vec<_> = (0..BATCH)
        .map(|_| random_below(&mut rng, pair.public_key().n()).unwrap())
        .collect();
    let ciphertexts = par_encrypt::<TextbookRsa>(pair.public_key(), &messages).unwrap();

    let mut group = c.benchmark_group("RSA-1024 batch 256");
    group.bench_function("sequential decrypt", |b| {
        b.iter(|| {
            ciphertexts
                .iter()
                .map(|ciphertext| pair.private_key().decrypt(ciphertext).unwrap())
                .collect::<Vec<_>>()
        });
    });
    group.bench_function("par_encrypt", |b| {
        b.iter(|| {
            par_encrypt::<TextbookRsa>(pair.public_key(), black_box(&messages))
                .unwrap()
        });
    });
    group.bench_function("par_decrypt", |b| {
        b.iter(|| {
            par_decrypt::<TextbookRsa>(pair.private_key(), black_box(&ciphertexts))
                .unwrap()
        });
    });
    group.finish();
}

criterion_group!(benches, bench_batch);
criterion_main!(benches);
