//!
//! 集成测试的通用辅助函数
//!

#![allow(dead_code)]

use num_bigint::BigUint;
use quorum_seal::asymmetric::arithmetic::random_below;
use quorum_seal::{CryptoConfig, RsaKeyPair};
use rand_chacha::ChaCha20Rng;
use rand_chacha::rand_core::SeedableRng;

/// 集成测试默认使用的模数位数
pub const TEST_KEY_BITS: usize = 512;

pub fn seeded_rng(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}

/// 使用固定种子生成密钥对，测试结果可复现
pub fn seeded_key_pair(bits: usize, seed: u64) -> RsaKeyPair {
    RsaKeyPair::generate_with_rng(&CryptoConfig::with_bits(bits), &mut seeded_rng(seed)).unwrap()
}

/// 生成 `count` 个 `[0, n)` 内的随机消息
pub fn random_messages(n: &BigUint, count: usize, seed: u64) -> Vec<BigUint> {
    let mut rng = seeded_rng(seed);
    (0..count).map(|_| random_below(&mut rng, n).unwrap()).collect()
}
