//! 大整数运算基础：模幂、模逆、Miller-Rabin 素性检测与随机素数生成。
//!
//! 所有随机性都通过调用方传入的 `TryCryptoRng` 获取，随机源失败时返回
//! [`AsymmetricError::KeyGeneration`]，不会 panic。

use crate::asymmetric::errors::AsymmetricError;
use crate::common::config::CryptoConfig;
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand_core::TryCryptoRng;
use tracing::{debug, warn};
use zeroize::Zeroizing;

/// 小于 256 的素数，用于试除
const SMALL_PRIMES: [u32; 54] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251,
];

/// 计算 `base^exponent mod modulus`。
///
/// # Panics
///
/// `modulus` 为零时 panic；密钥构造已保证模数非零。
pub fn mod_pow(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> BigUint {
    base.modpow(exponent, modulus)
}

/// 使用扩展欧几里得算法计算 `a` 模 `modulus` 的逆元。
///
/// 当 `gcd(a, modulus) != 1` 或 `modulus` 为零时返回 `None`。
pub fn mod_inverse(a: &BigUint, modulus: &BigUint) -> Option<BigUint> {
    if modulus.is_zero() {
        return None;
    }

    let m = BigInt::from(modulus.clone());
    let mut old_r = BigInt::from(a % modulus);
    let mut r = m.clone();
    let mut old_s = BigInt::one();
    let mut s = BigInt::zero();

    while !r.is_zero() {
        let q = &old_r / &r;
        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_s = &old_s - &q * &s;
        old_s = std::mem::replace(&mut s, next_s);
    }

    if !old_r.is_one() {
        return None;
    }

    old_s.mod_floor(&m).to_biguint()
}

/// 在原缓冲区上把 `value` 的每个字写满 1，然后置零。
///
/// `BigUint` 不暴露底层存储，也没有实现 `Zeroize`；按位或会原地改写已有的字，
/// 运算过程中产生的临时副本不在此处理范围内。
pub(crate) fn wipe(value: &mut BigUint) {
    let bits = value.bits();
    if bits > 0 {
        let mask = (BigUint::one() << bits) - 1u32;
        *value |= &mask;
        std::hint::black_box(&*value);
    }
    value.set_zero();
}

/// 生成至多 `bits` 位的均匀随机数
pub fn random_bits<R: TryCryptoRng + ?Sized>(
    rng: &mut R,
    bits: usize,
) -> Result<BigUint, AsymmetricError> {
    if bits == 0 {
        return Ok(BigUint::zero());
    }

    let len = bits.div_ceil(8);
    let mut buf = Zeroizing::new(vec![0u8; len]);
    rng.try_fill_bytes(&mut buf)
        .map_err(|e| AsymmetricError::KeyGeneration(format!("random source unavailable: {e}")))?;

    let excess = len * 8 - bits;
    buf[0] &= 0xFF >> excess;

    Ok(BigUint::from_bytes_be(&buf))
}

/// 拒绝采样生成 `[0, bound)` 内的均匀随机数
pub fn random_below<R: TryCryptoRng + ?Sized>(
    rng: &mut R,
    bound: &BigUint,
) -> Result<BigUint, AsymmetricError> {
    if bound.is_zero() {
        return Err(AsymmetricError::InvalidInput(
            "random bound must be non-zero".into(),
        ));
    }

    let bits = bound.bits() as usize;
    loop {
        let candidate = random_bits(rng, bits)?;
        if &candidate < bound {
            return Ok(candidate);
        }
    }
}

/// Miller-Rabin 概率素性检测。
///
/// 先用小素数试除，再进行 `rounds` 轮随机底数的检测；合数通过检测的概率不超过 `4^-rounds`。
pub fn is_probable_prime<R: TryCryptoRng + ?Sized>(
    n: &BigUint,
    rounds: usize,
    rng: &mut R,
) -> Result<bool, AsymmetricError> {
    if n < &BigUint::from(2u32) {
        return Ok(false);
    }

    for &small in SMALL_PRIMES.iter() {
        let small = BigUint::from(small);
        if n == &small {
            return Ok(true);
        }
        if (n % &small).is_zero() {
            return Ok(false);
        }
    }

    let one = BigUint::one();
    let two = BigUint::from(2u32);
    let n_minus_one = n - &one;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;
    // 底数取自 [2, n - 2]
    let witness_span = n - 3u32;

    'witness: for _ in 0..rounds {
        let a = random_below(rng, &witness_span)? + 2u32;
        let mut x = mod_pow(&a, &d, n);
        if x == one || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = mod_pow(&x, &two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return Ok(false);
    }

    Ok(true)
}

/// 生成恰好 `bits` 位的随机素数 p，且 `gcd(p - 1, e) = 1`。
///
/// 最高两位被置位，因此两个此类素数的乘积恰好有 `2 * bits` 位。
/// 超过 `config.max_prime_attempts` 个候选仍未找到时返回错误。
pub fn generate_prime<R: TryCryptoRng + ?Sized>(
    rng: &mut R,
    bits: usize,
    config: &CryptoConfig,
) -> Result<BigUint, AsymmetricError> {
    if bits < 2 {
        return Err(AsymmetricError::KeyGeneration(format!(
            "prime size of {bits} bits is too small"
        )));
    }

    let exponent = BigUint::from(config.public_exponent);
    let mask = (BigUint::one() << (bits - 1)) | (BigUint::one() << (bits - 2)) | BigUint::one();

    for attempt in 1..=config.max_prime_attempts {
        let mut candidate = random_bits(rng, bits)?;
        candidate |= &mask;

        if !(&candidate - 1u32).gcd(&exponent).is_one() {
            continue;
        }
        if is_probable_prime(&candidate, config.primality_rounds, rng)? {
            debug!(bits, attempt, "prime found");
            return Ok(candidate);
        }
    }

    warn!(
        bits,
        attempts = config.max_prime_attempts,
        "prime search exhausted"
    );
    Err(AsymmetricError::KeyGeneration(format!(
        "no {bits}-bit prime found within {} candidates",
        config.max_prime_attempts
    )))
}
