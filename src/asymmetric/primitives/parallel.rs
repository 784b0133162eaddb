//! 使用 rayon 并行执行批量加解密与签名。
//!
//! 每个元素独立计算，任意元素失败时整个批次返回第一个遇到的错误。

use crate::asymmetric::traits::AsymmetricCryptographicSystem;
use num_bigint::BigUint;
use rayon::prelude::*;

/// 并行加密一批消息，输出顺序与输入一致
pub fn par_encrypt<C: AsymmetricCryptographicSystem>(
    public_key: &C::PublicKey,
    messages: &[BigUint],
) -> Result<Vec<BigUint>, C::Error> {
    messages
        .par_iter()
        .map(|message| C::encrypt(public_key, message))
        .collect()
}

/// 并行解密一批密文，输出顺序与输入一致
pub fn par_decrypt<C: AsymmetricCryptographicSystem>(
    private_key: &C::PrivateKey,
    ciphertexts: &[BigUint],
) -> Result<Vec<BigUint>, C::Error> {
    ciphertexts
        .par_iter()
        .map(|ciphertext| C::decrypt(private_key, ciphertext))
        .collect()
}

/// 并行签名一批消息
pub fn par_sign<C: AsymmetricCryptographicSystem>(
    private_key: &C::PrivateKey,
    messages: &[BigUint],
) -> Result<Vec<BigUint>, C::Error> {
    messages
        .par_iter()
        .map(|message| C::sign(private_key, message))
        .collect()
}

/// 并行验证 `(signature, message)` 对，返回每一对的验证结果
pub fn par_verify<C: AsymmetricCryptographicSystem>(
    public_key: &C::PublicKey,
    pairs: &[(BigUint, BigUint)],
) -> Vec<bool> {
    pairs
        .par_iter()
        .map(|(signature, message)| C::verify(public_key, signature, message))
        .collect()
}
