//! 定义了非对称加密系统的核心 Trait。
use crate::common::config::CryptoConfig;
use num_bigint::BigUint;
use std::fmt::Debug;

/// `AsymmetricCryptographicSystem` 定义了非对称加密算法必须实现的核心功能。
///
/// 消息、密文与签名都以大整数表示；编码为字节或字符串由调用方负责。
pub trait AsymmetricCryptographicSystem: Sized {
    /// 公钥类型
    type PublicKey: Clone + Debug + Send + Sync + 'static;

    /// 私钥类型
    type PrivateKey: Clone + Debug + Send + Sync + 'static;

    /// 错误类型
    type Error: std::error::Error + Send + Sync + 'static;

    /// 算法标识符
    const ALGORITHM: &'static str;

    /// 生成密钥对
    fn generate_keypair(
        config: &CryptoConfig,
    ) -> Result<(Self::PublicKey, Self::PrivateKey), Self::Error>;

    /// 使用公钥加密
    fn encrypt(public_key: &Self::PublicKey, message: &BigUint) -> Result<BigUint, Self::Error>;

    /// 使用私钥解密
    fn decrypt(private_key: &Self::PrivateKey, ciphertext: &BigUint)
    -> Result<BigUint, Self::Error>;

    /// 使用私钥签名
    fn sign(private_key: &Self::PrivateKey, message: &BigUint) -> Result<BigUint, Self::Error>;

    /// 使用公钥验证签名
    fn verify(public_key: &Self::PublicKey, signature: &BigUint, message: &BigUint) -> bool;

    /// 公钥指纹，用于日志与元数据
    fn fingerprint(public_key: &Self::PublicKey) -> String;

    /// 将公钥导出为 JSON
    fn export_public_key(public_key: &Self::PublicKey) -> Result<String, Self::Error>;

    /// 从 JSON 导入公钥
    fn import_public_key(key_data: &str) -> Result<Self::PublicKey, Self::Error>;
}
