//!
//! # 通用配置模块
//!
//! 包含密码学核心所使用的配置结构。
//! 这些结构定义了 RSA 密钥生成参数以及秘密共享的默认份额与门限。
//!
use crate::error::Error;
use num_integer::Integer;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 允许的最小 RSA 模数位数
pub const MIN_RSA_KEY_BITS: usize = 128;

/// RSA 密钥生成配置
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CryptoConfig {
    /// 模数 n 的位数，每个素因子各占一半
    pub rsa_key_bits: usize,
    /// 固定的公钥指数 e
    pub public_exponent: u64,
    /// Miller-Rabin 轮数
    pub primality_rounds: usize,
    /// 单个素数搜索允许的最大候选数
    pub max_prime_attempts: usize,
    /// 解密与签名是否使用 CRT 加速
    pub use_crt: bool,
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            rsa_key_bits: 1024,
            public_exponent: 65537,
            primality_rounds: 40,
            max_prime_attempts: 100_000,
            use_crt: true,
        }
    }
}

impl CryptoConfig {
    /// 使用指定位数构造配置，其余字段取默认值
    pub fn with_bits(rsa_key_bits: usize) -> Self {
        Self {
            rsa_key_bits,
            ..Default::default()
        }
    }

    /// 校验参数是否可用于密钥生成
    pub fn validate(&self) -> Result<(), Error> {
        if self.rsa_key_bits < MIN_RSA_KEY_BITS {
            return Err(Error::Config(format!(
                "rsa_key_bits must be at least {MIN_RSA_KEY_BITS}, got {}",
                self.rsa_key_bits
            )));
        }
        if self.public_exponent < 3 || self.public_exponent.is_even() {
            return Err(Error::Config(format!(
                "public_exponent must be an odd integer >= 3, got {}",
                self.public_exponent
            )));
        }
        if self.primality_rounds == 0 {
            return Err(Error::Config("primality_rounds must be non-zero".into()));
        }
        if self.max_prime_attempts == 0 {
            return Err(Error::Config("max_prime_attempts must be non-zero".into()));
        }
        Ok(())
    }
}

/// 秘密共享配置
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SharingConfig {
    /// 秘密的固定字节长度
    pub secret_length: usize,
    /// 生成的份额数 N
    pub share_count: usize,
    /// 恢复所需的门限 T
    pub threshold: usize,
}

impl Default for SharingConfig {
    fn default() -> Self {
        Self {
            secret_length: 64,
            share_count: 10,
            threshold: 4,
        }
    }
}

impl SharingConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.secret_length == 0 {
            return Err(Error::Config("secret_length must be non-zero".into()));
        }
        if self.threshold < 2 {
            return Err(Error::Config(format!(
                "threshold must be at least 2, got {}",
                self.threshold
            )));
        }
        if self.threshold > self.share_count {
            return Err(Error::Config(format!(
                "threshold {} exceeds share_count {}",
                self.threshold, self.share_count
            )));
        }
        if self.share_count > 255 {
            return Err(Error::Config(format!(
                "share_count must be at most 255, got {}",
                self.share_count
            )));
        }
        Ok(())
    }
}

/// 完整配置文件，代表了密码学核心的所有可配置项。
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct ConfigFile {
    /// 加密配置
    #[serde(default)]
    pub crypto: CryptoConfig,
    /// 秘密共享配置
    #[serde(default)]
    pub sharing: SharingConfig,
}

impl ConfigFile {
    /// 从 JSON 字符串解析并校验配置，缺失的字段使用默认值
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let config: ConfigFile = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件加载配置
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// 序列化为格式化的 JSON
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), Error> {
        self.crypto.validate()?;
        self.sharing.validate()
    }
}
