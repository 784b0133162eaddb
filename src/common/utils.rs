use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256};

/// 安全地比较两个字节序列，防止时序攻击
///
/// 无论输入如何，此函数总是比较所有字节，但只有所有字节都匹配才返回true
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0;
    for (byte_a, byte_b) in a.iter().zip(b.iter()) {
        result |= byte_a ^ byte_b;
    }

    result == 0
}

/// 标准 Base64 编码
pub fn to_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// 标准 Base64 解码
pub fn from_base64(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(encoded.trim())
}

/// 计算 SHA-256 指纹并以十六进制返回
pub fn sha256_fingerprint(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        // 长度前缀避免不同拆分产生相同摘要
        hasher.update((part.len() as u64).to_be_bytes());
        hasher.update(part);
    }
    hex::encode(hasher.finalize())
}

/// 以大端字节的 Base64 字符串序列化 `BigUint`
pub mod biguint_base64 {
    use num_bigint::BigUint;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_base64(&value.to_bytes_be()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let bytes = super::from_base64(&encoded).map_err(D::Error::custom)?;
        Ok(BigUint::from_bytes_be(&bytes))
    }
}
