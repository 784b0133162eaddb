use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsymmetricError {
    /// 随机源不可用，或素数搜索在限定次数内失败
    #[error("key generation failed: {0}")]
    KeyGeneration(String),
    /// 数值超出密钥运算的有效范围
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// 导入或构造的密钥不合法
    #[error("invalid key: {0}")]
    Key(String),
    #[error("serialization failed: {0}")]
    Serialization(String),
}
