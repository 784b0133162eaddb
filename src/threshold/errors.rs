use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecretSharingError {
    /// 份额数、门限或秘密长度不合法
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// 不同的有效份额数量少于门限
    #[error("insufficient shares for recovery: need {threshold}, got {got}")]
    InsufficientShares { threshold: usize, got: usize },
    /// 份额无法解析为有效的 (x, y)，或与其他份额冲突
    #[error("corrupt share: {0}")]
    CorruptShare(String),
    /// 随机源不可用
    #[error("random source unavailable: {0}")]
    Entropy(String),
}
