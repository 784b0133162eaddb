//! 门限秘密共享的拆分与恢复。
//!
//! 秘密的每个字节各自对应一个 `T - 1` 次随机多项式，常数项即该字节。
//! 份额 `i`（1..=N）保存所有多项式在 `x = i` 处的取值，字节布局为：
//!
//! ```text
//! [threshold][x][y_0 .. y_{L-1}]
//! ```
//!
//! 任意 `T` 个不同份额通过 `x = 0` 处的拉格朗日插值恢复秘密；少于 `T` 个份额
//! 不泄露任何信息。份额不带认证，被篡改的份额会得到错误的秘密而不会被检测出来。

use crate::common::config::SharingConfig;
use crate::common::utils::{from_base64, to_base64};
use crate::threshold::errors::SecretSharingError;
use crate::threshold::field::Gf256;
use rand_core::{OsRng, TryCryptoRng};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};
use std::fmt;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// 最小门限
pub const MIN_THRESHOLD: usize = 2;
/// x 坐标为 1..=255，因此最多 255 个份额
pub const MAX_SHARES: usize = 255;

const HEADER_LEN: usize = 2;

/// 单个份额：一个 `(x, y)` 点的不透明字节编码
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Share(Vec<u8>);

struct ParsedShare<'a> {
    threshold: usize,
    x: u8,
    payload: &'a [u8],
}

impl Share {
    /// 包装原始字节，解析推迟到恢复时进行
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Share(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(mut self) -> Vec<u8> {
        std::mem::take(&mut self.0)
    }

    pub fn to_base64(&self) -> String {
        to_base64(&self.0)
    }

    pub fn from_base64(encoded: &str) -> Result<Self, SecretSharingError> {
        from_base64(encoded)
            .map(Share)
            .map_err(|e| SecretSharingError::CorruptShare(format!("invalid base64: {e}")))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn from_hex(encoded: &str) -> Result<Self, SecretSharingError> {
        hex::decode(encoded.trim())
            .map(Share)
            .map_err(|e| SecretSharingError::CorruptShare(format!("invalid hex: {e}")))
    }

    /// 份额的 x 坐标，无法解析时为 `None`
    pub fn index(&self) -> Option<u8> {
        self.parse().ok().map(|parsed| parsed.x)
    }

    /// 份额记录的门限，无法解析时为 `None`
    pub fn threshold(&self) -> Option<usize> {
        self.parse().ok().map(|parsed| parsed.threshold)
    }

    fn parse(&self) -> Result<ParsedShare<'_>, SecretSharingError> {
        match self.0.as_slice() {
            [threshold, x, payload @ ..] if !payload.is_empty() => {
                if (*threshold as usize) < MIN_THRESHOLD {
                    return Err(SecretSharingError::CorruptShare(format!(
                        "threshold {threshold} is below {MIN_THRESHOLD}"
                    )));
                }
                if *x == 0 {
                    return Err(SecretSharingError::CorruptShare(
                        "share index must be non-zero".into(),
                    ));
                }
                Ok(ParsedShare {
                    threshold: *threshold as usize,
                    x: *x,
                    payload,
                })
            }
            _ => Err(SecretSharingError::CorruptShare(format!(
                "share must be at least {} bytes, got {}",
                HEADER_LEN + 1,
                self.0.len()
            ))),
        }
    }
}

impl fmt::Debug for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Share")
            .field("index", &self.index())
            .field("threshold", &self.threshold())
            .field("len", &self.0.len())
            .finish_non_exhaustive()
    }
}

impl Serialize for Share {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for Share {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Share::from_base64(&encoded).map_err(D::Error::custom)
    }
}

fn validate_parameters(
    secret_len: usize,
    share_count: usize,
    threshold: usize,
) -> Result<(), SecretSharingError> {
    if secret_len == 0 {
        return Err(SecretSharingError::InvalidParameter(
            "secret must not be empty".into(),
        ));
    }
    if threshold < MIN_THRESHOLD {
        return Err(SecretSharingError::InvalidParameter(format!(
            "threshold must be at least {MIN_THRESHOLD}, got {threshold}"
        )));
    }
    if threshold > share_count {
        return Err(SecretSharingError::InvalidParameter(format!(
            "threshold {threshold} exceeds share count {share_count}"
        )));
    }
    if share_count > MAX_SHARES {
        return Err(SecretSharingError::InvalidParameter(format!(
            "share count must be at most {MAX_SHARES}, got {share_count}"
        )));
    }
    Ok(())
}

/// 将秘密拆分为 `share_count` 个份额，任意 `threshold` 个即可恢复
pub fn split_secret(
    secret: &[u8],
    share_count: usize,
    threshold: usize,
) -> Result<Vec<Share>, SecretSharingError> {
    split_secret_with_rng(secret, share_count, threshold, &mut OsRng)
}

/// 使用给定随机源拆分秘密。每次调用都抽取新的多项式系数。
pub fn split_secret_with_rng<R: TryCryptoRng + ?Sized>(
    secret: &[u8],
    share_count: usize,
    threshold: usize,
    rng: &mut R,
) -> Result<Vec<Share>, SecretSharingError> {
    validate_parameters(secret.len(), share_count, threshold)?;

    let degree = threshold - 1;
    let mut randomness = Zeroizing::new(vec![0u8; secret.len() * degree]);
    rng.try_fill_bytes(&mut randomness)
        .map_err(|e| SecretSharingError::Entropy(e.to_string()))?;

    let mut shares: Vec<Share> = (1..=share_count)
        .map(|x| {
            let mut bytes = Vec::with_capacity(HEADER_LEN + secret.len());
            bytes.push(threshold as u8);
            bytes.push(x as u8);
            Share(bytes)
        })
        .collect();

    let mut coefficients = Zeroizing::new(vec![Gf256::ZERO; threshold]);
    for (byte, random) in secret.iter().zip(randomness.chunks_exact(degree)) {
        coefficients[0] = Gf256(*byte);
        for (slot, r) in coefficients[1..].iter_mut().zip(random) {
            *slot = Gf256(*r);
        }
        for share in shares.iter_mut() {
            let x = Gf256(share.0[1]);
            share.0.push(Gf256::evaluate(&coefficients, x).0);
        }
    }

    debug!(
        share_count,
        threshold,
        secret_len = secret.len(),
        "secret split"
    );
    Ok(shares)
}

/// 从份额中恢复秘密。
///
/// 相同的份额只计一次；同一 x 上内容不同的份额、来自不同拆分（门限或长度不一致）的份额
/// 都视为损坏。只使用前 `threshold` 个不同份额，多余的份额会被忽略。
pub fn combine_shares(shares: &[Share]) -> Result<Vec<u8>, SecretSharingError> {
    let first = shares
        .first()
        .ok_or(SecretSharingError::InsufficientShares {
            threshold: MIN_THRESHOLD,
            got: 0,
        })?
        .parse()?;
    let threshold = first.threshold;
    let secret_len = first.payload.len();

    let mut distinct: Vec<ParsedShare<'_>> = Vec::with_capacity(threshold);
    for share in shares {
        let parsed = share.parse()?;
        if parsed.threshold != threshold || parsed.payload.len() != secret_len {
            return Err(SecretSharingError::CorruptShare(
                "shares do not belong to the same split".into(),
            ));
        }
        match distinct.iter().find(|existing| existing.x == parsed.x) {
            Some(existing) if existing.payload == parsed.payload => continue,
            Some(_) => {
                return Err(SecretSharingError::CorruptShare(format!(
                    "conflicting shares for index {}",
                    parsed.x
                )));
            }
            None => distinct.push(parsed),
        }
    }

    if distinct.len() < threshold {
        return Err(SecretSharingError::InsufficientShares {
            threshold,
            got: distinct.len(),
        });
    }

    let quorum = &distinct[..threshold];
    let xs: Vec<Gf256> = quorum.iter().map(|share| Gf256(share.x)).collect();
    let basis = Gf256::lagrange_basis_at_zero(&xs).ok_or_else(|| {
        SecretSharingError::CorruptShare("share indices are not distinct".into())
    })?;

    let secret = (0..secret_len)
        .map(|i| {
            quorum
                .iter()
                .zip(&basis)
                .fold(Gf256::ZERO, |acc, (share, &l)| acc + Gf256(share.payload[i]) * l)
                .0
        })
        .collect();

    debug!(
        supplied = shares.len(),
        threshold,
        secret_len,
        "secret reconstructed"
    );
    Ok(secret)
}

/// 按固定配置拆分与恢复秘密
#[derive(Clone, Debug, Default)]
pub struct SecretSharer {
    config: SharingConfig,
}

impl SecretSharer {
    pub fn new(config: SharingConfig) -> Result<Self, SecretSharingError> {
        config
            .validate()
            .map_err(|e| SecretSharingError::InvalidParameter(e.to_string()))?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SharingConfig {
        &self.config
    }

    /// 以配置的 N 与 T 拆分秘密，秘密长度必须等于配置值
    pub fn split(&self, secret: &[u8]) -> Result<Vec<Share>, SecretSharingError> {
        self.split_with_rng(secret, &mut OsRng)
    }

    pub fn split_with_rng<R: TryCryptoRng + ?Sized>(
        &self,
        secret: &[u8],
        rng: &mut R,
    ) -> Result<Vec<Share>, SecretSharingError> {
        if secret.len() != self.config.secret_length {
            return Err(SecretSharingError::InvalidParameter(format!(
                "secret must be {} bytes, got {}",
                self.config.secret_length,
                secret.len()
            )));
        }
        split_secret_with_rng(secret, self.config.share_count, self.config.threshold, rng)
    }

    pub fn combine(&self, shares: &[Share]) -> Result<Vec<u8>, SecretSharingError> {
        let secret = combine_shares(shares)?;
        if secret.len() != self.config.secret_length {
            return Err(SecretSharingError::CorruptShare(format!(
                "shares encode a {}-byte secret, expected {}",
                secret.len(),
                self.config.secret_length
            )));
        }
        Ok(secret)
    }
}
