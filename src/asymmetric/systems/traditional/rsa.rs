//! `TextbookRsa` 提供了不带填充的教科书 RSA：密钥生成、加解密与签名验证。
//!
//! 消息、密文与签名都是 `[0, n)` 内的整数。加密是确定性的，签名不做哈希与填充，
//! 因此具有可延展性；在演示之外的场景应在其上叠加 OAEP 与 PSS。

use crate::asymmetric::arithmetic::{generate_prime, mod_inverse, mod_pow, wipe};
use crate::asymmetric::errors::AsymmetricError;
use crate::asymmetric::traits::AsymmetricCryptographicSystem;
use crate::common::config::CryptoConfig;
use crate::common::utils::{biguint_base64, constant_time_eq, sha256_fingerprint};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;
use rand_core::{OsRng, TryCryptoRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::info;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// 生成两个不同素数时允许的最大重试次数
const MAX_DISTINCT_PRIME_RETRIES: usize = 16;

/// RSA 公钥 `{e, n}`，可以自由分发
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PublicKeyDocument", into = "PublicKeyDocument")]
pub struct RsaPublicKey {
    e: BigUint,
    n: BigUint,
}

/// 公钥的传输格式：大端字节的 Base64
#[derive(Clone, Serialize, Deserialize)]
struct PublicKeyDocument {
    #[serde(with = "biguint_base64")]
    e: BigUint,
    #[serde(with = "biguint_base64")]
    n: BigUint,
}

impl TryFrom<PublicKeyDocument> for RsaPublicKey {
    type Error = AsymmetricError;

    fn try_from(doc: PublicKeyDocument) -> Result<Self, Self::Error> {
        RsaPublicKey::new(doc.n, doc.e)
    }
}

impl From<RsaPublicKey> for PublicKeyDocument {
    fn from(key: RsaPublicKey) -> Self {
        PublicKeyDocument { e: key.e, n: key.n }
    }
}

impl RsaPublicKey {
    /// 由模数与公钥指数构造公钥
    pub fn new(n: BigUint, e: BigUint) -> Result<Self, AsymmetricError> {
        if n <= BigUint::from(2u32) {
            return Err(AsymmetricError::Key("modulus is too small".into()));
        }
        if e < BigUint::from(3u32) || e.is_even() || e >= n {
            return Err(AsymmetricError::Key(
                "public exponent must be odd and lie in [3, n)".into(),
            ));
        }
        Ok(Self { e, n })
    }

    pub fn n(&self) -> &BigUint {
        &self.n
    }

    pub fn e(&self) -> &BigUint {
        &self.e
    }

    /// 模数的位数
    pub fn bits(&self) -> u64 {
        self.n.bits()
    }

    /// 计算 `message^e mod n`。
    ///
    /// 消息必须满足 `message < n`，否则返回 [`AsymmetricError::InvalidInput`]。
    pub fn encrypt(&self, message: &BigUint) -> Result<BigUint, AsymmetricError> {
        if message >= &self.n {
            return Err(AsymmetricError::InvalidInput(
                "message must be less than the modulus".into(),
            ));
        }
        Ok(mod_pow(message, &self.e, &self.n))
    }

    /// 检查 `signature^e mod n` 是否等于 `message`
    pub fn verify(&self, signature: &BigUint, message: &BigUint) -> bool {
        if signature >= &self.n || message >= &self.n {
            return false;
        }
        let recovered = mod_pow(signature, &self.e, &self.n);
        let width = self.n.to_bytes_be().len();
        constant_time_eq(
            &left_pad(recovered.to_bytes_be(), width),
            &left_pad(message.to_bytes_be(), width),
        )
    }

    /// SHA-256 指纹（十六进制），覆盖 n 与 e
    pub fn fingerprint(&self) -> String {
        sha256_fingerprint(&[&self.n.to_bytes_be(), &self.e.to_bytes_be()])
    }
}

fn left_pad(bytes: Vec<u8>, width: usize) -> Vec<u8> {
    if bytes.len() >= width {
        return bytes;
    }
    let mut padded = vec![0u8; width - bytes.len()];
    padded.extend_from_slice(&bytes);
    padded
}

#[cfg(feature = "pem")]
impl RsaPublicKey {
    fn to_interop(&self) -> Result<::rsa::RsaPublicKey, AsymmetricError> {
        ::rsa::RsaPublicKey::new(
            ::rsa::BigUint::from_bytes_be(&self.n.to_bytes_be()),
            ::rsa::BigUint::from_bytes_be(&self.e.to_bytes_be()),
        )
        .map_err(|e| AsymmetricError::Serialization(format!("公钥不受 PKCS#8 支持: {e}")))
    }

    fn from_interop(key: &::rsa::RsaPublicKey) -> Result<Self, AsymmetricError> {
        use ::rsa::traits::PublicKeyParts;

        Self::new(
            BigUint::from_bytes_be(&key.n().to_bytes_be()),
            BigUint::from_bytes_be(&key.e().to_bytes_be()),
        )
    }

    /// 导出为 SubjectPublicKeyInfo PEM
    pub fn to_pem(&self) -> Result<String, AsymmetricError> {
        use ::rsa::pkcs8::{EncodePublicKey, LineEnding};

        self.to_interop()?
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| AsymmetricError::Serialization(format!("RSA公钥导出失败: {e}")))
    }

    /// 从 SubjectPublicKeyInfo PEM 导入
    pub fn from_pem(pem: &str) -> Result<Self, AsymmetricError> {
        use ::rsa::pkcs8::DecodePublicKey;

        let key = ::rsa::RsaPublicKey::from_public_key_pem(pem)
            .map_err(|e| AsymmetricError::Key(format!("导入RSA公钥失败: {e}")))?;
        Self::from_interop(&key)
    }

    /// 导出为 DER 编码
    pub fn to_der(&self) -> Result<Vec<u8>, AsymmetricError> {
        use ::rsa::pkcs8::EncodePublicKey;

        let der = self
            .to_interop()?
            .to_public_key_der()
            .map_err(|e| AsymmetricError::Serialization(format!("导出RSA公钥DER失败: {e}")))?;
        Ok(der.as_bytes().to_vec())
    }

    /// 从 DER 编码导入
    pub fn from_der(der: &[u8]) -> Result<Self, AsymmetricError> {
        use ::rsa::pkcs8::DecodePublicKey;

        let key = ::rsa::RsaPublicKey::from_public_key_der(der)
            .map_err(|e| AsymmetricError::Key(format!("解析RSA公钥失败: {e}")))?;
        Self::from_interop(&key)
    }
}

/// CRT 加速参数
#[derive(Clone, PartialEq, Eq)]
struct CrtParams {
    p: BigUint,
    q: BigUint,
    dp: BigUint,
    dq: BigUint,
    qinv: BigUint,
}

impl Zeroize for CrtParams {
    fn zeroize(&mut self) {
        for value in [
            &mut self.p,
            &mut self.q,
            &mut self.dp,
            &mut self.dq,
            &mut self.qinv,
        ] {
            wipe(value);
        }
    }
}

impl Drop for CrtParams {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// RSA 私钥 `{d, n}`，只存在于生成它的进程内存中。
///
/// 由本模块生成的私钥还保留 p、q 及 CRT 参数，解密与签名会使用 CRT 加速。
/// 私钥被丢弃时 `d` 与 CRT 参数会被原地覆盖，公开的模数 `n` 保持不变。
#[derive(Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    d: BigUint,
    n: BigUint,
    crt: Option<CrtParams>,
}

impl fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("bits", &self.n.bits())
            .field("crt", &self.crt.is_some())
            .finish_non_exhaustive()
    }
}

impl Zeroize for RsaPrivateKey {
    fn zeroize(&mut self) {
        wipe(&mut self.d);
        if let Some(crt) = self.crt.as_mut() {
            crt.zeroize();
        }
    }
}

impl Drop for RsaPrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for RsaPrivateKey {}

impl RsaPrivateKey {
    /// 仅由 `(n, d)` 构造私钥，不使用 CRT
    pub fn new(n: BigUint, d: BigUint) -> Result<Self, AsymmetricError> {
        if n <= BigUint::from(2u32) {
            return Err(AsymmetricError::Key("modulus is too small".into()));
        }
        if d <= BigUint::one() || d >= n {
            return Err(AsymmetricError::Key(
                "private exponent must lie in (1, n)".into(),
            ));
        }
        Ok(Self { d, n, crt: None })
    }

    pub fn n(&self) -> &BigUint {
        &self.n
    }

    pub fn private_exponent(&self) -> &BigUint {
        &self.d
    }

    /// 返回素因子 `(p, q)`，如果私钥保留了它们
    pub fn primes(&self) -> Option<(&BigUint, &BigUint)> {
        self.crt.as_ref().map(|crt| (&crt.p, &crt.q))
    }

    /// 丢弃 CRT 参数，只保留 `(n, d)`
    pub fn without_crt(&self) -> Self {
        Self {
            d: self.d.clone(),
            n: self.n.clone(),
            crt: None,
        }
    }

    /// 计算 `ciphertext^d mod n`，是 [`RsaPublicKey::encrypt`] 的逆运算
    pub fn decrypt(&self, ciphertext: &BigUint) -> Result<BigUint, AsymmetricError> {
        if ciphertext >= &self.n {
            return Err(AsymmetricError::InvalidInput(
                "ciphertext must be less than the modulus".into(),
            ));
        }
        Ok(self.apply_private(ciphertext))
    }

    /// 计算 `message^d mod n`，不做哈希与填充
    pub fn sign(&self, message: &BigUint) -> Result<BigUint, AsymmetricError> {
        if message >= &self.n {
            return Err(AsymmetricError::InvalidInput(
                "message must be less than the modulus".into(),
            ));
        }
        Ok(self.apply_private(message))
    }

    fn apply_private(&self, value: &BigUint) -> BigUint {
        match &self.crt {
            Some(crt) => {
                let m1 = mod_pow(value, &crt.dp, &crt.p);
                let m2 = mod_pow(value, &crt.dq, &crt.q);
                // h = qinv * (m1 - m2) mod p
                let diff = (&m1 + &crt.p - (&m2 % &crt.p)) % &crt.p;
                let h = (&crt.qinv * diff) % &crt.p;
                m2 + h * &crt.q
            }
            None => mod_pow(value, &self.d, &self.n),
        }
    }
}

/// 共享同一模数的一对 RSA 密钥。轮换时整体替换，不做局部修改。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaKeyPair {
    public_key: RsaPublicKey,
    private_key: RsaPrivateKey,
}

impl RsaKeyPair {
    /// 使用系统随机源生成 `bits` 位的密钥对
    pub fn generate(bits: usize) -> Result<Self, AsymmetricError> {
        Self::generate_with_config(&CryptoConfig::with_bits(bits))
    }

    /// 按配置使用系统随机源生成密钥对
    pub fn generate_with_config(config: &CryptoConfig) -> Result<Self, AsymmetricError> {
        Self::generate_with_rng(config, &mut OsRng)
    }

    /// 使用给定的随机源生成密钥对。
    ///
    /// p 与 q 各占一半位数，`gcd(e, p - 1) = gcd(e, q - 1) = 1` 保证 e 与 φ(n) 互素。
    pub fn generate_with_rng<R: TryCryptoRng + ?Sized>(
        config: &CryptoConfig,
        rng: &mut R,
    ) -> Result<Self, AsymmetricError> {
        config
            .validate()
            .map_err(|e| AsymmetricError::KeyGeneration(e.to_string()))?;

        let started = Instant::now();
        let bits = config.rsa_key_bits;
        let q_bits = bits / 2;
        let p_bits = bits - q_bits;
        let e = BigUint::from(config.public_exponent);

        for _ in 0..MAX_DISTINCT_PRIME_RETRIES {
            let p = generate_prime(rng, p_bits, config)?;
            let q = generate_prime(rng, q_bits, config)?;
            if p == q {
                continue;
            }

            let mut pair = Self::from_primes(p, q, e.clone())
                .map_err(|err| AsymmetricError::KeyGeneration(err.to_string()))?;
            if !config.use_crt {
                pair.private_key = pair.private_key.without_crt();
            }

            info!(
                bits,
                fingerprint = %pair.public_key.fingerprint(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "RSA key pair generated"
            );
            return Ok(pair);
        }

        Err(AsymmetricError::KeyGeneration(
            "failed to draw two distinct primes".into(),
        ))
    }

    /// 由两个素数与公钥指数推导完整密钥对，`d = e^-1 mod (p-1)(q-1)`
    pub fn from_primes(p: BigUint, q: BigUint, e: BigUint) -> Result<Self, AsymmetricError> {
        if p == q {
            return Err(AsymmetricError::Key("p and q must be distinct".into()));
        }
        if p <= BigUint::one() || q <= BigUint::one() {
            return Err(AsymmetricError::Key(
                "p and q must be greater than 1".into(),
            ));
        }

        let n = &p * &q;
        let mut p_minus_one = &p - 1u32;
        let mut q_minus_one = &q - 1u32;
        let mut phi = &p_minus_one * &q_minus_one;

        let public_key = RsaPublicKey::new(n.clone(), e)?;
        let d = mod_inverse(&public_key.e, &phi).ok_or_else(|| {
            AsymmetricError::Key("public exponent is not coprime to phi(n)".into())
        })?;
        let qinv = mod_inverse(&q, &p)
            .ok_or_else(|| AsymmetricError::Key("q is not invertible modulo p".into()))?;

        let crt = CrtParams {
            dp: &d % &p_minus_one,
            dq: &d % &q_minus_one,
            qinv,
            p,
            q,
        };
        for value in [&mut p_minus_one, &mut q_minus_one, &mut phi] {
            wipe(value);
        }

        Ok(Self {
            public_key,
            private_key: RsaPrivateKey {
                d,
                n,
                crt: Some(crt),
            },
        })
    }

    /// 由已有的公私钥组装密钥对，两者必须共享模数
    pub fn from_keys(
        public_key: RsaPublicKey,
        private_key: RsaPrivateKey,
    ) -> Result<Self, AsymmetricError> {
        if public_key.n != private_key.n {
            return Err(AsymmetricError::Key(
                "public and private keys do not share a modulus".into(),
            ));
        }
        Ok(Self {
            public_key,
            private_key,
        })
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }

    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private_key
    }

    pub fn into_parts(self) -> (RsaPublicKey, RsaPrivateKey) {
        (self.public_key, self.private_key)
    }
}

/// 使用系统随机源生成 `bits` 位的 RSA 密钥对
pub fn generate_key_pair(bits: usize) -> Result<RsaKeyPair, AsymmetricError> {
    RsaKeyPair::generate(bits)
}

/// 教科书 RSA 系统实现
pub struct TextbookRsa;

impl AsymmetricCryptographicSystem for TextbookRsa {
    type PublicKey = RsaPublicKey;
    type PrivateKey = RsaPrivateKey;
    type Error = AsymmetricError;

    const ALGORITHM: &'static str = "RSA-textbook";

    fn generate_keypair(
        config: &CryptoConfig,
    ) -> Result<(Self::PublicKey, Self::PrivateKey), Self::Error> {
        Ok(RsaKeyPair::generate_with_config(config)?.into_parts())
    }

    fn encrypt(public_key: &Self::PublicKey, message: &BigUint) -> Result<BigUint, Self::Error> {
        public_key.encrypt(message)
    }

    fn decrypt(
        private_key: &Self::PrivateKey,
        ciphertext: &BigUint,
    ) -> Result<BigUint, Self::Error> {
        private_key.decrypt(ciphertext)
    }

    fn sign(private_key: &Self::PrivateKey, message: &BigUint) -> Result<BigUint, Self::Error> {
        private_key.sign(message)
    }

    fn verify(public_key: &Self::PublicKey, signature: &BigUint, message: &BigUint) -> bool {
        public_key.verify(signature, message)
    }

    fn fingerprint(public_key: &Self::PublicKey) -> String {
        public_key.fingerprint()
    }

    fn export_public_key(public_key: &Self::PublicKey) -> Result<String, Self::Error> {
        serde_json::to_string(public_key)
            .map_err(|e| AsymmetricError::Serialization(format!("RSA公钥导出失败: {e}")))
    }

    fn import_public_key(key_data: &str) -> Result<Self::PublicKey, Self::Error> {
        serde_json::from_str(key_data)
            .map_err(|e| AsymmetricError::Key(format!("导入RSA公钥失败: {e}")))
    }
}
