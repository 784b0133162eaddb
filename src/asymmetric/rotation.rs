//! 密钥上下文：持有当前密钥对并支持原子轮换。
//!
//! 读操作（加密、验证、解密、签名）通过 `ArcSwap` 取得一致的快照，无需加锁；
//! 轮换在锁外生成新密钥对，然后一次性发布，进行中的操作不会看到半更新的状态。

use crate::asymmetric::errors::AsymmetricError;
use crate::asymmetric::systems::traditional::rsa::{RsaKeyPair, TextbookRsa};
use crate::asymmetric::traits::AsymmetricCryptographicSystem;
use crate::common::config::CryptoConfig;
use arc_swap::ArcSwap;
use chrono::Utc;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// 密钥元数据结构
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct KeyMetadata {
    /// 密钥唯一标识符
    pub id: String,
    /// 密钥创建时间（RFC 3339）
    pub created_at: String,
    /// 密钥版本，每次轮换加一
    pub version: u32,
    /// 算法标识符
    pub algorithm: String,
    /// 公钥指纹
    pub fingerprint: String,
}

/// 带元数据的密钥对快照
pub struct ManagedKeyPair<C: AsymmetricCryptographicSystem> {
    public_key: C::PublicKey,
    private_key: C::PrivateKey,
    metadata: KeyMetadata,
}

impl<C: AsymmetricCryptographicSystem> ManagedKeyPair<C> {
    fn new(public_key: C::PublicKey, private_key: C::PrivateKey, version: u32) -> Self {
        let metadata = KeyMetadata {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now().to_rfc3339(),
            version,
            algorithm: C::ALGORITHM.to_string(),
            fingerprint: C::fingerprint(&public_key),
        };
        Self {
            public_key,
            private_key,
            metadata,
        }
    }

    pub fn public_key(&self) -> &C::PublicKey {
        &self.public_key
    }

    pub fn private_key(&self) -> &C::PrivateKey {
        &self.private_key
    }

    pub fn metadata(&self) -> &KeyMetadata {
        &self.metadata
    }
}

impl<C: AsymmetricCryptographicSystem> fmt::Debug for ManagedKeyPair<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedKeyPair")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// 进程内的密钥上下文，作为依赖显式注入到各个操作中
pub struct KeyContext<C: AsymmetricCryptographicSystem = TextbookRsa> {
    config: CryptoConfig,
    current: ArcSwap<ManagedKeyPair<C>>,
}

impl KeyContext<TextbookRsa> {
    /// 按配置生成第一把 RSA 密钥对并创建上下文
    pub fn new(config: CryptoConfig) -> Result<Self, AsymmetricError> {
        Self::generate(config)
    }

    /// 用已有的 RSA 密钥对创建上下文（版本为 1）
    pub fn from_key_pair(config: CryptoConfig, key_pair: RsaKeyPair) -> Self {
        let (public_key, private_key) = key_pair.into_parts();
        Self::from_keys(config, public_key, private_key)
    }
}

impl<C: AsymmetricCryptographicSystem> KeyContext<C> {
    /// 生成第一把密钥对并创建上下文
    pub fn generate(config: CryptoConfig) -> Result<Self, C::Error> {
        let (public_key, private_key) = C::generate_keypair(&config)?;
        Ok(Self::from_keys(config, public_key, private_key))
    }

    /// 用已有的公私钥创建上下文（版本为 1）
    pub fn from_keys(
        config: CryptoConfig,
        public_key: C::PublicKey,
        private_key: C::PrivateKey,
    ) -> Self {
        let managed = ManagedKeyPair::new(public_key, private_key, 1);
        info!(
            id = %managed.metadata.id,
            fingerprint = %managed.metadata.fingerprint,
            "key context initialized"
        );
        Self {
            config,
            current: ArcSwap::from_pointee(managed),
        }
    }

    pub fn config(&self) -> &CryptoConfig {
        &self.config
    }

    /// 当前密钥对的一致快照。持有快照期间的操作不受并发轮换影响。
    pub fn current(&self) -> Arc<ManagedKeyPair<C>> {
        self.current.load_full()
    }

    pub fn metadata(&self) -> KeyMetadata {
        self.current.load().metadata.clone()
    }

    pub fn public_key(&self) -> C::PublicKey {
        self.current.load().public_key.clone()
    }

    pub fn encrypt(&self, message: &BigUint) -> Result<BigUint, C::Error> {
        C::encrypt(&self.current.load().public_key, message)
    }

    pub fn decrypt(&self, ciphertext: &BigUint) -> Result<BigUint, C::Error> {
        C::decrypt(&self.current.load().private_key, ciphertext)
    }

    pub fn sign(&self, message: &BigUint) -> Result<BigUint, C::Error> {
        C::sign(&self.current.load().private_key, message)
    }

    pub fn verify(&self, signature: &BigUint, message: &BigUint) -> bool {
        C::verify(&self.current.load().public_key, signature, message)
    }

    /// 生成新的密钥对并原子替换当前密钥对。
    ///
    /// 生成失败时保留原有密钥对。
    pub fn rotate(&self) -> Result<KeyMetadata, C::Error> {
        match C::generate_keypair(&self.config) {
            Ok((public_key, private_key)) => Ok(self.replace(public_key, private_key)),
            Err(e) => {
                warn!(error = %e, "key rotation failed, keeping current key pair");
                Err(e)
            }
        }
    }

    /// 原子地安装外部提供的密钥对，版本号在当前版本上加一
    pub fn replace(&self, public_key: C::PublicKey, private_key: C::PrivateKey) -> KeyMetadata {
        let mut installed = None;
        let previous = self.current.rcu(|old| {
            let managed = ManagedKeyPair::<C>::new(
                public_key.clone(),
                private_key.clone(),
                old.metadata.version + 1,
            );
            installed = Some(managed.metadata.clone());
            Arc::new(managed)
        });

        // rcu 至少调用一次闭包
        let metadata = installed.unwrap_or_else(|| previous.metadata.clone());
        info!(
            id = %metadata.id,
            version = metadata.version,
            previous_version = previous.metadata.version,
            fingerprint = %metadata.fingerprint,
            "key pair rotated"
        );
        metadata
    }
}
