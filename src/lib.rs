//! # Quorum-Seal: Textbook RSA and Threshold Secret Sharing
//!
//! `quorum-seal` is the cryptographic core behind a small key service. It provides two
//! independent primitives:
//!
//! - **RSA** over arbitrary-precision integers: key-pair generation, encryption,
//!   decryption, signing and verification with textbook (unpadded) semantics.
//! - **Threshold secret sharing**: split a byte secret into `N` shares so that any `T`
//!   of them reconstruct it, and fewer reveal nothing.
//!
//! Transport concerns (HTTP routing, request parsing) live outside this crate. Values
//! cross that boundary as base64 or hex strings; the helpers on [`RsaPublicKey`] and
//! [`Share`] cover the encodings the front end needs.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quorum_seal::{combine_shares, generate_key_pair, split_secret};
//! use num_bigint::BigUint;
//!
//! fn main() -> Result<(), quorum_seal::Error> {
//!     let key_pair = generate_key_pair(1024)?;
//!     let message = BigUint::from(42u32);
//!
//!     let ciphertext = key_pair.public_key().encrypt(&message)?;
//!     assert_eq!(key_pair.private_key().decrypt(&ciphertext)?, message);
//!
//!     let signature = key_pair.private_key().sign(&message)?;
//!     assert!(key_pair.public_key().verify(&signature, &message));
//!
//!     let secret = [7u8; 64];
//!     let shares = split_secret(&secret, 10, 4)?;
//!     assert_eq!(combine_shares(&shares[..4])?, secret.to_vec());
//!     Ok(())
//! }
//! ```
//!
//! ## Security notes
//!
//! Textbook RSA is deterministic and malleable. It is exposed here because the
//! surrounding service exercises it directly; anything beyond demonstration should
//! layer OAEP (encryption) and PSS (signatures) on top.

pub mod asymmetric;
pub mod common;
pub mod error;
pub mod threshold;

pub use asymmetric::errors::AsymmetricError;
pub use asymmetric::rotation::{KeyContext, KeyMetadata, ManagedKeyPair};
pub use asymmetric::systems::traditional::rsa::{
    RsaKeyPair, RsaPrivateKey, RsaPublicKey, TextbookRsa, generate_key_pair,
};
pub use asymmetric::traits::AsymmetricCryptographicSystem;
pub use common::config::{ConfigFile, CryptoConfig, SharingConfig};
pub use error::Error;
pub use threshold::errors::SecretSharingError;
pub use threshold::sharer::{SecretSharer, Share, combine_shares, split_secret};

/// The version of the `quorum-seal` crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
