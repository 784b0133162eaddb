//! Defines the custom error type for the `quorum-seal` crate.

use crate::asymmetric::errors::AsymmetricError;
use crate::threshold::errors::SecretSharingError;
use thiserror::Error;

/// The main error type for the `quorum-seal` crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error("asymmetric cryptographic error: {0}")]
    Asymmetric(#[from] AsymmetricError),

    #[error("secret sharing error: {0}")]
    SecretSharing(#[from] SecretSharingError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
