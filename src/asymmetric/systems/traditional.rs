pub mod rsa;

pub use self::rsa::{RsaKeyPair, RsaPrivateKey, RsaPublicKey, TextbookRsa};
