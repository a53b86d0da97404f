// icon-crypto/src/lib.rs

//! Cryptographic primitives for signing ICON transactions
//!
//! This crate provides:
//! - SHA3-256 hashing
//! - secp256k1 key pairs and recoverable signatures
//! - `hx`/`cx` addresses
//! - The `Wallet` signing contract used by transaction signing

pub mod address;
pub mod hash;
pub mod keypair;
pub mod signature;

pub use address::{Address, AddressPrefix};
pub use hash::{Hash, Hashable, HASH_SIZE};
pub use keypair::{KeyPair, PublicKey, SecretKey, Wallet};
pub use signature::{RecoverableSignature, SIGNATURE_SIZE};

/// Result type for cryptographic operations
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur during cryptographic operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid public key")]
    InvalidPublicKey,

    #[error("Invalid secret key")]
    InvalidSecretKey,

    #[error("Invalid hash")]
    InvalidHash,

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}
