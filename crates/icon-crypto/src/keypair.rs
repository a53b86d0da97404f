// icon-crypto/src/keypair.rs

use crate::{Address, CryptoError, CryptoResult, Hash, RecoverableSignature};
use secp256k1::{Message, Secp256k1};
use std::fmt;

/// Signing capability consumed by transaction signing.
///
/// Implementations may keep the key in memory, in a hardware module or
/// behind a remote service; callers only need the address and a signature
/// over a 32-byte digest.
pub trait Wallet: Send + Sync {
    /// Address derived from the wallet's public key
    fn address(&self) -> Address;

    /// Sign a 32-byte message digest
    fn sign(&self, digest: &Hash) -> CryptoResult<RecoverableSignature>;
}

/// secp256k1 public key
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(secp256k1::PublicKey);

impl PublicKey {
    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        secp256k1::PublicKey::from_slice(bytes)
            .map(Self)
            .map_err(|_| CryptoError::InvalidPublicKey)
    }

    /// 65-byte uncompressed form starting with `0x04`
    pub fn serialize_uncompressed(&self) -> [u8; 65] {
        self.0.serialize_uncompressed()
    }

    /// 33-byte compressed form
    pub fn serialize(&self) -> [u8; 33] {
        self.0.serialize()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.serialize_uncompressed())
    }

    /// Derive an address from this public key
    pub fn to_address(&self) -> Address {
        Address::from_public_key(self)
    }
}

impl From<secp256k1::PublicKey> for PublicKey {
    fn from(key: secp256k1::PublicKey) -> Self {
        Self(key)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({}...)", hex::encode(&self.serialize()[..8]))
    }
}

/// Secret/Private key wrapper (kept private)
pub struct SecretKey {
    bytes: [u8; 32],
}

impl SecretKey {
    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        // validates the scalar range
        let key = secp256k1::SecretKey::from_slice(bytes)
            .map_err(|_| CryptoError::InvalidSecretKey)?;
        Ok(Self { bytes: key.secret_bytes() })
    }

    pub fn from_hex(s: &str) -> CryptoResult<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)
            .map_err(|e| CryptoError::DeserializationError(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    fn to_secp256k1(&self) -> CryptoResult<secp256k1::SecretKey> {
        secp256k1::SecretKey::from_slice(&self.bytes).map_err(|_| CryptoError::InvalidSecretKey)
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        // Zero out the key material on drop for security
        self.bytes.iter_mut().for_each(|b| *b = 0);
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey([REDACTED])")
    }
}

/// In-memory secp256k1 key pair; the default `Wallet`
pub struct KeyPair {
    public_key: PublicKey,
    secret_key: SecretKey,
    address: Address,
}

impl KeyPair {
    /// Generate a new random keypair
    pub fn generate() -> Self {
        use rand::rngs::OsRng;

        let secp = Secp256k1::signing_only();
        let (secret_key, public_key) = secp.generate_keypair(&mut OsRng);
        let public_key = PublicKey::from(public_key);

        Self {
            address: public_key.to_address(),
            public_key,
            secret_key: SecretKey { bytes: secret_key.secret_bytes() },
        }
    }

    /// Load a keypair from an existing secret key
    pub fn from_secret_key(secret_key: SecretKey) -> CryptoResult<Self> {
        let secp = Secp256k1::signing_only();
        let public_key = PublicKey::from(secp256k1::PublicKey::from_secret_key(
            &secp,
            &secret_key.to_secp256k1()?,
        ));

        Ok(Self {
            address: public_key.to_address(),
            public_key,
            secret_key,
        })
    }

    pub fn from_hex(secret_hex: &str) -> CryptoResult<Self> {
        Self::from_secret_key(SecretKey::from_hex(secret_hex)?)
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign a digest, producing a recoverable signature
    pub fn sign(&self, digest: &Hash) -> CryptoResult<RecoverableSignature> {
        let secp = Secp256k1::signing_only();
        let message = Message::from_digest_slice(digest.as_bytes())
            .map_err(|_| CryptoError::InvalidHash)?;

        let signature = secp.sign_ecdsa_recoverable(&message, &self.secret_key.to_secp256k1()?);
        Ok(RecoverableSignature::from_secp256k1(&signature))
    }
}

impl Wallet for KeyPair {
    fn address(&self) -> Address {
        self.address
    }

    fn sign(&self, digest: &Hash) -> CryptoResult<RecoverableSignature> {
        KeyPair::sign(self, digest)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("address", &self.address)
            .field("public_key", &self.public_key)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}
