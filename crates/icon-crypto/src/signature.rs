// icon-crypto/src/signature.rs

use crate::{Address, CryptoError, CryptoResult, Hash, PublicKey};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use secp256k1::ecdsa::{RecoverableSignature as Secp256k1RecSig, RecoveryId};
use secp256k1::{Message, Secp256k1};
use std::fmt;

/// Serialized signature size: `r` (32) ‖ `s` (32) ‖ recovery id (1)
pub const SIGNATURE_SIZE: usize = 65;

/// secp256k1 signature from which the signer's public key can be recovered
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RecoverableSignature([u8; SIGNATURE_SIZE]);

impl RecoverableSignature {
    pub fn new(bytes: [u8; SIGNATURE_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(slice: &[u8]) -> CryptoResult<Self> {
        let bytes: [u8; SIGNATURE_SIZE] = slice.try_into().map_err(|_| CryptoError::InvalidSignature)?;
        Ok(Self(bytes))
    }

    pub(crate) fn from_secp256k1(signature: &Secp256k1RecSig) -> Self {
        let (recovery_id, compact) = signature.serialize_compact();
        let mut bytes = [0u8; SIGNATURE_SIZE];
        bytes[..64].copy_from_slice(&compact);
        bytes[64] = recovery_id.to_i32() as u8;
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_SIZE] {
        &self.0
    }

    pub fn r(&self) -> &[u8] {
        &self.0[..32]
    }

    pub fn s(&self) -> &[u8] {
        &self.0[32..64]
    }

    pub fn recovery_id(&self) -> u8 {
        self.0[64]
    }

    /// The form carried in the `signature` field of a transaction
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }

    pub fn from_base64(s: &str) -> CryptoResult<Self> {
        let bytes = STANDARD.decode(s)
            .map_err(|e| CryptoError::DeserializationError(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Recover the public key that signed `digest`
    pub fn recover(&self, digest: &Hash) -> CryptoResult<PublicKey> {
        let recovery_id = RecoveryId::from_i32(self.recovery_id() as i32)
            .map_err(|_| CryptoError::InvalidSignature)?;
        let signature = Secp256k1RecSig::from_compact(&self.0[..64], recovery_id)
            .map_err(|_| CryptoError::InvalidSignature)?;
        let message = Message::from_digest_slice(digest.as_bytes())
            .map_err(|_| CryptoError::InvalidHash)?;

        let secp = Secp256k1::verification_only();
        let public_key = secp.recover_ecdsa(&message, &signature)
            .map_err(|_| CryptoError::InvalidSignature)?;
        Ok(PublicKey::from(public_key))
    }

    /// Recover the address of the account that signed `digest`
    pub fn recover_address(&self, digest: &Hash) -> CryptoResult<Address> {
        Ok(self.recover(digest)?.to_address())
    }
}

impl fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecoverableSignature({}...)", hex::encode(&self.0[..8]))
    }
}
