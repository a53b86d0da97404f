// icon-core/src/signed.rs

use crate::rpc_item::RpcObject;
use crate::serializer;
use crate::transaction::Transaction;
use crate::types::Bytes;
use crate::{IconError, IconResult};
use icon_crypto::{Address, Hash, RecoverableSignature, Wallet};
use num_bigint::BigInt;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// A transaction paired with the wallet that signs it.
///
/// The signature and the final parameter object are computed on first use and
/// cached. The wrapped `Transaction` is never modified.
pub struct SignedTransaction {
    transaction: Transaction,
    wallet: Arc<dyn Wallet>,
    step_limit: Option<BigInt>,
    properties: OnceLock<RpcObject>,
}

impl SignedTransaction {
    /// Fails with `MissingField("stepLimit")` when the transaction has no step limit
    pub fn new(transaction: Transaction, wallet: Arc<dyn Wallet>) -> IconResult<Self> {
        Self::create(transaction, wallet, None)
    }

    /// Sign with `step_limit` in place of the transaction's own
    pub fn with_step_limit(
        transaction: Transaction,
        wallet: Arc<dyn Wallet>,
        step_limit: impl Into<BigInt>,
    ) -> IconResult<Self> {
        Self::create(transaction, wallet, Some(step_limit.into()))
    }

    fn create(transaction: Transaction, wallet: Arc<dyn Wallet>, step_limit: Option<BigInt>) -> IconResult<Self> {
        if step_limit.is_none() && transaction.step_limit().is_none() {
            return Err(IconError::MissingField("stepLimit".into()));
        }
        Ok(Self {
            transaction,
            wallet,
            step_limit,
            properties: OnceLock::new(),
        })
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn wallet_address(&self) -> Address {
        self.wallet.address()
    }

    /// Parameters that get signed, without `signature`
    pub fn unsigned_params(&self) -> RpcObject {
        let step_limit = self.step_limit.as_ref().or(self.transaction.step_limit());
        self.transaction.params_with_step_limit(step_limit)
    }

    /// SHA3-256 of the canonical serialization
    pub fn message_hash(&self) -> Hash {
        serializer::message_hash(&self.unsigned_params())
    }

    /// Transaction hash as the network reports it
    pub fn tx_hash(&self) -> Bytes {
        Bytes::from(self.message_hash())
    }

    /// Final parameters: the signed fields plus `signature`
    pub fn properties(&self) -> IconResult<&RpcObject> {
        if let Some(properties) = self.properties.get() {
            return Ok(properties);
        }
        let properties = self.sign()?;
        Ok(self.properties.get_or_init(|| properties))
    }

    /// Base64 signature carried in the request
    pub fn signature(&self) -> IconResult<String> {
        let properties = self.properties()?;
        let signature = properties
            .get("signature")
            .ok_or_else(|| IconError::MissingField("signature".into()))?;
        signature.as_string()
    }

    /// Recover the signer from the signature and compare it with `from`
    pub fn verify_signature(&self) -> IconResult<bool> {
        let signature = RecoverableSignature::from_base64(&self.signature()?)?;
        let signer = signature.recover_address(&self.message_hash())?;
        Ok(self.transaction.from() == Some(&signer))
    }

    fn sign(&self) -> IconResult<RpcObject> {
        let params = self.unsigned_params();
        let digest = serializer::message_hash(&params);
        tracing::debug!(tx_hash = %digest, signer = %self.wallet.address(), "signing transaction");

        let signature = self.wallet.sign(&digest)?;
        Ok(params.to_builder().put("signature", signature.to_base64()).build())
    }
}

impl fmt::Debug for SignedTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedTransaction")
            .field("transaction", &self.transaction)
            .field("wallet", &self.wallet.address())
            .field("step_limit", &self.step_limit)
            .finish()
    }
}
