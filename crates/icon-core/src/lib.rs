// icon-core/src/lib.rs

//! Typed value model and transaction pipeline for the ICON JSON-RPC API
//!
//! This crate provides:
//! - `RpcItem`, the value tree exchanged with nodes, and its JSON codec
//! - The canonical transaction serializer used to produce signing digests
//! - Transaction builders and signed transactions
//! - Converters from response items to typed results

pub mod block;
pub mod codec;
pub mod converter;
pub mod result;
pub mod rpc_item;
pub mod serializer;
pub mod signed;
pub mod transaction;
pub mod types;

pub use block::{Block, ConfirmedTransaction};
pub use converter::{ConverterRegistry, FnConverter, ResultKind, RpcConverter};
pub use result::{EventLog, Failure, Param, ScoreApi, TransactionResult};
pub use rpc_item::{RpcArray, RpcArrayBuilder, RpcItem, RpcObject, RpcObjectBuilder, RpcValue};
pub use signed::SignedTransaction;
pub use transaction::{DataType, NetworkId, Transaction, TransactionBuilder};
pub use types::{Bytes, Unit};

pub use icon_crypto::{Address, AddressPrefix, Hash, Wallet};
pub use num_bigint::BigInt;

/// Result type for value model and transaction operations
pub type IconResult<T> = Result<T, IconError>;

/// Errors raised while building, reading or signing RPC values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IconError {
    #[error("Invalid format: {0}")]
    Format(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("No converter registered for {0}")]
    NoConverter(String),

    #[error("Cryptographic error: {0}")]
    Crypto(#[from] icon_crypto::CryptoError),
}

impl IconError {
    pub(crate) fn format(message: impl Into<String>) -> Self {
        IconError::Format(message.into())
    }
}
