// icon-rpc/src/lib.rs

//! JSON-RPC client for ICON nodes

pub mod call;
pub mod config;
pub mod provider;
pub mod request;
pub mod service;
pub mod types;

pub use call::{Call, CallBuilder};
pub use config::ClientConfig;
pub use provider::{HttpProvider, Provider};
pub use request::Request;
pub use service::IconService;
pub use types::{RpcErrorResponse, RpcRequest, RpcResponse};

use icon_core::IconError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RpcError {
    #[error("Transport error {code}: {message}")]
    Transport { code: i64, message: String },

    #[error(transparent)]
    Icon(#[from] IconError),
}

impl RpcError {
    /// Response body is not valid JSON-RPC
    pub const PARSE_ERROR: i64 = -32700;
    /// The node could not be reached
    pub const CONNECTION_FAILED: i64 = -1;

    pub fn transport(code: i64, message: impl Into<String>) -> Self {
        RpcError::Transport { code, message: message.into() }
    }

    /// Transport or server error code, if any
    pub fn code(&self) -> Option<i64> {
        match self {
            RpcError::Transport { code, .. } => Some(*code),
            RpcError::Icon(_) => None,
        }
    }
}

impl From<icon_crypto::CryptoError> for RpcError {
    fn from(err: icon_crypto::CryptoError) -> Self {
        RpcError::Icon(err.into())
    }
}

impl From<serde_json::Error> for RpcError {
    fn from(err: serde_json::Error) -> Self {
        RpcError::transport(Self::PARSE_ERROR, err.to_string())
    }
}

impl From<reqwest::Error> for RpcError {
    fn from(err: reqwest::Error) -> Self {
        let code = err
            .status()
            .map(|status| i64::from(status.as_u16()))
            .unwrap_or(Self::CONNECTION_FAILED);
        RpcError::transport(code, err.to_string())
    }
}

pub type RpcResult<T> = Result<T, RpcError>;
