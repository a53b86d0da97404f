// icon-rpc/src/types.rs
use crate::{RpcError, RpcResult};
use icon_core::{RpcItem, RpcObject};
use serde::{Deserialize, Serialize};

pub const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<RpcItem>,
}

impl RpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Option<RpcObject>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params: params.map(RpcItem::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<RpcItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorResponse>,
    #[serde(default)]
    pub id: serde_json::Value,
}

impl RpcResponse {
    /// The `result` item, or the server's `error` as a transport error
    pub fn into_result(self) -> RpcResult<RpcItem> {
        if let Some(error) = self.error {
            return Err(RpcError::transport(error.code, error.message));
        }
        self.result
            .ok_or_else(|| RpcError::transport(RpcError::PARSE_ERROR, "Response carries neither result nor error"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorResponse {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}
