// icon-core/src/block.rs

use crate::rpc_item::{RpcArray, RpcItem, RpcObject};
use crate::types::Bytes;
use crate::{IconError, IconResult};
use icon_crypto::Address;
use num_bigint::BigInt;

// Field readers shared by the response views. Absent keys read as `None`;
// present but malformed values are errors.

pub(crate) fn field_string(object: &RpcObject, key: &str) -> IconResult<Option<String>> {
    object.get(key).map(RpcItem::as_string).transpose()
}

/// Hex integer, or decimal text carried over from a JSON number
pub(crate) fn field_integer(object: &RpcObject, key: &str) -> IconResult<Option<BigInt>> {
    object.get(key).map(|item| item.as_value()?.as_number()).transpose()
}

pub(crate) fn field_boolean(object: &RpcObject, key: &str) -> IconResult<Option<bool>> {
    object.get(key).map(RpcItem::as_boolean).transpose()
}

pub(crate) fn field_address(object: &RpcObject, key: &str) -> IconResult<Option<Address>> {
    object.get(key).map(RpcItem::as_address).transpose()
}

/// Hashes in older block formats come without the `0x` prefix
pub(crate) fn field_hash(object: &RpcObject, key: &str) -> IconResult<Option<Bytes>> {
    object
        .get(key)
        .map(|item| {
            let value = item.as_value()?.as_str();
            if value.starts_with("0x") {
                Bytes::from_hex(value)
            } else {
                Bytes::from_hex(&format!("0x{}", value))
            }
        })
        .transpose()
}

/// Every slot of a list of objects; an empty slot is malformed
pub(crate) fn object_list<'a>(array: &'a RpcArray, key: &str) -> IconResult<Vec<&'a RpcObject>> {
    array
        .iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| IconError::format(format!("{}[{}] is null", key, index)))?
                .as_object()
        })
        .collect()
}

/// A block as returned by `icx_getLastBlock`, `icx_getBlockByHeight` and
/// `icx_getBlockByHash`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    properties: RpcObject,
}

impl Block {
    pub fn new(properties: RpcObject) -> Self {
        Self { properties }
    }

    pub fn properties(&self) -> &RpcObject {
        &self.properties
    }

    pub fn version(&self) -> IconResult<Option<String>> {
        field_string(&self.properties, "version")
    }

    pub fn prev_block_hash(&self) -> IconResult<Option<Bytes>> {
        field_hash(&self.properties, "prev_block_hash")
    }

    pub fn merkle_tree_root_hash(&self) -> IconResult<Option<Bytes>> {
        field_hash(&self.properties, "merkle_tree_root_hash")
    }

    /// Microseconds since the Unix epoch
    pub fn timestamp(&self) -> IconResult<Option<BigInt>> {
        field_integer(&self.properties, "time_stamp")
    }

    pub fn transactions(&self) -> IconResult<Vec<ConfirmedTransaction>> {
        let Some(list) = self.properties.get("confirmed_transaction_list") else {
            return Ok(Vec::new());
        };
        let objects = object_list(list.as_array()?, "confirmed_transaction_list")?;
        Ok(objects.into_iter().cloned().map(ConfirmedTransaction::new).collect())
    }

    pub fn block_hash(&self) -> IconResult<Option<Bytes>> {
        field_hash(&self.properties, "block_hash")
    }

    pub fn peer_id(&self) -> IconResult<Option<Address>> {
        field_address(&self.properties, "peer_id")
    }

    pub fn height(&self) -> IconResult<Option<BigInt>> {
        field_integer(&self.properties, "height")
    }

    pub fn signature(&self) -> IconResult<Option<String>> {
        field_string(&self.properties, "signature")
    }
}

/// A transaction included in a block, as returned by
/// `icx_getTransactionByHash` or listed inside a `Block`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedTransaction {
    properties: RpcObject,
}

impl ConfirmedTransaction {
    pub fn new(properties: RpcObject) -> Self {
        Self { properties }
    }

    pub fn properties(&self) -> &RpcObject {
        &self.properties
    }

    /// Absent on version 2 transactions
    pub fn version(&self) -> IconResult<Option<BigInt>> {
        field_integer(&self.properties, "version")
    }

    pub fn from(&self) -> IconResult<Option<Address>> {
        field_address(&self.properties, "from")
    }

    pub fn to(&self) -> IconResult<Option<Address>> {
        field_address(&self.properties, "to")
    }

    /// Version 2 transactions carry a fixed fee instead of a step limit
    pub fn fee(&self) -> IconResult<Option<BigInt>> {
        field_integer(&self.properties, "fee")
    }

    pub fn value(&self) -> IconResult<Option<BigInt>> {
        field_integer(&self.properties, "value")
    }

    pub fn step_limit(&self) -> IconResult<Option<BigInt>> {
        field_integer(&self.properties, "stepLimit")
    }

    pub fn timestamp(&self) -> IconResult<Option<BigInt>> {
        field_integer(&self.properties, "timestamp")
    }

    pub fn nid(&self) -> IconResult<Option<BigInt>> {
        field_integer(&self.properties, "nid")
    }

    pub fn nonce(&self) -> IconResult<Option<BigInt>> {
        field_integer(&self.properties, "nonce")
    }

    pub fn tx_hash(&self) -> IconResult<Option<Bytes>> {
        match field_hash(&self.properties, "txHash")? {
            Some(hash) => Ok(Some(hash)),
            None => field_hash(&self.properties, "tx_hash"),
        }
    }

    pub fn tx_index(&self) -> IconResult<Option<BigInt>> {
        field_integer(&self.properties, "txIndex")
    }

    pub fn block_height(&self) -> IconResult<Option<BigInt>> {
        field_integer(&self.properties, "blockHeight")
    }

    pub fn block_hash(&self) -> IconResult<Option<Bytes>> {
        field_hash(&self.properties, "blockHash")
    }

    pub fn signature(&self) -> IconResult<Option<String>> {
        field_string(&self.properties, "signature")
    }

    pub fn data_type(&self) -> IconResult<Option<String>> {
        field_string(&self.properties, "dataType")
    }

    pub fn data(&self) -> Option<&RpcItem> {
        self.properties.get("data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: &str = r#"{
        "version": "0.1a",
        "prev_block_hash": "48757af881f76c858890fb41934bee228ad50a71707154a482826c39b8560d4b",
        "merkle_tree_root_hash": "fabc1884932cf52f657475b6d62adcbce5661754ff1a9d50f13f0c49c7d48c0c",
        "time_stamp": 1516498781094429,
        "confirmed_transaction_list": [
            {
                "version": "0x3",
                "from": "hxbe258ceb872e08851f1f59694dac2558708ece11",
                "to": "cxb0776ee37f5b45bfaea8cff1d8232fbb6122ec32",
                "stepLimit": "0x12345",
                "timestamp": "0x563a6cf330136",
                "nid": "0x3",
                "nonce": "0x1",
                "signature": "VAia7YZ2Ji6igKWzjR2YsGa2m53nKPrfK7uXYW78QLE+ATehAVZPC40szvAiA6NEU5gCYB4c4qaQzqDh2ugcHgA=",
                "txHash": "0xb903239f8543d04b5dc1ba6579132b143087c68db1b2168786408fcbce568238",
                "dataType": "call",
                "data": {"method": "transfer", "params": {"to": "hxab2d8215eab14bc6bdd8bfb2c8151257032ecd8b", "value": "0x1"}}
            },
            {
                "from": "hx0000000000000000000000000000000000000000",
                "to": "hx1000000000000000000000000000000000000000",
                "value": "0x2961fff8ca4a62327800000",
                "fee": "0x2386f26fc10000",
                "tx_hash": "3cb96ae0cfaa3a4f1fd1a8f4d5fb78ab34aed8e8cde34c3cfc4b7fd23df58d2d"
            }
        ],
        "block_hash": "1fcf7c34dc875681761bdaa5d75d770e78e8166b5c4f06c226c53300cbe85f57",
        "height": 1,
        "peer_id": "hx86aba2210918a9b116973f3c4b27c41a54d5dafe",
        "signature": ""
    }"#;

    fn block() -> Block {
        Block::new(serde_json::from_str(BLOCK).unwrap())
    }

    #[test]
    fn test_block_fields() {
        let block = block();
        assert_eq!(block.version().unwrap().as_deref(), Some("0.1a"));
        assert_eq!(block.height().unwrap(), Some(BigInt::from(1)));
        assert_eq!(block.timestamp().unwrap(), Some(BigInt::from(1516498781094429u64)));
        assert_eq!(block.block_hash().unwrap().unwrap().len(), 32);
        assert_eq!(block.prev_block_hash().unwrap().unwrap().as_slice()[0], 0x48);
        assert_eq!(
            block.peer_id().unwrap().unwrap().to_string(),
            "hx86aba2210918a9b116973f3c4b27c41a54d5dafe"
        );
        assert_eq!(block.signature().unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_block_transactions() {
        let transactions = block().transactions().unwrap();
        assert_eq!(transactions.len(), 2);

        let v3 = &transactions[0];
        assert_eq!(v3.version().unwrap(), Some(BigInt::from(3)));
        assert!(v3.to().unwrap().unwrap().is_contract());
        assert_eq!(v3.data_type().unwrap().as_deref(), Some("call"));
        let data = v3.data().unwrap().as_object().unwrap();
        assert_eq!(data.get("method").unwrap().as_string().unwrap(), "transfer");
        assert_eq!(
            v3.tx_hash().unwrap().unwrap().to_hex(),
            "0xb903239f8543d04b5dc1ba6579132b143087c68db1b2168786408fcbce568238"
        );

        let v2 = &transactions[1];
        assert!(v2.version().unwrap().is_none());
        assert!(v2.fee().unwrap().is_some());
        assert_eq!(
            v2.tx_hash().unwrap().unwrap().to_hex(),
            "0x3cb96ae0cfaa3a4f1fd1a8f4d5fb78ab34aed8e8cde34c3cfc4b7fd23df58d2d"
        );
    }

    #[test]
    fn test_null_transaction_is_an_error() {
        let block = Block::new(serde_json::from_str(r#"{"confirmed_transaction_list":[{"txHash":"0x00"},null]}"#).unwrap());
        let err = block.transactions().unwrap_err();
        assert_eq!(err, IconError::Format("confirmed_transaction_list[1] is null".into()));
    }

    #[test]
    fn test_absent_fields_read_as_none() {
        let block = Block::new(RpcObject::default());
        assert!(block.height().unwrap().is_none());
        assert!(block.block_hash().unwrap().is_none());
        assert!(block.transactions().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_field_is_an_error() {
        let block = Block::new(RpcObject::builder().put("peer_id", "hx1234").put("height", "0xzz").build());
        assert!(block.peer_id().is_err());
        assert!(block.height().is_err());
    }
}
