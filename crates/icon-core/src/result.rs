// icon-core/src/result.rs

use crate::block::{field_address, field_boolean, field_hash, field_integer, field_string, object_list};
use crate::rpc_item::{RpcArray, RpcItem, RpcObject};
use crate::types::Bytes;
use crate::{IconError, IconResult};
use icon_crypto::Address;
use num_bigint::BigInt;

/// Outcome of an executed transaction (`icx_getTransactionResult`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionResult {
    properties: RpcObject,
}

impl TransactionResult {
    pub fn new(properties: RpcObject) -> Self {
        Self { properties }
    }

    pub fn properties(&self) -> &RpcObject {
        &self.properties
    }

    /// `1` on success, `0` on failure
    pub fn status(&self) -> IconResult<Option<BigInt>> {
        field_integer(&self.properties, "status")
    }

    pub fn is_success(&self) -> IconResult<bool> {
        Ok(self.status()? == Some(BigInt::from(1)))
    }

    pub fn to(&self) -> IconResult<Option<Address>> {
        field_address(&self.properties, "to")
    }

    pub fn tx_hash(&self) -> IconResult<Option<Bytes>> {
        field_hash(&self.properties, "txHash")
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

    pub fn cumulative_step_used(&self) -> IconResult<Option<BigInt>> {
        field_integer(&self.properties, "cumulativeStepUsed")
    }

    pub fn step_used(&self) -> IconResult<Option<BigInt>> {
        field_integer(&self.properties, "stepUsed")
    }

    pub fn step_price(&self) -> IconResult<Option<BigInt>> {
        field_integer(&self.properties, "stepPrice")
    }

    /// Set when the transaction deployed a SCORE
    pub fn score_address(&self) -> IconResult<Option<Address>> {
        field_address(&self.properties, "scoreAddress")
    }

    pub fn logs_bloom(&self) -> IconResult<Option<Bytes>> {
        field_hash(&self.properties, "logsBloom")
    }

    pub fn event_logs(&self) -> IconResult<Vec<EventLog>> {
        let Some(logs) = self.properties.get("eventLogs") else {
            return Ok(Vec::new());
        };
        object_list(logs.as_array()?, "eventLogs")?
            .into_iter()
            .map(EventLog::from_object)
            .collect()
    }

    pub fn failure(&self) -> IconResult<Option<Failure>> {
        self.properties
            .get("failure")
            .map(|item| Failure::from_object(item.as_object()?))
            .transpose()
    }
}

/// Event emitted by a SCORE while executing a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLog {
    pub score_address: Option<Address>,
    /// Event signature followed by the indexed arguments
    pub indexed: RpcArray,
    pub data: RpcArray,
}

impl EventLog {
    fn from_object(object: &RpcObject) -> IconResult<Self> {
        let array = |key: &str| -> IconResult<RpcArray> {
            match object.get(key) {
                Some(item) => Ok(item.as_array()?.clone()),
                None => Ok(RpcArray::default()),
            }
        };
        Ok(Self {
            score_address: field_address(object, "scoreAddress")?,
            indexed: array("indexed")?,
            data: array("data")?,
        })
    }

    /// The event signature, e.g. `Transfer(Address,Address,int,bytes)`
    pub fn signature(&self) -> IconResult<Option<String>> {
        match self.indexed.iter().next().flatten() {
            Some(item) => item.as_string().map(Some),
            None => Ok(None),
        }
    }
}

/// Reason a transaction failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub code: BigInt,
    pub message: String,
}

impl Failure {
    fn from_object(object: &RpcObject) -> IconResult<Self> {
        Ok(Self {
            code: field_integer(object, "code")?
                .ok_or_else(|| IconError::MissingField("failure.code".into()))?,
            message: field_string(object, "message")?.unwrap_or_default(),
        })
    }
}

/// One entry of a SCORE's API (`icx_getScoreApi`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreApi {
    /// `function`, `eventlog` or `fallback`
    pub kind: String,
    pub name: String,
    pub inputs: Vec<Param>,
    pub outputs: Vec<Param>,
    pub readonly: bool,
    pub payable: bool,
}

/// Input or output of a SCORE API entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub kind: String,
    pub name: Option<String>,
    /// Only meaningful for event log inputs
    pub indexed: Option<bool>,
}

impl ScoreApi {
    pub fn from_object(object: &RpcObject) -> IconResult<Self> {
        let params = |key: &str| -> IconResult<Vec<Param>> {
            match object.get(key) {
                Some(item) => object_list(item.as_array()?, key)?
                    .into_iter()
                    .map(Param::from_object)
                    .collect(),
                None => Ok(Vec::new()),
            }
        };

        Ok(Self {
            kind: field_string(object, "type")?.ok_or_else(|| IconError::MissingField("type".into()))?,
            name: field_string(object, "name")?.unwrap_or_default(),
            inputs: params("inputs")?,
            outputs: params("outputs")?,
            readonly: field_boolean(object, "readonly")?.unwrap_or(false),
            payable: field_boolean(object, "payable")?.unwrap_or(false),
        })
    }

    pub fn to_object(&self) -> RpcObject {
        let params = |params: &[Param]| -> RpcItem {
            params.iter().map(Param::to_object).collect::<RpcArray>().into()
        };

        let mut builder = RpcObject::builder()
            .put("type", self.kind.as_str())
            .put("name", self.name.as_str())
            .put("inputs", params(&self.inputs))
            .put("outputs", params(&self.outputs));
        if self.readonly {
            builder = builder.put("readonly", true);
        }
        if self.payable {
            builder = builder.put("payable", true);
        }
        builder.build()
    }
}

impl Param {
    fn from_object(object: &RpcObject) -> IconResult<Self> {
        Ok(Self {
            kind: field_string(object, "type")?.ok_or_else(|| IconError::MissingField("type".into()))?,
            name: field_string(object, "name")?,
            indexed: field_boolean(object, "indexed")?,
        })
    }

    fn to_object(&self) -> RpcObject {
        RpcObject::builder()
            .put("type", self.kind.as_str())
            .put_opt("name", self.name.as_deref())
            .put_opt("indexed", self.indexed)
            .build()
    }
}
