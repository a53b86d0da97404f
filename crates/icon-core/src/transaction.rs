// icon-core/src/transaction.rs

use crate::rpc_item::{RpcItem, RpcObject, RpcValue};
use crate::types::Bytes;
use icon_crypto::Address;
use num_bigint::BigInt;

/// Protocol version written when the builder is not given one
pub const DEFAULT_VERSION: u64 = 3;

/// Well-known network ids for the `nid` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkId {
    Main,
    Lisbon,
    Local,
    Berlin,
    Sejong,
}

impl NetworkId {
    pub fn value(&self) -> u64 {
        match self {
            NetworkId::Main => 1,
            NetworkId::Lisbon => 2,
            NetworkId::Local => 3,
            NetworkId::Berlin => 7,
            NetworkId::Sejong => 0x53,
        }
    }

    pub fn from_value(value: u64) -> Option<Self> {
        match value {
            1 => Some(NetworkId::Main),
            2 => Some(NetworkId::Lisbon),
            3 => Some(NetworkId::Local),
            7 => Some(NetworkId::Berlin),
            0x53 => Some(NetworkId::Sejong),
            _ => None,
        }
    }
}

impl From<NetworkId> for BigInt {
    fn from(nid: NetworkId) -> Self {
        BigInt::from(nid.value())
    }
}

/// Shape of the `data` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// `{method, params?}`
    Call,
    /// `{contentType, content, params?}`
    Deploy,
    /// raw bytes
    Message,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Call => "call",
            DataType::Deploy => "deploy",
            DataType::Message => "message",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "call" => Some(DataType::Call),
            "deploy" => Some(DataType::Deploy),
            "message" => Some(DataType::Message),
            _ => None,
        }
    }
}

/// Transaction parameters, frozen by a builder.
///
/// Every field is optional on the wire; `version` is always present once
/// built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    version: BigInt,
    from: Option<Address>,
    to: Option<Address>,
    value: Option<BigInt>,
    step_limit: Option<BigInt>,
    timestamp: Option<BigInt>,
    nid: Option<BigInt>,
    nonce: Option<BigInt>,
    data_type: Option<DataType>,
    data: Option<RpcItem>,
}

impl Transaction {
    pub fn builder() -> TransactionBuilder {
        TransactionBuilder::new()
    }

    pub fn version(&self) -> &BigInt {
        &self.version
    }

    pub fn from(&self) -> Option<&Address> {
        self.from.as_ref()
    }

    pub fn to(&self) -> Option<&Address> {
        self.to.as_ref()
    }

    pub fn value(&self) -> Option<&BigInt> {
        self.value.as_ref()
    }

    pub fn step_limit(&self) -> Option<&BigInt> {
        self.step_limit.as_ref()
    }

    pub fn timestamp(&self) -> Option<&BigInt> {
        self.timestamp.as_ref()
    }

    pub fn nid(&self) -> Option<&BigInt> {
        self.nid.as_ref()
    }

    pub fn nonce(&self) -> Option<&BigInt> {
        self.nonce.as_ref()
    }

    pub fn data_type(&self) -> Option<DataType> {
        self.data_type
    }

    pub fn data(&self) -> Option<&RpcItem> {
        self.data.as_ref()
    }

    /// Parameter object as sent to the node
    pub fn params(&self) -> RpcObject {
        self.params_with_step_limit(self.step_limit.as_ref())
    }

    /// Parameter object with `stepLimit` replaced (or dropped when `None`)
    pub fn params_with_step_limit(&self, step_limit: Option<&BigInt>) -> RpcObject {
        RpcObject::builder()
            .put("version", &self.version)
            .put_opt("from", self.from.as_ref())
            .put_opt("to", self.to.as_ref())
            .put_opt("value", self.value.as_ref())
            .put_opt("stepLimit", step_limit)
            .put_opt("timestamp", self.timestamp.as_ref())
            .put_opt("nid", self.nid.as_ref())
            .put_opt("nonce", self.nonce.as_ref())
            .put_opt("dataType", self.data_type.map(|t| t.as_str()))
            .put_opt("data", self.data.clone())
            .build()
    }
}

/// Accumulates the common fields; picking a kind (`call`, `deploy`,
/// `message`) hands over to a kind-specific builder, `build` yields a plain
/// transfer.
#[derive(Debug, Default)]
pub struct TransactionBuilder {
    version: Option<BigInt>,
    from: Option<Address>,
    to: Option<Address>,
    value: Option<BigInt>,
    step_limit: Option<BigInt>,
    timestamp: Option<BigInt>,
    nid: Option<BigInt>,
    nonce: Option<BigInt>,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(mut self, version: impl Into<BigInt>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    pub fn to(mut self, to: Address) -> Self {
        self.to = Some(to);
        self
    }

    pub fn value(mut self, value: impl Into<BigInt>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn step_limit(mut self, step_limit: impl Into<BigInt>) -> Self {
        self.step_limit = Some(step_limit.into());
        self
    }

    /// Microseconds since the Unix epoch
    pub fn timestamp(mut self, timestamp: impl Into<BigInt>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn timestamp_now(self) -> Self {
        self.timestamp(chrono::Utc::now().timestamp_micros())
    }

    pub fn nid(mut self, nid: impl Into<BigInt>) -> Self {
        self.nid = Some(nid.into());
        self
    }

    pub fn nonce(mut self, nonce: impl Into<BigInt>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    /// Call `method` on the SCORE at `to`
    pub fn call(self, method: impl Into<String>) -> CallTransactionBuilder {
        CallTransactionBuilder {
            base: self,
            method: method.into(),
            params: None,
        }
    }

    /// Install or update a SCORE
    pub fn deploy(self, content_type: impl Into<String>, content: impl Into<Bytes>) -> DeployTransactionBuilder {
        DeployTransactionBuilder {
            base: self,
            content_type: content_type.into(),
            content: content.into(),
            params: None,
        }
    }

    /// Attach a UTF-8 message, carried as bytes
    pub fn message(self, message: impl AsRef<str>) -> MessageTransactionBuilder {
        MessageTransactionBuilder {
            base: self,
            message: Bytes::from(message.as_ref().as_bytes()),
        }
    }

    /// Plain transfer without data
    pub fn build(self) -> Transaction {
        self.finish(None, None)
    }

    fn finish(self, data_type: Option<DataType>, data: Option<RpcItem>) -> Transaction {
        Transaction {
            version: self.version.unwrap_or_else(|| BigInt::from(DEFAULT_VERSION)),
            from: self.from,
            to: self.to,
            value: self.value,
            step_limit: self.step_limit,
            timestamp: self.timestamp,
            nid: self.nid,
            nonce: self.nonce,
            data_type,
            data,
        }
    }
}

#[derive(Debug)]
pub struct CallTransactionBuilder {
    base: TransactionBuilder,
    method: String,
    params: Option<RpcObject>,
}

impl CallTransactionBuilder {
    pub fn params(mut self, params: RpcObject) -> Self {
        self.params = Some(params);
        self
    }

    pub fn build(self) -> Transaction {
        let data = RpcObject::builder()
            .put("method", self.method)
            .put_opt("params", self.params)
            .build();
        self.base.finish(Some(DataType::Call), Some(data.into()))
    }
}

#[derive(Debug)]
pub struct DeployTransactionBuilder {
    base: TransactionBuilder,
    content_type: String,
    content: Bytes,
    params: Option<RpcObject>,
}

impl DeployTransactionBuilder {
    pub fn params(mut self, params: RpcObject) -> Self {
        self.params = Some(params);
        self
    }

    pub fn build(self) -> Transaction {
        let data = RpcObject::builder()
            .put("contentType", self.content_type)
            .put("content", self.content)
            .put_opt("params", self.params)
            .build();
        self.base.finish(Some(DataType::Deploy), Some(data.into()))
    }
}

#[derive(Debug)]
pub struct MessageTransactionBuilder {
    base: TransactionBuilder,
    message: Bytes,
}

impl MessageTransactionBuilder {
    pub fn build(self) -> Transaction {
        let data = RpcValue::from(self.message);
        self.base.finish(Some(DataType::Message), Some(data.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer;

    fn address(s: &str) -> Address {
        s.parse().unwrap()
    }

    fn base() -> TransactionBuilder {
        Transaction::builder()
            .from(address("hxbe258ceb872e08851f1f59694dac2558708ece11"))
            .to(address("hx5bfdb090f43a808005ffc27c25b213145e80b7cd"))
            .step_limit(0x12345)
            .timestamp(0x563a6cf330136i64)
            .nonce(1)
    }

    #[test]
    fn test_transfer_defaults_version() {
        let tx = base().value(BigInt::from(1_000_000_000_000_000_000u64)).build();
        assert_eq!(tx.version(), &BigInt::from(3));
        assert!(tx.data_type().is_none());
        assert!(tx.data().is_none());

        let params = tx.params();
        assert_eq!(
            params.keys().collect::<Vec<_>>(),
            vec!["version", "from", "to", "value", "stepLimit", "timestamp", "nonce"]
        );
        assert_eq!(
            serializer::serialize(&params),
            "icx_sendTransaction.from.hxbe258ceb872e08851f1f59694dac2558708ece11.nonce.0x1.\
             stepLimit.0x12345.timestamp.0x563a6cf330136.to.hx5bfdb090f43a808005ffc27c25b213145e80b7cd.\
             value.0xde0b6b3a7640000.version.0x3"
        );
    }

    #[test]
    fn test_call_transaction() {
        let params = RpcObject::builder().put("_to", "hx5bfdb090f43a808005ffc27c25b213145e80b7cd").put("_value", 1i64).build();
        let tx = base().nid(NetworkId::Main).call("transfer").params(params.clone()).build();

        assert_eq!(tx.data_type(), Some(DataType::Call));
        assert_eq!(tx.nid(), Some(&BigInt::from(1)));
        let data = tx.data().unwrap().as_object().unwrap();
        assert_eq!(data.get("method").unwrap().as_string().unwrap(), "transfer");
        assert_eq!(data.get("params").unwrap().as_object().unwrap(), &params);
        assert_eq!(tx.params().get("dataType").unwrap().as_string().unwrap(), "call");
    }

    #[test]
    fn test_call_without_params() {
        let tx = base().call("name").build();
        let data = tx.data().unwrap().as_object().unwrap();
        assert_eq!(data.len(), 1);
        assert!(data.get("params").is_none());
    }

    #[test]
    fn test_deploy_transaction() {
        let tx = base()
            .deploy("application/zip", vec![0x50u8, 0x4b, 0x03, 0x04])
            .params(RpcObject::builder().put("name", "token").build())
            .build();

        assert_eq!(tx.data_type(), Some(DataType::Deploy));
        let data = tx.data().unwrap().as_object().unwrap();
        assert_eq!(data.get("contentType").unwrap().as_string().unwrap(), "application/zip");
        assert_eq!(data.get("content").unwrap().as_string().unwrap(), "0x504b0304");
        assert!(data.get("params").is_some());
    }

    #[test]
    fn test_message_transaction() {
        let tx = base().message("Hello ICON").build();
        assert_eq!(tx.data_type(), Some(DataType::Message));
        let bytes = tx.data().unwrap().as_bytes().unwrap();
        assert_eq!(String::from_utf8(bytes.into_vec()).unwrap(), "Hello ICON");
    }

    #[test]
    fn test_params_with_step_limit_override() {
        let tx = base().build();
        let params = tx.params_with_step_limit(Some(&BigInt::from(100)));
        assert_eq!(params.get("stepLimit").unwrap().as_integer().unwrap(), BigInt::from(100));
        assert_eq!(tx.step_limit(), Some(&BigInt::from(0x12345)));
        assert!(tx.params_with_step_limit(None).get("stepLimit").is_none());
    }

    #[test]
    fn test_timestamp_now_is_micros() {
        let tx = Transaction::builder().timestamp_now().build();
        // after 2020-01-01 in microseconds
        assert!(tx.timestamp().unwrap() > &BigInt::from(1_577_836_800_000_000i64));
    }

    #[test]
    fn test_network_id() {
        assert_eq!(NetworkId::Main.value(), 1);
        assert_eq!(NetworkId::from_value(0x53), Some(NetworkId::Sejong));
        assert_eq!(NetworkId::from_value(99), None);
        assert_eq!(BigInt::from(NetworkId::Lisbon), BigInt::from(2));
    }

    #[test]
    fn test_data_type_names() {
        for kind in [DataType::Call, DataType::Deploy, DataType::Message] {
            assert_eq!(DataType::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(DataType::parse("deposit"), None);
    }
}
