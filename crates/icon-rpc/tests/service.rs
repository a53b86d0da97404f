// icon-rpc/tests/service.rs
use async_trait::async_trait;
use icon_core::{
    Address, BigInt, Bytes, FnConverter, IconError, SignedTransaction, Transaction, Wallet,
};
use icon_crypto::KeyPair;
use icon_rpc::{Call, IconService, Provider, RpcError, RpcResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;

const ADDRESS: &str = "hx4873b94352c8c1f3b2f09aaeccea31ce9e90bd31";
const TX_HASH: &str = "0xd8da71e926052b960def61c64f325412772f8e986f888685bc87c0bc046c2d9f";

/// Answers every request with the same reply and keeps the bodies it saw
#[derive(Clone)]
struct MockProvider {
    reply: RpcResult<String>,
    seen: Arc<Mutex<Vec<serde_json::Value>>>,
}

impl MockProvider {
    fn result(result: &str) -> Self {
        Self::raw(format!(r#"{{"jsonrpc":"2.0","id":1,"result":{}}}"#, result))
    }

    fn raw(body: impl Into<String>) -> Self {
        Self { reply: Ok(body.into()), seen: Arc::new(Mutex::new(Vec::new())) }
    }

    fn failing(err: RpcError) -> Self {
        Self { reply: Err(err), seen: Arc::new(Mutex::new(Vec::new())) }
    }

    fn requests(&self) -> Vec<serde_json::Value> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn send(&self, body: String) -> RpcResult<Vec<u8>> {
        self.seen.lock().unwrap().push(serde_json::from_str(&body).unwrap());
        self.reply.clone().map(String::into_bytes)
    }
}

fn address() -> Address {
    ADDRESS.parse().unwrap()
}

#[tokio::test]
async fn test_get_balance() {
    let provider = MockProvider::result(r#""0xde0b6b3a7640000""#);
    let service = IconService::with_handle(provider.clone(), Handle::current());

    let balance = service.get_balance(&address()).send().await.unwrap();
    assert_eq!(balance, BigInt::from(1_000_000_000_000_000_000u64));

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["jsonrpc"], "2.0");
    assert_eq!(requests[0]["method"], "icx_getBalance");
    assert_eq!(requests[0]["params"]["address"], ADDRESS);
}

#[tokio::test]
async fn test_request_ids_increase() {
    let provider = MockProvider::result(r#""0x1""#);
    let service = IconService::with_handle(provider.clone(), Handle::current());

    service.get_total_supply().send().await.unwrap();
    service.get_total_supply().send().await.unwrap();

    let requests = provider.requests();
    assert!(requests[0].get("params").is_none());
    assert!(requests[1]["id"].as_u64().unwrap() > requests[0]["id"].as_u64().unwrap());
}

#[tokio::test]
async fn test_server_error_surfaces_as_transport_error() {
    let provider = MockProvider::raw(r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32600,"message":"Invalid request"}}"#);
    let service = IconService::with_handle(provider, Handle::current());

    let err = service.get_last_block().send().await.unwrap_err();
    assert_eq!(err, RpcError::transport(-32600, "Invalid request"));
}

#[tokio::test]
async fn test_malformed_response_is_a_parse_error() {
    let service = IconService::with_handle(MockProvider::raw("<html>"), Handle::current());

    let err = service.get_total_supply().send().await.unwrap_err();
    assert_eq!(err.code(), Some(RpcError::PARSE_ERROR));
}

#[tokio::test]
async fn test_provider_error_is_propagated() {
    let provider = MockProvider::failing(RpcError::transport(RpcError::CONNECTION_FAILED, "connection refused"));
    let service = IconService::with_handle(provider, Handle::current());

    let err = service.get_total_supply().send().await.unwrap_err();
    assert_eq!(err.code(), Some(RpcError::CONNECTION_FAILED));
}

#[tokio::test]
async fn test_wrong_result_shape() {
    let service = IconService::with_handle(MockProvider::result(r#""0x1""#), Handle::current());

    let err = service.get_block_by_height(1).send().await.unwrap_err();
    assert!(matches!(err, RpcError::Icon(IconError::Format(_))));
}

#[tokio::test]
async fn test_get_block_by_height() {
    let provider = MockProvider::result(r#"{"height":"0x64","block_hash":"0x1fcf7c34dc875681761bdaa5d75d770e78e8166b5c4f06c226c53300cbe85f57","confirmed_transaction_list":[]}"#);
    let service = IconService::with_handle(provider.clone(), Handle::current());

    let block = service.get_block_by_height(100).send().await.unwrap();
    assert_eq!(block.height().unwrap(), Some(BigInt::from(100)));
    assert!(block.transactions().unwrap().is_empty());
    assert_eq!(provider.requests()[0]["params"]["height"], "0x64");
}

#[tokio::test]
async fn test_get_transaction_result() {
    let provider = MockProvider::result(r#"{"status":"0x1","txHash":"0xd8da71e926052b960def61c64f325412772f8e986f888685bc87c0bc046c2d9f","stepUsed":"0x1f4"}"#);
    let service = IconService::with_handle(provider.clone(), Handle::current());

    let hash = Bytes::from_hex(TX_HASH).unwrap();
    let result = service.get_transaction_result(&hash).send().await.unwrap();
    assert!(result.is_success().unwrap());
    assert_eq!(result.step_used().unwrap(), Some(BigInt::from(500)));
    assert_eq!(provider.requests()[0]["params"]["txHash"], TX_HASH);
}

#[tokio::test]
async fn test_send_transaction() {
    let provider = MockProvider::result(&format!(r#""{}""#, TX_HASH));
    let service = IconService::with_handle(provider.clone(), Handle::current());

    let wallet: Arc<dyn Wallet> = Arc::new(KeyPair::generate());
    let transaction = Transaction::builder()
        .from(wallet.address())
        .to(address())
        .value(BigInt::from(10u64).pow(18))
        .step_limit(100_000)
        .nid(3)
        .timestamp_now()
        .build();
    let signed = SignedTransaction::new(transaction, wallet).unwrap();

    let hash = service.send_transaction(&signed).send().await.unwrap();
    assert_eq!(hash.to_hex(), TX_HASH);

    let requests = provider.requests();
    let request = &requests[0];
    assert_eq!(request["method"], "icx_sendTransaction");
    assert_eq!(request["params"]["stepLimit"], "0x186a0");
    assert_eq!(request["params"]["signature"], signed.signature().unwrap().as_str());
}

#[tokio::test]
async fn test_estimate_step_leaves_out_step_limit() {
    let provider = MockProvider::result(r#""0x186a0""#);
    let service = IconService::with_handle(provider.clone(), Handle::current());

    let transaction = Transaction::builder().from(address()).to(address()).value(1).step_limit(5).nid(3).build();
    let steps = service.estimate_step(&transaction).send().await.unwrap();
    assert_eq!(steps, BigInt::from(100_000));

    let requests = provider.requests();
    let request = &requests[0];
    assert_eq!(request["method"], "debug_estimateStep");
    assert!(request["params"].get("stepLimit").is_none());
}

#[derive(Debug, PartialEq)]
struct StepCosts {
    default: BigInt,
    contract_call: BigInt,
}

#[tokio::test]
async fn test_call_with_custom_converter() {
    let provider = MockProvider::result(r#"{"default":"0x186a0","contractCall":"0x61a8"}"#);
    let mut service = IconService::with_handle(provider.clone(), Handle::current());
    service.add_converter(FnConverter::new(|item| {
        let object = item.as_object()?;
        let cost = |key: &str| {
            object
                .get(key)
                .ok_or_else(|| IconError::MissingField(key.to_string()))?
                .as_integer()
        };
        Ok(StepCosts { default: cost("default")?, contract_call: cost("contractCall")? })
    }));

    let governance: Address = "cx0000000000000000000000000000000000000001".parse().unwrap();
    let call = Call::builder(governance, "getStepCosts").build();
    let costs: StepCosts = service.call(call).send().await.unwrap();
    assert_eq!(costs, StepCosts { default: BigInt::from(100_000), contract_call: BigInt::from(25_000) });

    let requests = provider.requests();
    let request = &requests[0];
    assert_eq!(request["method"], "icx_call");
    assert_eq!(request["params"]["dataType"], "call");
    assert_eq!(request["params"]["data"]["method"], "getStepCosts");
}

#[tokio::test]
async fn test_missing_converter_sends_nothing() {
    let provider = MockProvider::result("{}");
    let service = IconService::with_handle(provider.clone(), Handle::current());

    let call = Call::builder("cx0000000000000000000000000000000000000001".parse().unwrap(), "getStepCosts").build();
    let err = service.call::<StepCosts>(call).send().await.unwrap_err();
    assert!(matches!(err, RpcError::Icon(IconError::NoConverter(_))));
    assert!(provider.requests().is_empty());
}

#[test]
fn test_execute_blocks_for_result() {
    let service = IconService::new(MockProvider::result(r#""0x2a""#)).unwrap();
    assert_eq!(service.get_total_supply().execute().unwrap(), BigInt::from(42));
}

#[test]
fn test_execute_async_calls_back_once() {
    let service = IconService::new(MockProvider::result(r#""0x2a""#)).unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = mpsc::channel();

    let counter = calls.clone();
    service.get_balance(&address()).execute_async(move |result| {
        counter.fetch_add(1, Ordering::SeqCst);
        tx.send(result).unwrap();
    });

    let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(result.unwrap(), BigInt::from(42));
    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

/// Never answers within a test's lifetime
struct SlowProvider;

#[async_trait]
impl Provider for SlowProvider {
    async fn send(&self, _body: String) -> RpcResult<Vec<u8>> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(br#"{"jsonrpc":"2.0","id":1,"result":"0x1"}"#.to_vec())
    }
}

#[test]
fn test_execute_async_calls_back_when_service_is_dropped() {
    let service = IconService::new(SlowProvider).unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = mpsc::channel();

    let counter = calls.clone();
    service.get_total_supply().execute_async(move |result| {
        counter.fetch_add(1, Ordering::SeqCst);
        let _ = tx.send(result);
    });
    std::thread::sleep(Duration::from_millis(50));
    drop(service);

    let err = rx.recv_timeout(Duration::from_secs(3)).unwrap().unwrap_err();
    assert_eq!(err, RpcError::transport(RpcError::CONNECTION_FAILED, "runtime shut down"));
    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_execute_async_reports_errors() {
    let provider = MockProvider::raw(r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32602,"message":"Invalid params"}}"#);
    let service = IconService::new(provider).unwrap();
    let (tx, rx) = mpsc::channel();

    service.get_last_block().execute_async(move |result| {
        tx.send(result.map(|_| ())).unwrap();
    });

    let err = rx.recv_timeout(Duration::from_secs(5)).unwrap().unwrap_err();
    assert_eq!(err.code(), Some(-32602));
}
