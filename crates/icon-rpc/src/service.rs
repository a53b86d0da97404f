// icon-rpc/src/service.rs
use crate::call::Call;
use crate::provider::Provider;
use crate::request::{Executor, Request};
use crate::types::RpcRequest;
use icon_core::serializer::SEND_TRANSACTION_METHOD;
use icon_core::{
    Address, BigInt, Block, Bytes, ConfirmedTransaction, ConverterRegistry, IconResult, RpcConverter,
    RpcObject, ScoreApi, SignedTransaction, Transaction, TransactionResult,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;

/// Entry point for talking to an ICON node.
///
/// Every method prepares a `Request`; nothing goes over the wire until the
/// request is sent.
pub struct IconService {
    provider: Arc<dyn Provider>,
    executor: Executor,
    converters: ConverterRegistry,
    next_id: AtomicU64,
}

impl IconService {
    /// Service with its own multi-threaded runtime for `execute` and
    /// `execute_async`
    pub fn new(provider: impl Provider + 'static) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .thread_name("icon-rpc")
            .enable_all()
            .build()?;
        Ok(Self::with_executor(Arc::new(provider), Executor::owned(runtime)))
    }

    /// Service running its requests on an existing runtime
    pub fn with_handle(provider: impl Provider + 'static, handle: Handle) -> Self {
        Self::with_executor(Arc::new(provider), Executor::borrowed(handle))
    }

    fn with_executor(provider: Arc<dyn Provider>, executor: Executor) -> Self {
        Self {
            provider,
            executor,
            converters: ConverterRegistry::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Decode results of type `T` with `converter`, ahead of any converter
    /// registered before it and of the built-in one
    pub fn add_converter<T: 'static>(&mut self, converter: impl RpcConverter<T> + 'static) {
        self.converters.register(converter);
    }

    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    pub fn get_total_supply(&self) -> Request<BigInt> {
        self.request("icx_getTotalSupply", Ok(None))
    }

    pub fn get_balance(&self, address: &Address) -> Request<BigInt> {
        let params = RpcObject::builder().put("address", address).build();
        self.request("icx_getBalance", Ok(Some(params)))
    }

    pub fn get_last_block(&self) -> Request<Block> {
        self.request("icx_getLastBlock", Ok(None))
    }

    pub fn get_block_by_height(&self, height: impl Into<BigInt>) -> Request<Block> {
        let height: BigInt = height.into();
        let params = RpcObject::builder().put("height", height).build();
        self.request("icx_getBlockByHeight", Ok(Some(params)))
    }

    pub fn get_block_by_hash(&self, hash: &Bytes) -> Request<Block> {
        let params = RpcObject::builder().put("hash", hash).build();
        self.request("icx_getBlockByHash", Ok(Some(params)))
    }

    pub fn get_score_api(&self, address: &Address) -> Request<Vec<ScoreApi>> {
        let params = RpcObject::builder().put("address", address).build();
        self.request("icx_getScoreApi", Ok(Some(params)))
    }

    pub fn get_transaction(&self, hash: &Bytes) -> Request<ConfirmedTransaction> {
        let params = RpcObject::builder().put("txHash", hash).build();
        self.request("icx_getTransactionByHash", Ok(Some(params)))
    }

    pub fn get_transaction_result(&self, hash: &Bytes) -> Request<TransactionResult> {
        let params = RpcObject::builder().put("txHash", hash).build();
        self.request("icx_getTransactionResult", Ok(Some(params)))
    }

    /// Invoke a read-only SCORE method and decode its result as `T`
    pub fn call<T: Send + 'static>(&self, call: Call) -> Request<T> {
        self.request("icx_call", Ok(Some(call.to_params())))
    }

    /// Submit a signed transaction; the node answers with its hash.
    ///
    /// Signing happens here unless the transaction was signed before.
    pub fn send_transaction(&self, transaction: &SignedTransaction) -> Request<Bytes> {
        let params = transaction.properties().map(|properties| Some(properties.clone()));
        self.request(SEND_TRANSACTION_METHOD, params)
    }

    /// Steps the transaction would consume. Any step limit it carries is left out.
    pub fn estimate_step(&self, transaction: &Transaction) -> Request<BigInt> {
        let params = transaction.params_with_step_limit(None);
        self.request("debug_estimateStep", Ok(Some(params)))
    }

    fn request<T: Send + 'static>(&self, method: &str, params: IconResult<Option<RpcObject>>) -> Request<T> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let prepared = params.and_then(|params| {
            let converter = self.converters.find::<T>()?;
            Ok((RpcRequest::new(id, method, params), converter))
        });
        Request::new(self.executor.clone(), self.provider.clone(), method, prepared)
    }
}
