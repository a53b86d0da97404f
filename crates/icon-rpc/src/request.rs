// icon-rpc/src/request.rs
use crate::provider::Provider;
use crate::types::{RpcRequest, RpcResponse};
use crate::{RpcError, RpcResult};
use icon_core::{IconResult, RpcConverter};
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::runtime::{Handle, Runtime};
use tokio::task::JoinHandle;

/// Where requests run: a runtime owned by the service, or a borrowed one
#[derive(Clone)]
pub(crate) struct Executor {
    handle: Handle,
    _runtime: Option<Arc<Runtime>>,
}

impl Executor {
    pub(crate) fn owned(runtime: Runtime) -> Self {
        Self {
            handle: runtime.handle().clone(),
            _runtime: Some(Arc::new(runtime)),
        }
    }

    pub(crate) fn borrowed(handle: Handle) -> Self {
        Self { handle, _runtime: None }
    }
}

/// A prepared call whose result decodes to `T`.
///
/// Nothing is sent until one of `send`, `execute` or `execute_async` runs.
pub struct Request<T> {
    executor: Executor,
    provider: Arc<dyn Provider>,
    method: String,
    // Errors found while preparing surface when the request runs
    prepared: IconResult<(RpcRequest, Arc<dyn RpcConverter<T>>)>,
}

impl<T: Send + 'static> Request<T> {
    pub(crate) fn new(
        executor: Executor,
        provider: Arc<dyn Provider>,
        method: impl Into<String>,
        prepared: IconResult<(RpcRequest, Arc<dyn RpcConverter<T>>)>,
    ) -> Self {
        Self {
            executor,
            provider,
            method: method.into(),
            prepared,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// The envelope that will be sent, if preparation succeeded
    pub fn body(&self) -> Option<&RpcRequest> {
        self.prepared.as_ref().ok().map(|(request, _)| request)
    }

    pub async fn send(self) -> RpcResult<T> {
        run(self.provider, self.method, self.prepared).await
    }

    /// Block the calling thread until the response arrives.
    ///
    /// Panics when called from inside an async context.
    pub fn execute(self) -> RpcResult<T> {
        let Request { executor, provider, method, prepared } = self;
        executor.handle.block_on(run(provider, method, prepared))
    }

    /// Run on the service runtime and hand the outcome to `callback`.
    ///
    /// The callback runs exactly once, normally on a runtime worker thread.
    /// If the runtime shuts down before the response arrives, it receives a
    /// `CONNECTION_FAILED` transport error on the thread dropping the task.
    pub fn execute_async<F>(self, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(RpcResult<T>) + Send + 'static,
    {
        let Request { executor, provider, method, prepared } = self;
        let completion = Completion::new(callback);
        executor.handle.spawn(async move {
            completion.complete(run(provider, method, prepared).await);
        })
    }
}

/// Holds an `execute_async` callback until it has fired
struct Completion<T, F: FnOnce(RpcResult<T>)> {
    callback: Option<F>,
    _result: PhantomData<fn(RpcResult<T>)>,
}

impl<T, F: FnOnce(RpcResult<T>)> Completion<T, F> {
    fn new(callback: F) -> Self {
        Self { callback: Some(callback), _result: PhantomData }
    }

    fn complete(mut self, result: RpcResult<T>) {
        if let Some(callback) = self.callback.take() {
            callback(result);
        }
    }
}

// Dropped unfired when the task is cancelled
impl<T, F: FnOnce(RpcResult<T>)> Drop for Completion<T, F> {
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            tracing::warn!("runtime shut down with a request in flight");
            callback(Err(RpcError::transport(RpcError::CONNECTION_FAILED, "runtime shut down")));
        }
    }
}

async fn run<T>(
    provider: Arc<dyn Provider>,
    method: String,
    prepared: IconResult<(RpcRequest, Arc<dyn RpcConverter<T>>)>,
) -> RpcResult<T> {
    let (request, converter) = prepared?;
    let body = serde_json::to_string(&request)?;
    tracing::debug!(id = request.id, method = %method, "sending request");

    let bytes = provider.send(body).await?;
    let response: RpcResponse = serde_json::from_slice(&bytes)?;
    let item = response.into_result().map_err(|e| {
        tracing::warn!(id = request.id, method = %method, error = %e, "node returned an error");
        e
    })?;

    Ok(converter.convert_to(&item)?)
}
