// icon-rpc/src/call.rs
use icon_core::{Address, DataType, RpcObject};

/// Read-only SCORE method invocation (`icx_call`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    from: Option<Address>,
    to: Address,
    method: String,
    params: Option<RpcObject>,
}

impl Call {
    pub fn builder(to: Address, method: impl Into<String>) -> CallBuilder {
        CallBuilder {
            from: None,
            to,
            method: method.into(),
            params: None,
        }
    }

    pub fn from(&self) -> Option<&Address> {
        self.from.as_ref()
    }

    pub fn to(&self) -> &Address {
        &self.to
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn params(&self) -> Option<&RpcObject> {
        self.params.as_ref()
    }

    /// `{from?, to, dataType: "call", data: {method, params?}}`
    pub fn to_params(&self) -> RpcObject {
        let data = RpcObject::builder()
            .put("method", self.method.as_str())
            .put_opt("params", self.params.clone())
            .build();

        RpcObject::builder()
            .put_opt("from", self.from.as_ref())
            .put("to", &self.to)
            .put("dataType", DataType::Call.as_str())
            .put("data", data)
            .build()
    }
}

#[derive(Debug, Clone)]
pub struct CallBuilder {
    from: Option<Address>,
    to: Address,
    method: String,
    params: Option<RpcObject>,
}

impl CallBuilder {
    pub fn from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    pub fn params(mut self, params: RpcObject) -> Self {
        self.params = Some(params);
        self
    }

    pub fn build(self) -> Call {
        Call {
            from: self.from,
            to: self.to,
            method: self.method,
            params: self.params,
        }
    }
}
