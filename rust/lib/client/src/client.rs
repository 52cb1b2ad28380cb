use std::sync::Arc;

use inventory_core::ApiConfig;
use serde::Serialize;
use tracing::error;

use crate::api::{
    BomApi, CategoryApi, InventoryApi, OrderApi, ProductApi, ProductionApi, ReportApi,
    TransactionApi,
};
use crate::call::ApiCall;
use crate::error::ApiError;
use crate::middleware::{CallLogger, Middleware, Next, ResponseEnvelope};
use crate::payload::Payload;
use crate::transport::{HttpTransport, Transport};

/// The configured REST client.
///
/// Build one per process and share it (`Arc<ApiClient>` or `&ApiClient`).
/// Every call is independent and at-most-once: no retries, batching or
/// caching happen here.
///
/// ```ignore
/// let client = ApiClient::new(&config.api)?;
/// let product = client.products().get_product(42).await?;
/// ```
pub struct ApiClient {
    chain: Vec<Arc<dyn Middleware>>,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    /// Client over HTTP with the default chain (envelope unwrapping and
    /// call logging).
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        Ok(ApiClientBuilder::new(Arc::new(HttpTransport::new(config)?))
            .with_defaults()
            .build())
    }

    pub fn builder(transport: Arc<dyn Transport>) -> ApiClientBuilder {
        ApiClientBuilder::new(transport)
    }

    /// Run a prepared call through the chain.
    pub async fn execute(&self, call: ApiCall) -> Result<Payload, ApiError> {
        Next::new(&self.chain, self.transport.as_ref()).run(call).await
    }

    /// Run a call whose construction may have failed. Construction
    /// failures are logged and returned without touching the chain.
    pub async fn send(&self, call: Result<ApiCall, ApiError>) -> Result<Payload, ApiError> {
        let call = call.inspect_err(|e| {
            error!(phase = e.phase().as_str(), "request error: {}", e);
        })?;
        self.execute(call).await
    }

    pub async fn get(&self, path: &str) -> Result<Payload, ApiError> {
        self.execute(ApiCall::get(path)).await
    }

    pub async fn get_with<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Payload, ApiError> {
        self.send(ApiCall::get(path).with_query(query)).await
    }

    pub async fn post<D: Serialize + ?Sized>(&self, path: &str, data: &D) -> Result<Payload, ApiError> {
        self.send(ApiCall::post(path).with_data(data)).await
    }

    pub async fn put<D: Serialize + ?Sized>(&self, path: &str, data: &D) -> Result<Payload, ApiError> {
        self.send(ApiCall::put(path).with_data(data)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Payload, ApiError> {
        self.execute(ApiCall::delete(path)).await
    }

    // ── Resource groups ─────────────────────────────────────────────

    pub fn products(&self) -> ProductApi<'_> {
        ProductApi::new(self)
    }

    pub fn categories(&self) -> CategoryApi<'_> {
        CategoryApi::new(self)
    }

    pub fn bom(&self) -> BomApi<'_> {
        BomApi::new(self)
    }

    pub fn orders(&self) -> OrderApi<'_> {
        OrderApi::new(self)
    }

    pub fn production(&self) -> ProductionApi<'_> {
        ProductionApi::new(self)
    }

    pub fn transactions(&self) -> TransactionApi<'_> {
        TransactionApi::new(self)
    }

    pub fn inventory(&self) -> InventoryApi<'_> {
        InventoryApi::new(self)
    }

    pub fn reports(&self) -> ReportApi<'_> {
        ReportApi::new(self)
    }
}

/// Assembles the middleware chain. Middleware added first runs outermost.
pub struct ApiClientBuilder {
    chain: Vec<Arc<dyn Middleware>>,
    transport: Arc<dyn Transport>,
}

impl ApiClientBuilder {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            chain: Vec::new(),
            transport,
        }
    }

    /// Append the standard pair: [`ResponseEnvelope`] then [`CallLogger`].
    pub fn with_defaults(self) -> Self {
        self.with(Arc::new(ResponseEnvelope)).with(Arc::new(CallLogger))
    }

    pub fn with(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.chain.push(middleware);
        self
    }

    pub fn build(self) -> ApiClient {
        ApiClient {
            chain: self.chain,
            transport: self.transport,
        }
    }
}
