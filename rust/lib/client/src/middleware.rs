//! Ordered middleware chain wrapped around every call.
//!
//! Each middleware receives the call and a [`Next`] handle for the rest
//! of the chain. It may inspect or rewrite the call, await `next.run`,
//! and inspect or rewrite the result. The transport sits at the end.
//!
//! ```text
//! ResponseEnvelope → CallLogger → (custom…) → Transport
//! ```

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::call::ApiCall;
use crate::error::ApiError;
use crate::payload::{is_envelope, Payload};
use crate::transport::Transport;

#[async_trait::async_trait]
pub trait Middleware: Send + Sync + 'static {
    async fn handle(&self, call: ApiCall, next: Next<'_>) -> Result<Payload, ApiError>;
}

/// The remainder of the chain after the current middleware.
pub struct Next<'a> {
    chain: &'a [Arc<dyn Middleware>],
    transport: &'a dyn Transport,
}

impl<'a> Next<'a> {
    pub(crate) fn new(chain: &'a [Arc<dyn Middleware>], transport: &'a dyn Transport) -> Self {
        Self { chain, transport }
    }

    /// Forward the call to the next middleware, or to the transport when
    /// the chain is exhausted. The transport's answer enters the chain as
    /// [`Payload::Raw`].
    pub async fn run(self, call: ApiCall) -> Result<Payload, ApiError> {
        match self.chain.split_first() {
            Some((head, tail)) => head.handle(call, Next::new(tail, self.transport)).await,
            None => self.transport.send(&call).await.map(Payload::Raw),
        }
    }
}

// ── CallLogger ──────────────────────────────────────────────────────

/// Logs every call on the way out, its response on the way back, and
/// any failure. Never alters the call or its result.
pub struct CallLogger;

#[async_trait::async_trait]
impl Middleware for CallLogger {
    async fn handle(&self, call: ApiCall, next: Next<'_>) -> Result<Payload, ApiError> {
        let method = call.method.clone();
        let path = call.path.clone();
        info!(method = %method, url = %path, payload = %call.payload_summary(), "request sent");

        match next.run(call).await {
            Ok(payload) => {
                let status = match &payload {
                    Payload::Raw(raw) => Some(raw.status),
                    _ => None,
                };
                info!(url = %path, status = ?status, body = %payload.summary(), "response received");
                Ok(payload)
            }
            Err(e) => {
                match e.status() {
                    Some(status) => error!(
                        phase = e.phase().as_str(),
                        method = %method,
                        url = %path,
                        status,
                        "call failed: {}",
                        e.detail()
                    ),
                    None => error!(
                        phase = e.phase().as_str(),
                        method = %method,
                        url = %path,
                        "call failed: {}",
                        e.detail()
                    ),
                }
                Err(e)
            }
        }
    }
}

// ── ResponseEnvelope ────────────────────────────────────────────────

/// Turns the raw response into the value the caller receives, following
/// the success-envelope convention (see [`Payload::from_raw`]).
pub struct ResponseEnvelope;

#[async_trait::async_trait]
impl Middleware for ResponseEnvelope {
    async fn handle(&self, call: ApiCall, next: Next<'_>) -> Result<Payload, ApiError> {
        let response_type = call.response_type;
        match next.run(call).await? {
            Payload::Raw(raw) => {
                let payload = Payload::from_raw(raw, response_type);
                debug!(
                    envelope = payload.as_json().is_some_and(is_envelope),
                    "response unwrapped"
                );
                Ok(payload)
            }
            done => Ok(done),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use bytes::Bytes;
    use serde_json::json;

    use crate::payload::RawResponse;

    /// Transport that returns a fixed answer and remembers what it saw.
    struct Canned {
        status: u16,
        body: &'static str,
        seen: Mutex<Vec<String>>,
    }

    impl Canned {
        fn new(status: u16, body: &'static str) -> Self {
            Self {
                status,
                body,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl Transport for Canned {
        async fn send(&self, call: &ApiCall) -> Result<RawResponse, ApiError> {
            self.seen.lock().unwrap().push(call.path.clone());
            if self.status >= 400 {
                return Err(ApiError::Server {
                    status: self.status,
                    body: serde_json::from_str(self.body).unwrap(),
                });
            }
            Ok(RawResponse {
                status: self.status,
                content_type: None,
                body: Bytes::from_static(self.body.as_bytes()),
            })
        }
    }

    /// Records the order in which it is entered and left.
    struct Trace {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait::async_trait]
    impl Middleware for Trace {
        async fn handle(&self, call: ApiCall, next: Next<'_>) -> Result<Payload, ApiError> {
            self.log.lock().unwrap().push(format!("{} in", self.name));
            let out = next.run(call).await;
            self.log.lock().unwrap().push(format!("{} out", self.name));
            out
        }
    }

    /// Rewrites the path before forwarding.
    struct Prefix;

    #[async_trait::async_trait]
    impl Middleware for Prefix {
        async fn handle(&self, mut call: ApiCall, next: Next<'_>) -> Result<Payload, ApiError> {
            call.path = format!("/v2{}", call.path);
            next.run(call).await
        }
    }

    #[tokio::test]
    async fn empty_chain_returns_raw() {
        let transport = Canned::new(200, r#"{"id":1}"#);
        let out = Next::new(&[], &transport).run(ApiCall::get("/products/1")).await.unwrap();
        assert!(matches!(out, Payload::Raw(raw) if raw.status == 200));
    }

    #[tokio::test]
    async fn chain_runs_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain: Vec<Arc<dyn Middleware>> = vec![
            Arc::new(Trace { name: "a", log: log.clone() }),
            Arc::new(Trace { name: "b", log: log.clone() }),
        ];
        let transport = Canned::new(200, "{}");
        Next::new(&chain, &transport).run(ApiCall::get("/orders")).await.unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["a in", "b in", "b out", "a out"]);
    }

    #[tokio::test]
    async fn middleware_can_rewrite_call() {
        let chain: Vec<Arc<dyn Middleware>> = vec![Arc::new(Prefix)];
        let transport = Canned::new(200, "{}");
        Next::new(&chain, &transport).run(ApiCall::get("/bom")).await.unwrap();
        assert_eq!(*transport.seen.lock().unwrap(), vec!["/v2/bom"]);
    }

    #[tokio::test]
    async fn default_chain_unwraps_envelope() {
        let chain: Vec<Arc<dyn Middleware>> = vec![Arc::new(ResponseEnvelope), Arc::new(CallLogger)];
        let transport = Canned::new(200, r#"{"success":true,"data":{"id":42}}"#);
        let out = Next::new(&chain, &transport).run(ApiCall::get("/products/42")).await.unwrap();
        assert_eq!(out, Payload::Json(json!({"success": true, "data": {"id": 42}})));
    }

    #[tokio::test]
    async fn errors_propagate_unchanged() {
        let chain: Vec<Arc<dyn Middleware>> = vec![Arc::new(ResponseEnvelope), Arc::new(CallLogger)];
        let transport = Canned::new(500, r#"{"error":"boom"}"#);
        let err = Next::new(&chain, &transport)
            .run(ApiCall::get("/products/42"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.body(), Some(&json!({"error": "boom"})));
        assert_eq!(transport.seen.lock().unwrap().len(), 1, "no retry");
    }
}
