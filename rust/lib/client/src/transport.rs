use inventory_core::ApiConfig;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};

use crate::call::ApiCall;
use crate::error::ApiError;
use crate::payload::RawResponse;

/// Innermost link of the chain: puts a call on the wire.
///
/// Implementations must report non-2xx answers as [`ApiError::Server`].
#[async_trait::async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, call: &ApiCall) -> Result<RawResponse, ApiError>;
}

/// `reqwest`-backed transport with the client-wide settings baked in:
/// base URL, timeout and a JSON content type.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::request(&reqwest::Method::GET, "/", e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn send(&self, call: &ApiCall) -> Result<RawResponse, ApiError> {
        let mut req = self.http.request(call.method.clone(), self.url(&call.path));
        if !call.query.is_empty() {
            req = req.query(&call.query);
        }
        if let Some(data) = &call.data {
            req = req.json(data);
        }

        let resp = req.send().await.map_err(|e| {
            if e.is_builder() {
                ApiError::request(&call.method, &call.path, e.to_string())
            } else {
                ApiError::Network(e)
            }
        })?;

        let status = resp.status();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp.bytes().await?;

        let raw = RawResponse {
            status: status.as_u16(),
            content_type,
            body,
        };
        if !status.is_success() {
            return Err(ApiError::Server {
                status: raw.status,
                body: raw.data().unwrap_or_default(),
            });
        }
        Ok(raw)
    }
}
