use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

/// How the response body of a call should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseType {
    #[default]
    Json,
    /// Keep the body as bytes (file downloads).
    Binary,
}

/// One outgoing call as it travels through the middleware chain.
///
/// `path` is relative to the client's base URL (`/products/42`).
#[derive(Debug, Clone)]
pub struct ApiCall {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub data: Option<Value>,
    pub response_type: ResponseType,
}

impl ApiCall {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            data: None,
            response_type: ResponseType::Json,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach query parameters from any serializable struct or map.
    ///
    /// `None`/null fields are dropped; scalars are rendered as strings.
    /// Nested arrays and objects are rejected.
    pub fn with_query<Q: Serialize + ?Sized>(mut self, params: &Q) -> Result<Self, ApiError> {
        let value = serde_json::to_value(params)
            .map_err(|e| ApiError::request(&self.method, &self.path, format!("query: {}", e)))?;
        let map = match value {
            Value::Object(map) => map,
            Value::Null => return Ok(self),
            other => {
                return Err(ApiError::request(
                    &self.method,
                    &self.path,
                    format!("query must be a mapping, got {}", other),
                ))
            }
        };
        for (key, val) in map {
            let rendered = match val {
                Value::Null => continue,
                Value::String(s) => s,
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                nested => {
                    return Err(ApiError::request(
                        &self.method,
                        &self.path,
                        format!("query field '{}' is not a scalar: {}", key, nested),
                    ))
                }
            };
            self.query.push((key, rendered));
        }
        Ok(self)
    }

    /// Attach a JSON request body.
    pub fn with_data<D: Serialize + ?Sized>(mut self, data: &D) -> Result<Self, ApiError> {
        let value = serde_json::to_value(data)
            .map_err(|e| ApiError::request(&self.method, &self.path, format!("body: {}", e)))?;
        self.data = Some(value);
        Ok(self)
    }

    pub fn binary(mut self) -> Self {
        self.response_type = ResponseType::Binary;
        self
    }

    /// What the logger prints as the call's payload: the body for writes,
    /// the query for reads.
    pub fn payload_summary(&self) -> String {
        if let Some(data) = &self.data {
            return data.to_string();
        }
        if self.query.is_empty() {
            return "-".to_string();
        }
        let map: serde_json::Map<String, Value> = self
            .query
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        Value::Object(map).to_string()
    }
}
