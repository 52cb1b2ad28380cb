use bytes::Bytes;
use serde_json::Value;

use crate::call::ResponseType;

/// A response exactly as the transport received it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl RawResponse {
    /// Decoded body: JSON when it parses, the text otherwise, `None` when
    /// the body is empty.
    pub fn data(&self) -> Option<Value> {
        if self.body.is_empty() {
            return None;
        }
        match serde_json::from_slice(&self.body) {
            Ok(v) => Some(v),
            Err(_) => Some(Value::String(String::from_utf8_lossy(&self.body).into_owned())),
        }
    }
}

/// The value a call resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Binary(Bytes),
    /// No usable body: the raw response itself is the result.
    Raw(RawResponse),
}

impl Payload {
    /// Apply the success-envelope convention to a raw response.
    ///
    /// - body is a mapping with a `success` key → that mapping
    /// - any other non-empty body → the body
    /// - empty or falsy body → the raw response
    ///
    /// Never fails: a body that doesn't follow the convention is returned
    /// as-is.
    pub fn from_raw(raw: RawResponse, response_type: ResponseType) -> Self {
        match response_type {
            ResponseType::Binary if raw.body.is_empty() => Payload::Raw(raw),
            ResponseType::Binary => Payload::Binary(raw.body),
            ResponseType::Json => match raw.data() {
                Some(body) if is_envelope(&body) || is_truthy(&body) => Payload::Json(body),
                _ => Payload::Raw(raw),
            },
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Payload::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_bytes(self) -> Option<Bytes> {
        match self {
            Payload::Binary(b) => Some(b),
            Payload::Raw(raw) => Some(raw.body),
            Payload::Json(_) => None,
        }
    }

    /// Short human-readable rendering for logs.
    pub fn summary(&self) -> String {
        match self {
            Payload::Json(v) => v.to_string(),
            Payload::Binary(b) => format!("<{} bytes>", b.len()),
            Payload::Raw(raw) => match raw.data() {
                Some(v) => v.to_string(),
                None => "<empty>".to_string(),
            },
        }
    }
}

/// `{ "success": ..., ... }` as sent by the backend's response helpers.
pub fn is_envelope(body: &Value) -> bool {
    body.as_object().is_some_and(|map| map.contains_key("success"))
}

fn is_truthy(body: &Value) -> bool {
    match body {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
