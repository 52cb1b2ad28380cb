use inventory_core::{ErrorRecord, Phase};
use serde_json::Value;

/// Client-side API error.
///
/// Failed calls are never swallowed: whatever the transport or server
/// reported is carried here unchanged so the caller can decide how to
/// surface it.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The call could not be built (bad URL, unserializable payload).
    #[error("request {method} {path}: {message}")]
    Request {
        method: String,
        path: String,
        message: String,
    },

    /// Transport failure, including the client-wide timeout.
    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Server { status: u16, body: Value },
}

impl ApiError {
    pub(crate) fn request(
        method: &reqwest::Method,
        path: &str,
        message: impl Into<String>,
    ) -> Self {
        ApiError::Request {
            method: method.as_str().to_string(),
            path: path.to_string(),
            message: message.into(),
        }
    }

    /// HTTP status of the failed response, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            ApiError::Request { .. } => None,
        }
    }

    /// Decoded response body of a server error.
    pub fn body(&self) -> Option<&Value> {
        match self {
            ApiError::Server { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Network(e) if e.is_timeout())
    }

    pub fn phase(&self) -> Phase {
        match self {
            ApiError::Request { .. } => Phase::Request,
            ApiError::Network(e) if e.is_builder() => Phase::Request,
            ApiError::Network(_) | ApiError::Server { .. } => Phase::Response,
        }
    }

    /// Body if the server sent one, otherwise the error message.
    pub fn detail(&self) -> String {
        match self {
            ApiError::Server { body, .. } if !body.is_null() => body.to_string(),
            ApiError::Server { .. } => "<empty body>".to_string(),
            other => other.to_string(),
        }
    }

    pub fn record(&self) -> ErrorRecord {
        let record = ErrorRecord::new(self.phase(), self.detail());
        match self.status() {
            Some(status) => record.with_status(status),
            None => record,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn server_error_keeps_status_and_body() {
        let err = ApiError::Server {
            status: 500,
            body: json!({"error": "boom"}),
        };
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.body(), Some(&json!({"error": "boom"})));
        assert_eq!(err.phase(), Phase::Response);
        assert!(!err.is_timeout());

        let record = err.record();
        assert_eq!(record.origin_status, Some(500));
        assert_eq!(record.message, r#"{"error":"boom"}"#);
    }

    #[test]
    fn request_error_has_no_status() {
        let err = ApiError::request(&reqwest::Method::POST, "/products", "bad payload");
        assert_eq!(err.status(), None);
        assert_eq!(err.phase(), Phase::Request);
        assert_eq!(err.to_string(), "request POST /products: bad payload");
        assert_eq!(err.record().origin_status, None);
    }

    #[test]
    fn empty_server_body_detail() {
        let err = ApiError::Server {
            status: 502,
            body: Value::Null,
        };
        assert_eq!(err.detail(), "<empty body>");
    }
}
