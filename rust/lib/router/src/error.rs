use std::sync::{Arc, LazyLock};
use std::time::Duration;

use inventory_core::{ErrorRecord, Phase};
use regex::Regex;
use thiserror::Error;
use tracing::error;

use crate::view::LoadError;

/// Substring the view loader reports when a code chunk can't be fetched.
pub const CHUNK_LOAD_MARKER: &str = "Failed to fetch dynamically imported module";

static CHUNK_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+-\w+)\.js").expect("chunk pattern is valid"));

/// Why a transition did not commit.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NavigationError {
    /// No descriptor matches and the table has no catch-all.
    #[error("no route matches '{0}'")]
    NotFound(String),

    #[error("guard '{guard}' did not decide within {timeout:?}")]
    GuardTimeout { guard: String, timeout: Duration },

    #[error("guard '{guard}' failed: {message}")]
    GuardFailed { guard: String, message: String },

    #[error("view for route '{route}' failed to load: {source}")]
    Load {
        route: String,
        #[source]
        source: LoadError,
    },

    #[error("more than {limit} redirects navigating to '{path}'")]
    TooManyRedirects { path: String, limit: usize },

    /// A guard chose to stop the transition.
    #[error("navigation to '{path}' aborted: {reason}")]
    Aborted { path: String, reason: String },

    /// A newer navigation started before this one committed.
    #[error("navigation to '{path}' was superseded")]
    Cancelled { path: String },
}

impl NavigationError {
    /// Aborts and supersessions are outcomes, not faults; they never
    /// reach the error channel.
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            NavigationError::Aborted { .. } | NavigationError::Cancelled { .. }
        )
    }

    pub fn record(&self) -> ErrorRecord {
        ErrorRecord::new(Phase::Navigation, self.to_string())
    }

    pub fn class(&self) -> ErrorClass {
        classify(&self.to_string())
    }
}

// ── Classification ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorClass {
    /// A view's code chunk could not be fetched. `chunk` is best-effort
    /// and falls back to `"unknown"`.
    ChunkLoad { chunk: String },
    Other,
}

pub fn classify(message: &str) -> ErrorClass {
    if !message.contains(CHUNK_LOAD_MARKER) {
        return ErrorClass::Other;
    }
    let chunk = CHUNK_NAME
        .captures(message)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    ErrorClass::ChunkLoad { chunk }
}

// ── Error channel ───────────────────────────────────────────────────

/// Receives every navigation fault. Handlers run in registration order.
pub type ErrorHandler = Arc<dyn Fn(&NavigationError) + Send + Sync>;

/// Default handler: log the error, and name the chunk when a view's
/// code failed to load.
pub fn report_navigation_error(err: &NavigationError) {
    error!(phase = Phase::Navigation.as_str(), "navigation error: {}", err);
    if let ErrorClass::ChunkLoad { chunk } = err.class() {
        error!(chunk = %chunk, "view chunk failed to load: {}", chunk);
    }
}
