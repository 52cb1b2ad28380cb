//! Process-wide error handler and debug-log helpers.

use std::fmt;
use std::sync::Arc;

use inventory_core::{Notifier, Severity};
use tracing::{error, info, warn};

/// Message shown to the user for any unhandled application error.
pub const APP_ERROR_MESSAGE: &str = "应用发生错误";

/// Receives errors that escaped a page: logs them and tells the user
/// through the injected notifier.
#[derive(Clone)]
pub struct GlobalErrorHandler {
    notifier: Arc<dyn Notifier>,
}

impl GlobalErrorHandler {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// `component` is the page the error surfaced in, when known. `info`
    /// says what the page was doing.
    pub fn handle(&self, err: &dyn std::error::Error, component: Option<&str>, info: &str) {
        error!("application error: {}", err);
        error!(component = component.unwrap_or("unknown"), "raised in component");
        error!(info = %info, "error info");
        self.notifier.notify(APP_ERROR_MESSAGE, Severity::Error);
    }
}

/// Leveled logging helpers handed to pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugLog;

impl DebugLog {
    pub fn info(&self, message: impl fmt::Display) {
        info!(target: "inventory::debug", "{}", message);
    }

    pub fn warn(&self, message: impl fmt::Display) {
        warn!(target: "inventory::debug", "{}", message);
    }

    pub fn error(&self, message: impl fmt::Display) {
        error!(target: "inventory::debug", "{}", message);
    }
}
