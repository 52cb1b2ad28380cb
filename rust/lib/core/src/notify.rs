//! User-facing notification capability.
//!
//! The shell never renders anything itself. When something must be
//! surfaced to the user it calls the injected [`Notifier`]; whatever UI
//! embeds the shell decides how to show it.

use std::fmt;

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pluggable notification surface.
pub trait Notifier: Send + Sync + 'static {
    fn notify(&self, message: &str, severity: Severity);
}

/// Drops every notification. Default when no UI registered a surface.
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _message: &str, _severity: Severity) {}
}

/// Writes notifications to the log. Used by the terminal shell.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Error => tracing::error!(severity = severity.as_str(), "{}", message),
            Severity::Warning => tracing::warn!(severity = severity.as_str(), "{}", message),
            Severity::Info | Severity::Success => {
                tracing::info!(severity = severity.as_str(), "{}", message)
            }
        }
    }
}
