use std::fmt;

// ── Phase ───────────────────────────────────────────────────────────
//
// Where a failure was detected. Stable lowercase names; log filters
// and callers match on these.

/// Stage of the shell in which an error was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Building or sending an outgoing call.
    Request,
    /// The server answered with a failure, or the answer was unusable.
    Response,
    /// A route transition or view resolution.
    Navigation,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Request => "request",
            Phase::Response => "response",
            Phase::Navigation => "navigation",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── ErrorRecord ─────────────────────────────────────────────────────

/// Uniform description of a failure, produced by every error type in
/// the shell. Never persisted; logged and handed to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub phase: Phase,
    pub message: String,
    /// HTTP status of the response that caused the failure, if any.
    pub origin_status: Option<u16>,
}

impl ErrorRecord {
    pub fn new(phase: Phase, message: impl Into<String>) -> Self {
        Self {
            phase,
            message: message.into(),
            origin_status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.origin_status = Some(status);
        self
    }

    /// Emit the record at error level.
    pub fn log(&self) {
        match self.origin_status {
            Some(status) => tracing::error!(
                phase = self.phase.as_str(),
                status,
                "{}",
                self.message
            ),
            None => tracing::error!(phase = self.phase.as_str(), "{}", self.message),
        }
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.origin_status {
            Some(status) => write!(f, "[{}] HTTP {}: {}", self.phase, status, self.message),
            None => write!(f, "[{}] {}", self.phase, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_names() {
        assert_eq!(Phase::Request.as_str(), "request");
        assert_eq!(Phase::Response.as_str(), "response");
        assert_eq!(Phase::Navigation.as_str(), "navigation");
    }

    #[test]
    fn display_with_and_without_status() {
        let plain = ErrorRecord::new(Phase::Navigation, "guard timed out");
        assert_eq!(plain.to_string(), "[navigation] guard timed out");

        let server = ErrorRecord::new(Phase::Response, "boom").with_status(500);
        assert_eq!(server.origin_status, Some(500));
        assert_eq!(server.to_string(), "[response] HTTP 500: boom");
    }
}
