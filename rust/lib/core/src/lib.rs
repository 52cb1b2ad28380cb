//! Shared building blocks for the inventory shell: configuration, the
//! error record every layer reports through, and the notification
//! capability injected into the app.

pub mod config;
pub mod error;
pub mod notify;

pub use config::{ApiConfig, AppConfig, ConfigError, DevServerConfig, LogConfig, NavigationConfig};
pub use error::{ErrorRecord, Phase};
pub use notify::{LogNotifier, Notifier, NoopNotifier, Severity};
