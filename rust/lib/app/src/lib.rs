//! The inventory shell: wires the API client and the router into one
//! application and mounts it into a host.
//!
//! # Usage
//!
//! ```ignore
//! use inventory_app::App;
//!
//! let app = App::builder(config).notifier(Arc::new(LogNotifier)).build()?;
//! app.run("/", &host).await?;
//! app.navigate("/bom").await?;
//! ```

pub mod app;
pub mod host;
pub mod report;
pub mod routes;

pub use app::{App, AppBuilder, AppError};
pub use host::{Host, MountError, MOUNT_POINT};
pub use report::{DebugLog, GlobalErrorHandler, APP_ERROR_MESSAGE};
pub use routes::{route_table, PageView, PageViews, ViewSource, HOME, PAGES};
