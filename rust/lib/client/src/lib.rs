//! REST client for the inventory backend.
//!
//! Every call goes through an ordered middleware chain before reaching
//! the HTTP transport. The default chain logs each call and unwraps the
//! backend's `{ "success": ..., "data": ... }` envelope convention.
//! Failed calls are returned as [`ApiError`] with the original status and
//! body; nothing is retried.
//!
//! # Usage
//!
//! ```ignore
//! use inventory_client::ApiClient;
//!
//! let client = ApiClient::new(&config.api)?;
//! let plans = client.production().get_production_plans().await?;
//! let xlsx = client.reports().export_bom_excel().await?.into_bytes();
//! ```

pub mod api;
pub mod call;
pub mod client;
pub mod error;
pub mod middleware;
pub mod payload;
pub mod transport;

pub use call::{ApiCall, ResponseType};
pub use client::{ApiClient, ApiClientBuilder};
pub use error::ApiError;
pub use middleware::{CallLogger, Middleware, Next, ResponseEnvelope};
pub use payload::{Payload, RawResponse};
pub use transport::{HttpTransport, Transport};
