//! Resource-grouped operations. Each method maps 1:1 to a REST verb and
//! path under the client's base URL and resolves to the unwrapped body.

mod bom;
mod categories;
mod inventory;
mod orders;
mod production;
mod products;
mod reports;
mod transactions;

pub use bom::{BomApi, BomQuery};
pub use categories::CategoryApi;
pub use inventory::InventoryApi;
pub use orders::OrderApi;
pub use production::ProductionApi;
pub use products::{NonCompositeQuery, ProductApi, ProductSearch};
pub use reports::ReportApi;
pub use transactions::{TransactionApi, TransactionQuery};

/// Record identifier as issued by the backend.
pub type Id = i64;
