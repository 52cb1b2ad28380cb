//! Client-side navigation for the inventory shell.
//!
//! A [`RouteTable`] maps paths to lazily loaded views. The [`Router`]
//! runs every transition through the before-guards, loads the target
//! view once through the [`ViewCache`], commits it and then notifies the
//! after-guards. Navigation faults never panic; they are delivered to the
//! registered error handlers and the current route stays where it was.
//!
//! # Usage
//!
//! ```ignore
//! use inventory_router::{Router, RouteTable, TitleGuard};
//!
//! let router = Router::new(RouteTable::new(routes)?, &config.navigation);
//! router.before_each(Arc::new(TitleGuard::new(document, "库存管理系统")));
//! router.start("/bom").await?;
//! ```

pub mod document;
pub mod error;
pub mod guard;
pub mod route;
pub mod router;
pub mod view;

pub use document::Document;
pub use error::{classify, report_navigation_error, ErrorClass, ErrorHandler, NavigationError};
pub use guard::{
    after_fn, before_fn, AfterGuard, BeforeGuard, CompletionLogger, GuardDecision, GuardError,
    TitleGuard, Transition, TransitionLogger,
};
pub use route::{
    normalize, Meta, RouteDescriptor, RouteMatch, RouteSnapshot, RouteTable, RouteTableError,
    RouteTarget, CATCH_ALL,
};
pub use router::{Router, TransitionState};
pub use view::{loader, BoxFuture, LoadError, View, ViewCache, ViewLoader};
