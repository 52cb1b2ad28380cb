use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::OnceCell;

/// A boxed, `Send`-able future returned by view loaders.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// A resolved page view. Rendering is the embedding UI's business; the
/// router only needs to hold on to it.
pub trait View: Send + Sync + 'static {
    fn name(&self) -> &str;
}

/// Failure to resolve a view module.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct LoadError {
    pub message: String,
}

impl LoadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Type-erased lazy view loader. Called on the first navigation to its
/// route, and again only if that attempt failed.
pub type ViewLoader = Arc<dyn Fn() -> BoxFuture<Result<Arc<dyn View>, LoadError>> + Send + Sync>;

/// Wrap an async closure as a [`ViewLoader`].
pub fn loader<F, Fut>(f: F) -> ViewLoader
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Arc<dyn View>, LoadError>> + Send + 'static,
{
    Arc::new(move || -> BoxFuture<Result<Arc<dyn View>, LoadError>> { Box::pin(f()) })
}

/// Per-route cache of resolved views.
///
/// A successful load is kept for the cache's lifetime. Concurrent first
/// navigations to the same route share a single load. Failures are not
/// cached.
#[derive(Default)]
pub struct ViewCache {
    cells: Mutex<HashMap<String, Arc<OnceCell<Arc<dyn View>>>>>,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached view for `route`, loading it with `loader` if it
    /// has not been resolved yet.
    pub async fn resolve(
        &self,
        route: &str,
        loader: &ViewLoader,
    ) -> Result<Arc<dyn View>, LoadError> {
        let cell = {
            let mut cells = self.cells.lock().unwrap();
            Arc::clone(cells.entry(route.to_string()).or_default())
        };
        cell.get_or_try_init(|| loader()).await.cloned()
    }

    pub fn is_cached(&self, route: &str) -> bool {
        self.cells
            .lock()
            .unwrap()
            .get(route)
            .is_some_and(|cell| cell.initialized())
    }

    /// Number of routes with a resolved view.
    pub fn len(&self) -> usize {
        self.cells
            .lock()
            .unwrap()
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
