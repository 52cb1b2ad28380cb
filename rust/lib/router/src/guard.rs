//! Navigation guards.
//!
//! Before-guards run in registration order for every transition and must
//! each return a [`GuardDecision`]. A guard whose future never completes
//! is cut off by the router's guard timeout. After-guards observe a
//! committed transition and cannot change it.

use std::future::Future;
use std::sync::Arc;

use tracing::info;

use crate::document::Document;
use crate::route::RouteSnapshot;

/// Per-transition navigation context handed to guards.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub id: u64,
    pub from: RouteSnapshot,
    pub to: RouteSnapshot,
    /// Path originally requested when `to` was reached through redirects.
    pub redirected_from: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    /// Abandon this target and navigate to another path instead.
    Redirect(String),
    /// Stay on the current route.
    Abort(String),
}

/// A guard that failed outright (as opposed to deciding to abort).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct GuardError(pub String);

#[async_trait::async_trait]
pub trait BeforeGuard: Send + Sync + 'static {
    /// Used in logs and timeout errors.
    fn name(&self) -> &str;

    async fn before(&self, transition: &Transition) -> Result<GuardDecision, GuardError>;
}

pub trait AfterGuard: Send + Sync + 'static {
    fn after(&self, transition: &Transition);
}

// ── Closure guards ──────────────────────────────────────────────────

/// Before-guard backed by an async closure. The closure receives an owned
/// [`Transition`] so its future can be `'static`.
pub struct BeforeFn<F> {
    name: String,
    f: F,
}

pub fn before_fn<F, Fut>(name: impl Into<String>, f: F) -> Arc<dyn BeforeGuard>
where
    F: Fn(Transition) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<GuardDecision, GuardError>> + Send + 'static,
{
    Arc::new(BeforeFn {
        name: name.into(),
        f,
    })
}

#[async_trait::async_trait]
impl<F, Fut> BeforeGuard for BeforeFn<F>
where
    F: Fn(Transition) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<GuardDecision, GuardError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn before(&self, transition: &Transition) -> Result<GuardDecision, GuardError> {
        (self.f)(transition.clone()).await
    }
}

/// After-guard backed by a plain closure.
pub struct AfterFn<F>(F);

pub fn after_fn<F>(f: F) -> Arc<dyn AfterGuard>
where
    F: Fn(&Transition) + Send + Sync + 'static,
{
    Arc::new(AfterFn(f))
}

impl<F> AfterGuard for AfterFn<F>
where
    F: Fn(&Transition) + Send + Sync + 'static,
{
    fn after(&self, transition: &Transition) {
        (self.0)(transition)
    }
}

// ── Built-in guards ─────────────────────────────────────────────────

/// Logs every transition as it starts.
pub struct TransitionLogger;

#[async_trait::async_trait]
impl BeforeGuard for TransitionLogger {
    fn name(&self) -> &str {
        "transition-logger"
    }

    async fn before(&self, transition: &Transition) -> Result<GuardDecision, GuardError> {
        info!(
            id = transition.id,
            from = transition.from.label(),
            to = transition.to.label(),
            "navigating"
        );
        Ok(GuardDecision::Proceed)
    }
}

/// Sets the page title to `"{meta.title} - {suffix}"`. Destinations
/// without a title leave the current one in place.
pub struct TitleGuard {
    document: Arc<Document>,
    suffix: String,
}

impl TitleGuard {
    pub fn new(document: Arc<Document>, suffix: impl Into<String>) -> Self {
        Self {
            document,
            suffix: suffix.into(),
        }
    }
}

#[async_trait::async_trait]
impl BeforeGuard for TitleGuard {
    fn name(&self) -> &str {
        "title"
    }

    async fn before(&self, transition: &Transition) -> Result<GuardDecision, GuardError> {
        if let Some(title) = transition.to.meta.title() {
            self.document.set_title(format!("{} - {}", title, self.suffix));
        }
        Ok(GuardDecision::Proceed)
    }
}

/// Logs every committed transition.
pub struct CompletionLogger;

impl AfterGuard for CompletionLogger {
    fn after(&self, transition: &Transition) {
        info!(id = transition.id, to = transition.to.label(), "navigation complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::Meta;

    fn snapshot(path: &str, name: &str, title: Option<&str>) -> RouteSnapshot {
        let mut meta = Meta::new();
        if let Some(t) = title {
            meta.insert("title", t);
        }
        RouteSnapshot {
            path: path.to_string(),
            name: Some(name.to_string()),
            meta,
            params: Default::default(),
        }
    }

    fn transition(to: RouteSnapshot) -> Transition {
        Transition {
            id: 1,
            from: RouteSnapshot::initial(),
            to,
            redirected_from: None,
        }
    }

    #[tokio::test]
    async fn title_guard_sets_suffixed_title() {
        let doc = Arc::new(Document::new("库存管理系统"));
        let guard = TitleGuard::new(doc.clone(), "库存管理系统");

        let t = transition(snapshot("/bom", "BOM", Some("BOM管理")));
        assert_eq!(guard.before(&t).await.unwrap(), GuardDecision::Proceed);
        assert_eq!(doc.title(), "BOM管理 - 库存管理系统");
    }

    #[tokio::test]
    async fn title_guard_keeps_title_without_meta() {
        let doc = Arc::new(Document::new("产品管理 - 库存管理系统"));
        let guard = TitleGuard::new(doc.clone(), "库存管理系统");

        let t = transition(snapshot("/orders/3", "OrderDetail", None));
        guard.before(&t).await.unwrap();
        assert_eq!(doc.title(), "产品管理 - 库存管理系统");
    }

    #[tokio::test]
    async fn closure_guard_sees_owned_transition() {
        let guard = before_fn("only-products", |t: Transition| async move {
            if t.to.path == "/products" {
                Ok(GuardDecision::Proceed)
            } else {
                Ok(GuardDecision::Redirect("/products".to_string()))
            }
        });
        assert_eq!(guard.name(), "only-products");

        let to_bom = transition(snapshot("/bom", "BOM", None));
        assert_eq!(
            guard.before(&to_bom).await.unwrap(),
            GuardDecision::Redirect("/products".to_string())
        );
    }

    #[test]
    fn closure_after_guard() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = seen.clone();
        let guard = after_fn(move |t: &Transition| sink.lock().unwrap().push(t.to.path.clone()));
        guard.after(&transition(snapshot("/", "Dashboard", None)));
        assert_eq!(*seen.lock().unwrap(), vec!["/".to_string()]);
    }
}
