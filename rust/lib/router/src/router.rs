use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use inventory_core::NavigationConfig;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{ErrorHandler, NavigationError};
use crate::guard::{AfterGuard, BeforeGuard, GuardDecision, Transition};
use crate::route::{normalize, RouteSnapshot, RouteTable, RouteTarget};
use crate::view::{View, ViewCache};

/// Lifecycle of a single transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionState {
    Pending,
    GuardsRunning,
    Resolved,
    Cancelled,
    Errored,
}

#[derive(Debug, Clone, PartialEq)]
enum Readiness {
    Pending,
    Ready,
    Failed(NavigationError),
}

/// What the router has committed to.
struct Committed {
    route: RouteSnapshot,
    view: Option<Arc<dyn View>>,
}

/// Outcome of the guard phase for one target.
enum Flow {
    Proceed,
    Redirect(String),
}

/// Client-side router: route table, guard pipeline, view cache.
///
/// Transitions are serialized. Starting a navigation cancels the one in
/// flight (last navigation wins); a cancelled transition never commits
/// and never runs after-guards. All failures leave the current route
/// untouched and go through the error channel; none of them panic.
///
/// ```ignore
/// let router = Router::new(table, &config.navigation);
/// router.before_each(Arc::new(TransitionLogger));
/// router.after_each(Arc::new(CompletionLogger));
/// router.on_error(Arc::new(report_navigation_error));
///
/// router.start("/products").await?;
/// router.is_ready().await?;
/// ```
pub struct Router {
    table: RouteTable,
    guard_timeout: Duration,
    max_redirects: usize,
    before: RwLock<Vec<Arc<dyn BeforeGuard>>>,
    after: RwLock<Vec<Arc<dyn AfterGuard>>>,
    error_handlers: RwLock<Vec<ErrorHandler>>,
    views: ViewCache,
    current: RwLock<Committed>,
    /// Held for the whole of a transition.
    nav_lock: tokio::sync::Mutex<()>,
    /// Token of the newest transition, with its id.
    inflight: Mutex<Option<(u64, CancellationToken)>>,
    last: RwLock<Option<(u64, TransitionState)>>,
    next_id: AtomicU64,
    ready: watch::Sender<Readiness>,
}

impl Router {
    pub fn new(table: RouteTable, config: &NavigationConfig) -> Self {
        let (ready, _) = watch::channel(Readiness::Pending);
        Self {
            table,
            guard_timeout: config.guard_timeout(),
            max_redirects: config.max_redirects,
            before: RwLock::new(Vec::new()),
            after: RwLock::new(Vec::new()),
            error_handlers: RwLock::new(Vec::new()),
            views: ViewCache::new(),
            current: RwLock::new(Committed {
                route: RouteSnapshot::initial(),
                view: None,
            }),
            nav_lock: tokio::sync::Mutex::new(()),
            inflight: Mutex::new(None),
            last: RwLock::new(None),
            next_id: AtomicU64::new(1),
            ready,
        }
    }

    // ====================================================================
    // Registration
    // ====================================================================

    /// Append a before-guard. Guards run in registration order.
    pub fn before_each(&self, guard: Arc<dyn BeforeGuard>) {
        self.before.write().unwrap().push(guard);
    }

    pub fn after_each(&self, guard: Arc<dyn AfterGuard>) {
        self.after.write().unwrap().push(guard);
    }

    /// Append an error-channel handler.
    pub fn on_error(&self, handler: ErrorHandler) {
        self.error_handlers.write().unwrap().push(handler);
    }

    // ====================================================================
    // State
    // ====================================================================

    pub fn current(&self) -> RouteSnapshot {
        self.current.read().unwrap().route.clone()
    }

    pub fn current_view(&self) -> Option<Arc<dyn View>> {
        self.current.read().unwrap().view.clone()
    }

    /// Id and state of the most recently started transition.
    pub fn last_transition(&self) -> Option<(u64, TransitionState)> {
        *self.last.read().unwrap()
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn views(&self) -> &ViewCache {
        &self.views
    }

    // ====================================================================
    // Navigation
    // ====================================================================

    /// Perform the initial navigation and settle readiness with its
    /// outcome.
    pub async fn start(&self, path: &str) -> Result<RouteSnapshot, NavigationError> {
        let result = self.push(path).await;
        let settled = match &result {
            Ok(_) => Readiness::Ready,
            Err(e) => Readiness::Failed(e.clone()),
        };
        self.ready.send_if_modified(|state| {
            if *state == Readiness::Pending {
                *state = settled;
                true
            } else {
                false
            }
        });
        result
    }

    /// Wait until the initial navigation has settled.
    pub async fn is_ready(&self) -> Result<(), NavigationError> {
        let mut rx = self.ready.subscribe();
        let state = rx
            .wait_for(|state| *state != Readiness::Pending)
            .await
            .map(|state| state.clone())
            .map_err(|_| NavigationError::Cancelled {
                path: "/".to_string(),
            })?;
        match state {
            Readiness::Failed(e) => Err(e),
            Readiness::Ready | Readiness::Pending => Ok(()),
        }
    }

    /// Navigate to `path`.
    ///
    /// Resolves to the committed route, or to the reason the transition
    /// did not commit. Faults are also reported to the error channel.
    pub async fn push(&self, path: &str) -> Result<RouteSnapshot, NavigationError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let token = CancellationToken::new();
        if let Some((prev, superseded)) = self.inflight.lock().unwrap().replace((id, token.clone())) {
            debug!(id = prev, by = id, "cancelling superseded navigation");
            superseded.cancel();
        }
        self.set_state(id, TransitionState::Pending);

        let result = {
            let _serial = self.nav_lock.lock().await;
            if token.is_cancelled() {
                Err(NavigationError::Cancelled {
                    path: path.to_string(),
                })
            } else {
                self.run(id, path, &token).await
            }
        };

        {
            let mut inflight = self.inflight.lock().unwrap();
            if inflight.as_ref().is_some_and(|(current, _)| *current == id) {
                *inflight = None;
            }
        }

        match &result {
            Ok(route) => {
                self.set_state(id, TransitionState::Resolved);
                debug!(id, to = route.label(), "transition resolved");
            }
            Err(e) if e.is_cancellation() => {
                self.set_state(id, TransitionState::Cancelled);
                debug!(id, "transition cancelled: {}", e);
            }
            Err(e) => {
                self.set_state(id, TransitionState::Errored);
                self.report(e);
            }
        }
        result
    }

    async fn run(
        &self,
        id: u64,
        path: &str,
        token: &CancellationToken,
    ) -> Result<RouteSnapshot, NavigationError> {
        let from = self.current();
        let requested = normalize(path);
        let mut target = requested.clone();
        let mut redirects = 0;

        loop {
            let m = self
                .table
                .resolve(&target)
                .ok_or_else(|| NavigationError::NotFound(target.clone()))?;
            let Some(route) = self.table.get(m.index) else {
                return Err(NavigationError::NotFound(target));
            };

            let loader = match &route.target {
                RouteTarget::Redirect(to) => {
                    target = self.redirect(&requested, to, &mut redirects)?;
                    continue;
                }
                RouteTarget::View(loader) => loader,
            };
            let name = route.name.clone().unwrap_or_else(|| route.path.clone());

            let transition = Transition {
                id,
                from: from.clone(),
                to: RouteSnapshot {
                    path: target.clone(),
                    name: Some(name.clone()),
                    meta: route.meta.clone(),
                    params: m.params,
                },
                redirected_from: (target != requested).then(|| requested.clone()),
            };

            self.set_state(id, TransitionState::GuardsRunning);
            if let Flow::Redirect(to) = self.run_before_guards(&transition, token).await? {
                target = self.redirect(&requested, &to, &mut redirects)?;
                continue;
            }

            let view = tokio::select! {
                _ = token.cancelled() => {
                    return Err(NavigationError::Cancelled { path: target });
                }
                loaded = self.views.resolve(&name, loader) => loaded
                    .map_err(|source| NavigationError::Load { route: name.clone(), source })?,
            };
            if token.is_cancelled() {
                return Err(NavigationError::Cancelled { path: target });
            }

            {
                let mut current = self.current.write().unwrap();
                current.route = transition.to.clone();
                current.view = Some(view);
            }
            let after = self.after.read().unwrap().clone();
            for guard in &after {
                guard.after(&transition);
            }
            return Ok(transition.to);
        }
    }

    fn redirect(
        &self,
        requested: &str,
        to: &str,
        redirects: &mut usize,
    ) -> Result<String, NavigationError> {
        *redirects += 1;
        if *redirects > self.max_redirects {
            return Err(NavigationError::TooManyRedirects {
                path: requested.to_string(),
                limit: self.max_redirects,
            });
        }
        Ok(normalize(to))
    }

    async fn run_before_guards(
        &self,
        transition: &Transition,
        token: &CancellationToken,
    ) -> Result<Flow, NavigationError> {
        let guards = self.before.read().unwrap().clone();
        let path = &transition.to.path;

        for guard in &guards {
            let decided = tokio::select! {
                _ = token.cancelled() => {
                    return Err(NavigationError::Cancelled { path: path.clone() });
                }
                decided = tokio::time::timeout(self.guard_timeout, guard.before(transition)) => decided,
            };
            match decided {
                Err(_) => {
                    return Err(NavigationError::GuardTimeout {
                        guard: guard.name().to_string(),
                        timeout: self.guard_timeout,
                    })
                }
                Ok(Err(e)) => {
                    return Err(NavigationError::GuardFailed {
                        guard: guard.name().to_string(),
                        message: e.to_string(),
                    })
                }
                Ok(Ok(GuardDecision::Proceed)) => {}
                Ok(Ok(GuardDecision::Redirect(to))) => {
                    debug!(guard = guard.name(), to = %to, "guard redirected");
                    return Ok(Flow::Redirect(to));
                }
                Ok(Ok(GuardDecision::Abort(reason))) => {
                    return Err(NavigationError::Aborted {
                        path: path.clone(),
                        reason,
                    })
                }
            }
        }
        Ok(Flow::Proceed)
    }

    fn report(&self, err: &NavigationError) {
        let handlers = self.error_handlers.read().unwrap().clone();
        if handlers.is_empty() {
            warn!("unhandled navigation error: {}", err);
            return;
        }
        for handler in &handlers {
            handler(err);
        }
    }

    fn set_state(&self, id: u64, state: TransitionState) {
        let mut last = self.last.write().unwrap();
        // Only the newest transition's progress is tracked.
        if last.map_or(true, |(seen, _)| id >= seen) {
            *last = Some((id, state));
        }
    }
}
