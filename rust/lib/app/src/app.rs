//! Application bootstrap.
//!
//! Order matters: construct, attach the router, install the error
//! handler and debug-log helpers, wait for the router to settle on its
//! first route, then mount. A router that failed to become ready is
//! logged and the shell is mounted anyway.

use std::sync::Arc;

use inventory_client::{ApiClient, ApiError};
use inventory_core::{AppConfig, NoopNotifier, Notifier};
use inventory_router::{
    report_navigation_error, CompletionLogger, Document, NavigationError, RouteSnapshot,
    RouteTableError, Router, TitleGuard, TransitionLogger,
};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::host::{Host, MountError, MOUNT_POINT};
use crate::report::{DebugLog, GlobalErrorHandler};
use crate::routes::{route_table, PageViews, ViewSource};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("invalid route table: {0}")]
    Routes(#[from] RouteTableError),

    #[error("api client: {0}")]
    Api(#[from] ApiError),
}

/// The constructed shell: API client, router and page state, ready to
/// be mounted into a [`Host`].
pub struct App {
    config: AppConfig,
    api: Arc<ApiClient>,
    router: Arc<Router>,
    document: Arc<Document>,
    errors: GlobalErrorHandler,
    log: DebugLog,
}

impl App {
    pub fn builder(config: AppConfig) -> AppBuilder {
        AppBuilder {
            config,
            notifier: Arc::new(NoopNotifier),
            views: Arc::new(PageViews),
            api: None,
        }
    }

    /// Settle the initial navigation to `initial`, then mount into
    /// `host` at [`MOUNT_POINT`].
    pub async fn run(&self, initial: &str, host: &dyn Host) -> Result<(), MountError> {
        info!(path = initial, "initializing application");
        if let Err(e) = self.router.start(initial).await {
            debug!("initial navigation did not commit: {}", e);
        }

        match self.router.is_ready().await {
            Ok(()) => info!(route = self.router.current().label(), "router ready"),
            Err(e) => error!("router failed to become ready: {}", e),
        }

        info!("mounting into {}", MOUNT_POINT);
        if let Err(e) = host.mount(MOUNT_POINT, &self.router, &self.document) {
            error!("failed to mount application: {}", e);
            return Err(e);
        }
        info!(
            route = self.router.current().label(),
            title = %self.document.title(),
            "application mounted into {}",
            MOUNT_POINT
        );
        Ok(())
    }

    /// Navigate the mounted shell.
    pub async fn navigate(&self, path: &str) -> Result<RouteSnapshot, NavigationError> {
        self.router.push(path).await
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    pub fn document(&self) -> &Arc<Document> {
        &self.document
    }

    pub fn errors(&self) -> &GlobalErrorHandler {
        &self.errors
    }

    pub fn log(&self) -> DebugLog {
        self.log
    }
}

pub struct AppBuilder {
    config: AppConfig,
    notifier: Arc<dyn Notifier>,
    views: Arc<dyn ViewSource>,
    api: Option<ApiClient>,
}

impl AppBuilder {
    /// Surface for user-facing notifications. Silent by default.
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn views(mut self, views: Arc<dyn ViewSource>) -> Self {
        self.views = views;
        self
    }

    /// Use a pre-built client instead of one from `config.api`.
    pub fn api(mut self, api: ApiClient) -> Self {
        self.api = Some(api);
        self
    }

    pub fn build(self) -> Result<App, AppError> {
        let api = match self.api {
            Some(api) => api,
            None => ApiClient::new(&self.config.api)?,
        };

        let suffix = self.config.navigation.title_suffix.clone();
        let document = Arc::new(Document::new(suffix.clone()));

        let router = Router::new(route_table(self.views)?, &self.config.navigation);
        router.before_each(Arc::new(TransitionLogger));
        router.before_each(Arc::new(TitleGuard::new(Arc::clone(&document), suffix)));
        router.after_each(Arc::new(CompletionLogger));
        router.on_error(Arc::new(report_navigation_error));
        debug!(routes = router.table().len(), "router attached");

        let errors = GlobalErrorHandler::new(self.notifier);
        debug!("global error handler installed");

        Ok(App {
            config: self.config,
            api: Arc::new(api),
            router: Arc::new(router),
            document,
            errors,
            log: DebugLog,
        })
    }
}
