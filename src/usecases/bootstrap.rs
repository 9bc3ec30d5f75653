//! Metrics Bootstrap - Wiring the Add-on into a Host Router
//!
//! Two independent flags decide what gets installed:
//! - serving: `/metrics` route, request timer (outermost layer, before
//!   routing) and duration recorder (route layer, after routing).
//! - pushing: the push loop, spawned on the current runtime.
//!
//! Either, both, or neither may be active. When serving is off the
//! router is returned untouched, so `/metrics` falls through to the
//! host's normal 404 and no timing code runs.

use std::sync::Arc;

use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::get;
use axum::Router;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::push_loop::PushLoop;
use crate::adapters::gateway::PushgatewayClient;
use crate::adapters::metrics::{
    record_duration, serve_metrics, start_timer, MetricsEndpoint, MetricsRegistry, METRICS_PATH,
};
use crate::config::MetricsConfig;
use crate::domain::{CredentialCheck, PushJob};
use crate::ports::MetricsGateway;

/// Result of [`MetricsBootstrap::install`].
pub struct MetricsInstallation {
    /// Host router, instrumented if serving is enabled.
    pub router: Router,
    /// Push loop task, if pushing is enabled and configured.
    pub push_task: Option<JoinHandle<()>>,
}

/// Installs metrics serving and pushing according to config.
pub struct MetricsBootstrap {
    config: MetricsConfig,
    registry: Arc<MetricsRegistry>,
    gateway: Option<Arc<dyn MetricsGateway>>,
}

impl MetricsBootstrap {
    /// Create a bootstrap over the process's single registry.
    pub fn new(config: MetricsConfig, registry: Arc<MetricsRegistry>) -> Self {
        Self {
            config,
            registry,
            gateway: None,
        }
    }

    /// Use a specific push target instead of building a
    /// [`PushgatewayClient`] from `PROMETHEUS_PUSH_URL`.
    #[must_use]
    pub fn with_gateway(mut self, gateway: Arc<dyn MetricsGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Wire metrics into `app`. Call after the host's routes are
    /// registered: the recorder only wraps routes that already exist.
    ///
    /// # Panics
    /// Panics if serving is enabled and the host already routes
    /// `GET /metrics` (axum rejects overlapping routes), and panics
    /// outside a tokio runtime when pushing is enabled.
    pub fn install(self, app: Router) -> MetricsInstallation {
        let router = if self.config.serve_enabled {
            self.instrument(app)
        } else {
            app
        };

        let push_task = if self.config.push.enabled {
            self.start_push_loop()
        } else {
            None
        };

        MetricsInstallation { router, push_task }
    }

    fn instrument(&self, app: Router) -> Router {
        let check = CredentialCheck::new(&self.config.serve_auth);
        if !check.is_configured() {
            warn!("PROMETHEUS_USERNAME/PROMETHEUS_PASSWORD unset, /metrics will reject every request");
        }

        let endpoint = MetricsEndpoint::new(Arc::clone(&self.registry), check);

        info!("Prometheus metrics route added ({METRICS_PATH})");

        app.route(METRICS_PATH, get(serve_metrics).with_state(endpoint))
            .route_layer(from_fn_with_state(
                Arc::clone(&self.registry),
                record_duration,
            ))
            .layer(from_fn(start_timer))
    }

    fn start_push_loop(&self) -> Option<JoinHandle<()>> {
        let gateway: Arc<dyn MetricsGateway> = match &self.gateway {
            Some(gateway) => Arc::clone(gateway),
            None => match PushgatewayClient::new(&self.config.push) {
                Ok(client) => Arc::new(client),
                Err(e) => {
                    warn!(error = %e, "Prometheus push enabled but gateway unusable, push disabled");
                    return None;
                }
            },
        };

        let job = PushJob::from_deployment(&self.config.deployment);
        info!(job = %job.name, "Prometheus push enabled");

        let push_loop = PushLoop::new(
            Arc::clone(&self.registry),
            gateway,
            job,
            self.config.push.interval,
        );
        Some(push_loop.spawn())
    }
}
