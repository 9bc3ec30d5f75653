//! Metrics Adapters - Registry, Timing Middleware, Pull Endpoint
//!
//! Provides the Prometheus registry holding the request duration
//! histogram, the axum middleware pair that times each request, and
//! the Basic-auth guarded `/metrics` handler.

pub mod endpoint;
pub mod middleware;
pub mod registry;

pub use endpoint::{serve_metrics, MetricsEndpoint, METRICS_PATH};
pub use middleware::{record_duration, start_timer, RequestStart};
pub use registry::MetricsRegistry;
