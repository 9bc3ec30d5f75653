//! Request timing middleware.
//!
//! Two stages sit around the router:
//! - [`start_timer`] is the outermost layer and stamps every request
//!   with a [`RequestStart`] extension before routing.
//! - [`record_duration`] is a route layer, so it only runs once a
//!   route matched. It reads the stamp, lets the handler run, then
//!   records the elapsed time under (method, route template, status).
//!
//! The route label is the matched template (`/users/:id`), never the
//! raw path, to keep label cardinality bounded.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use super::registry::MetricsRegistry;

/// Route label used if a request reaches the recorder without a
/// matched path.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Per-request start time, stored in the request extensions.
#[derive(Debug, Clone, Copy)]
pub struct RequestStart(pub Instant);

impl RequestStart {
    /// Stamp the current instant.
    pub fn now() -> Self {
        Self(Instant::now())
    }

    /// Milliseconds since the stamp.
    pub fn elapsed_ms(&self) -> f64 {
        self.0.elapsed().as_secs_f64() * 1000.0
    }
}

/// Record the request start time. Never alters the request otherwise.
pub async fn start_timer(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(RequestStart::now());
    next.run(request).await
}

/// Observe the request duration once the response is ready.
///
/// A missing start stamp means the timer layer was not installed in
/// front of the router; it is logged and recorded as 0 ms rather than
/// failing the request.
pub async fn record_duration(
    State(registry): State<Arc<MetricsRegistry>>,
    request: Request,
    next: Next,
) -> Response {
    let start = request.extensions().get::<RequestStart>().copied();
    let method = request.method().as_str().to_owned();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| UNMATCHED_ROUTE.to_owned(), |p| p.as_str().to_owned());

    let response = next.run(request).await;

    let elapsed_ms = if let Some(start) = start {
        start.elapsed_ms()
    } else {
        warn!(method = %method, route = %route, "Request reached recorder without start time");
        0.0
    };

    registry.observe_request(&method, &route, response.status().as_u16(), elapsed_ms);

    response
}
