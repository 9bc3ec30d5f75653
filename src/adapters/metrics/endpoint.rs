//! `GET /metrics` handler guarded by HTTP Basic auth.
//!
//! On success the body is the full registry snapshot in text
//! exposition format. Any credential problem (absent, malformed,
//! wrong user, wrong password) gets the same 401 so the response
//! never reveals which field was wrong.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::{debug, error};

use super::registry::MetricsRegistry;
use crate::domain::{BasicCredentials, CredentialCheck};

/// Fixed path of the pull endpoint.
pub const METRICS_PATH: &str = "/metrics";

/// Challenge sent with every 401.
pub const AUTH_CHALLENGE: &str = r#"Basic realm="example""#;

/// Body sent with every 401.
pub const ACCESS_DENIED: &str = "Access denied";

/// State shared by the `/metrics` handler.
#[derive(Clone)]
pub struct MetricsEndpoint {
    /// Registry to serialize.
    pub registry: Arc<MetricsRegistry>,
    /// Expected scrape credentials.
    pub check: Arc<CredentialCheck>,
}

impl MetricsEndpoint {
    /// Create the endpoint state.
    pub fn new(registry: Arc<MetricsRegistry>, check: CredentialCheck) -> Self {
        Self {
            registry,
            check: Arc::new(check),
        }
    }
}

/// Serve the metric snapshot to an authenticated scraper.
pub async fn serve_metrics(
    State(endpoint): State<MetricsEndpoint>,
    headers: HeaderMap,
) -> Response {
    let supplied = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(BasicCredentials::from_header);

    if !endpoint.check.permits(supplied.as_ref()) {
        debug!("Rejected /metrics request");
        return unauthorized();
    }

    match endpoint.registry.encode() {
        Ok(body) => (
            [(header::CONTENT_TYPE, endpoint.registry.content_type())],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, AUTH_CHALLENGE)],
        ACCESS_DENIED,
    )
        .into_response()
}
