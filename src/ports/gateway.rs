//! Metrics Gateway Port - Outbound Metric Snapshot Delivery
//!
//! Defines the trait the push loop uses to ship an encoded snapshot
//! to a remote aggregation gateway. The loop never sees transport
//! details; it only gets a `Result` back and logs failures.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::PushJob;

/// Reasons a single push can fail.
#[derive(Debug, Error)]
pub enum PushError {
    /// The configured gateway URL cannot be used as a push target.
    #[error("invalid gateway url {url}: {reason}")]
    InvalidUrl {
        /// Offending URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
    /// Connection, TLS, or timeout failure.
    #[error("transport error: {0}")]
    Transport(String),
    /// The gateway answered with a non-success status.
    #[error("gateway returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body (may be empty).
        body: String,
    },
    /// The registry could not be serialized.
    #[error("failed to encode metrics: {0}")]
    Encode(String),
}

/// Trait for metric push targets.
///
/// Implementors send one encoded snapshot per call. No retries:
/// the caller's next tick is the retry.
#[async_trait]
pub trait MetricsGateway: Send + Sync + 'static {
    /// Push an encoded snapshot under the given job and groupings.
    async fn push(&self, job: &PushJob, body: Vec<u8>) -> Result<(), PushError>;
}
