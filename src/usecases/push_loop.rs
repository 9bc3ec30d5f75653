//! Push Loop - Fixed-cadence Snapshot Upload
//!
//! Every interval the loop serializes the registry and hands it to
//! the gateway. A failed push is logged and the loop carries on: no
//! retry, no backoff, the next tick is the retry. The first push
//! happens one full interval after start.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{info, instrument, warn};

use crate::adapters::metrics::MetricsRegistry;
use crate::domain::PushJob;
use crate::ports::{MetricsGateway, PushError};

/// Periodic pusher of registry snapshots.
pub struct PushLoop {
    /// Registry to serialize on every tick.
    registry: Arc<MetricsRegistry>,
    /// Push target.
    gateway: Arc<dyn MetricsGateway>,
    /// Job name and groupings attached to every push.
    job: PushJob,
    /// Time between pushes.
    interval: Duration,
}

impl PushLoop {
    /// Create a push loop.
    pub fn new(
        registry: Arc<MetricsRegistry>,
        gateway: Arc<dyn MetricsGateway>,
        job: PushJob,
        interval: Duration,
    ) -> Self {
        Self {
            registry,
            gateway,
            job,
            interval,
        }
    }

    /// Job attached to every push.
    pub fn job(&self) -> &PushJob {
        &self.job
    }

    /// Serialize the registry and push it once.
    pub async fn push_once(&self) -> Result<(), PushError> {
        let body = self
            .registry
            .encode()
            .map_err(|e| PushError::Encode(e.to_string()))?;
        self.gateway.push(&self.job, body).await
    }

    /// Run forever, pushing once per interval.
    #[instrument(skip(self), fields(job = %self.job.name))]
    pub async fn run(self) {
        info!(
            interval = ?self.interval,
            groupings = ?self.job.groupings,
            "Push loop started"
        );

        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            if let Err(e) = self.push_once().await {
                warn!(error = %e, "Prometheus push error");
            }
        }
    }

    /// Spawn the loop onto the current tokio runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    #[derive(Default)]
    struct RecordingGateway {
        bodies: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MetricsGateway for RecordingGateway {
        async fn push(&self, _job: &PushJob, body: Vec<u8>) -> Result<(), PushError> {
            self.bodies
                .lock()
                .unwrap()
                .push(String::from_utf8(body).unwrap());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_push_once_sends_current_snapshot() {
        let registry = Arc::new(MetricsRegistry::bare().unwrap());
        registry.observe_request("GET", "/orders/:id", 200, 4.0);

        let gateway = Arc::new(RecordingGateway::default());
        let job = PushJob {
            name: "web.1".to_string(),
            groupings: vec![],
        };
        let push_loop = PushLoop::new(
            Arc::clone(&registry),
            gateway.clone(),
            job,
            Duration::from_secs(10),
        );

        tokio_test::assert_ok!(push_loop.push_once().await);

        let bodies = gateway.bodies.lock().unwrap();
        assert_eq!(bodies.len(), 1);
        assert!(bodies[0].contains("http_request_duration_ms"));
        assert!(bodies[0].contains(r#"route="/orders/:id""#));
    }
}
