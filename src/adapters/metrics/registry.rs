//! Prometheus Metrics Registry - Request Latency Histogram
//!
//! Owns the process's Prometheus registry. Construct exactly one per
//! process and share it (`Arc<MetricsRegistry>`) with the middleware,
//! the `/metrics` handler, and the push loop. It lives until process
//! exit and is never torn down.

use prometheus::{Encoder, HistogramOpts, HistogramVec, Registry, TextEncoder};
use tracing::debug;

/// Histogram metric name.
pub const REQUEST_DURATION_METRIC: &str = "http_request_duration_ms";

/// Bucket upper bounds in milliseconds, 0.1ms to 500ms.
pub const REQUEST_DURATION_BUCKETS_MS: [f64; 9] =
    [0.1, 5.0, 15.0, 50.0, 100.0, 200.0, 300.0, 400.0, 500.0];

/// Label dimensions of the duration histogram, in observation order.
pub const REQUEST_DURATION_LABELS: [&str; 3] = ["method", "route", "status_code"];

/// Shared Prometheus registry plus the request duration histogram.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Request duration histogram (milliseconds).
    pub request_duration_ms: HistogramVec,
}

impl MetricsRegistry {
    /// Create the registry, register the duration histogram and, on
    /// Linux, the default process collector.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Self::bare()?;

        #[cfg(target_os = "linux")]
        registry.registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        Ok(registry)
    }

    /// Create the registry with only the duration histogram.
    pub fn bare() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let request_duration_ms = HistogramVec::new(
            HistogramOpts::new(REQUEST_DURATION_METRIC, "Duration of HTTP requests in ms")
                .buckets(REQUEST_DURATION_BUCKETS_MS.to_vec()),
            &REQUEST_DURATION_LABELS,
        )?;

        registry.register(Box::new(request_duration_ms.clone()))?;

        Ok(Self {
            registry,
            request_duration_ms,
        })
    }

    /// Record one request. Negative durations are clamped to zero.
    pub fn observe_request(&self, method: &str, route: &str, status: u16, elapsed_ms: f64) {
        let status = status.to_string();
        self.request_duration_ms
            .with_label_values(&[method, route, status.as_str()])
            .observe(elapsed_ms.max(0.0));
        debug!(method, route, status = %status, elapsed_ms, "Request observed");
    }

    /// Media type of [`Self::encode`] output.
    pub fn content_type(&self) -> &'static str {
        prometheus::TEXT_FORMAT
    }

    /// Serialize every registered metric in text exposition format.
    pub fn encode(&self) -> Result<Vec<u8>, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(buffer)
    }

    /// Underlying Prometheus registry, for registering host metrics.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_count(registry: &MetricsRegistry, labels: &[&str]) -> u64 {
        registry
            .request_duration_ms
            .with_label_values(labels)
            .get_sample_count()
    }

    #[test]
    fn test_observation_lands_under_its_label_triple() {
        let registry = MetricsRegistry::bare().unwrap();
        registry.observe_request("GET", "/users/:id", 200, 12.5);
        registry.observe_request("GET", "/users/:id", 200, 3.0);
        registry.observe_request("POST", "/users", 201, 40.0);

        assert_eq!(sample_count(&registry, &["GET", "/users/:id", "200"]), 2);
        assert_eq!(sample_count(&registry, &["POST", "/users", "201"]), 1);
    }

    #[test]
    fn test_negative_duration_is_clamped() {
        let registry = MetricsRegistry::bare().unwrap();
        registry.observe_request("GET", "/", 200, -5.0);

        let hist = registry
            .request_duration_ms
            .with_label_values(&["GET", "/", "200"]);
        assert_eq!(hist.get_sample_count(), 1);
        assert!(hist.get_sample_sum().abs() < f64::EPSILON);
    }

    #[test]
    fn test_encoded_output_lists_buckets() {
        let registry = MetricsRegistry::bare().unwrap();
        registry.observe_request("GET", "/health", 200, 7.0);

        let text = String::from_utf8(registry.encode().unwrap()).unwrap();
        assert!(text.contains("# TYPE http_request_duration_ms histogram"));
        assert!(text.contains(r#"le="0.1""#));
        assert!(text.contains(r#"le="500""#));
        assert!(text.contains(r#"route="/health""#));
        assert!(text.contains(r#"status_code="200""#));
    }

    #[test]
    fn test_content_type_is_text_format() {
        let registry = MetricsRegistry::bare().unwrap();
        assert!(registry.content_type().starts_with("text/plain"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_process_metrics_are_merged() {
        let registry = MetricsRegistry::new().unwrap();
        let text = String::from_utf8(registry.encode().unwrap()).unwrap();
        assert!(text.contains("process_"));
    }
}
