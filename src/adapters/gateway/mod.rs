//! Gateway Adapters - Outbound Metric Delivery
//!
//! Implements [`crate::ports::MetricsGateway`] for a Prometheus
//! Pushgateway over HTTP.

pub mod pushgateway;

pub use pushgateway::PushgatewayClient;
