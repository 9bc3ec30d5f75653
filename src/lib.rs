//! Express Prom Metrics - Library Root
//!
//! Request latency histograms for axum servers, served on `/metrics`
//! behind HTTP Basic auth and/or pushed periodically to a Prometheus
//! Pushgateway. Re-exports all modules for integration tests and
//! benchmarks.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;

pub use adapters::metrics::MetricsRegistry;
pub use config::MetricsConfig;
pub use usecases::{MetricsBootstrap, MetricsInstallation};
