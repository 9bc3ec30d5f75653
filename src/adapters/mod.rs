//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (axum, prometheus, reqwest).
//!
//! Adapter categories:
//! - `gateway`: Pushgateway HTTP client
//! - `metrics`: Prometheus registry, timing middleware, `/metrics` handler

pub mod gateway;
pub mod metrics;
