//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the use cases require from
//! the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `MetricsGateway`: Outbound push of metric snapshots

pub mod gateway;

pub use gateway::{MetricsGateway, PushError};
