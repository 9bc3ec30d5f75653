//! Use Cases Layer - Application Workflows
//!
//! Orchestrates adapters and domain logic into the two delivery
//! modes of the add-on.
//!
//! Use cases:
//! - `MetricsBootstrap`: Reads flags and wires serving and/or pushing
//! - `PushLoop`: Fixed-cadence snapshot upload to a gateway

pub mod bootstrap;
pub mod push_loop;

pub use bootstrap::{MetricsBootstrap, MetricsInstallation};
pub use push_loop::PushLoop;
