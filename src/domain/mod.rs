//! Domain layer - Credential checks and push job identity.
//!
//! Pure logic with no I/O: parsing HTTP Basic credentials, deciding
//! whether they grant access to `/metrics`, and deriving the
//! Pushgateway job name and grouping labels from deployment config.

pub mod credentials;
pub mod push_job;

pub use credentials::{BasicCredentials, CredentialCheck};
pub use push_job::PushJob;
