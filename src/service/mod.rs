//! Service layer: business logic orchestration.
//!
//! [`LogService`] coordinates log mutations and the recompute-on-read
//! aggregation paths, delegating all numeric work to the domain core.

pub mod log_service;

pub use log_service::LogService;
