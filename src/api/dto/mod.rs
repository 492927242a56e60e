//! Data Transfer Objects for REST request/response serialization.
//!
//! All wire field names are camelCase. Domain types are mapped into
//! DTOs at the handler boundary so the domain core never dictates the
//! HTTP shape.

pub mod heat_dto;
pub mod log_dto;
pub mod stats_dto;

pub use heat_dto::*;
pub use log_dto::*;
pub use stats_dto::*;
