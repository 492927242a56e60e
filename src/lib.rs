//! # tipmap-gateway
//!
//! REST gateway for gig-delivery tip logging with privacy-preserving
//! heat-map aggregation.
//!
//! Drivers record one entry per delivery: platform, time-of-day bucket,
//! tip outcome, and coordinates that are snapped to a coarse grid before
//! they ever touch storage. The gateway serves personal rollup statistics,
//! a personal heat map, and a subscription-gated community heat query that
//! only ever returns per-cell aggregates.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── LogService (service/)
//!     ├── AccessGate (subscription)
//!     │
//!     ├── Aggregation core (domain/)
//!     │
//!     └── LogStore (storage/: in-memory or PostgreSQL)
//! ```
//!
//! All aggregation is recompute-on-read: the domain core is a set of pure
//! functions over a snapshot borrowed from the store, with no caches and
//! no event model.

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod storage;
pub mod subscription;
