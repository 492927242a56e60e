//! Domain layer: the geospatial aggregation and statistics core.
//!
//! Pure data types and functions: the privacy snap, the time-of-day
//! classifier, the delivery log record, and the aggregation engine
//! (heat points, bounded community cells, rollup statistics). Nothing
//! in here performs I/O or holds state across calls.

pub mod delivery_log;
pub mod geo;
pub mod heatmap;
pub mod log_id;
pub mod platform;
pub mod stats;
pub mod time_bucket;

pub use delivery_log::{DeliveryLog, LogInput};
pub use geo::Bounds;
pub use heatmap::{CommunityCell, HeatPoint};
pub use log_id::LogId;
pub use platform::Platform;
pub use stats::Stats;
pub use time_bucket::TimeBucket;
