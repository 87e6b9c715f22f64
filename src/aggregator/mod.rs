//! Per-ride, per-hour aggregation of wait-time observations.
//!
//! Folds decoded rows into one accumulator per ride, averages each
//! hour-of-day bucket, labels the hours for display and resolves the
//! current-hour pointer.

pub mod aggregate;
pub mod label;
pub mod timestamp;
pub mod types;
pub mod utility;

pub use aggregate::{aggregate, aggregate_now};
pub use types::{HourlySummary, RideSummary};
