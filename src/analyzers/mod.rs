//! Aggregation over filtered datasets.
//!
//! Computes test-count-weighted summaries, per-provider and per-city
//! rankings, market share, time series, and map markers for the
//! presentation layer.

pub mod aggregate;
pub mod cities;
pub mod map;
pub mod trend;
pub mod types;
pub mod utility;
