//! Statistics engine and record-keeping service for fueltrack
//!
//! This crate contains:
//! - Pure aggregators (efficiency, per-vehicle and cross-vehicle statistics)
//! - Chart series and log list queries for presentation
//! - The `FuelTracker` service, which applies record-keeping policy on top
//!   of injected repositories
//! - Seeded sample data generation

mod efficiency;
mod query;
mod sample;
mod series;
mod stats;
mod tracker;

pub use efficiency::*;
pub use query::*;
pub use sample::*;
pub use series::*;
pub use stats::*;
pub use tracker::*;
