//! Shared utilities for fueltrack
//!
//! This crate provides:
//! - ID types (VehicleId, LogId, UserId)
//! - Time utilities (epoch millis, mock time, year-month bucket keys)
//! - Error types
//! - Default paths for data and config

mod error;
mod ids;
mod paths;
mod time;

pub use error::*;
pub use ids::*;
pub use paths::*;
pub use time::*;
