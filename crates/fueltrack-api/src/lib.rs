//! Data model for fueltrack
//!
//! This crate defines the records shared by every layer:
//! - Vehicles and fuel logs (as persisted)
//! - Insert and partial-update payloads
//! - Efficiency and statistics result structures

mod stats;
mod types;

pub use stats::*;
pub use types::*;

/// Storage key of the vehicle collection
pub const VEHICLES_KEY: &str = "fueltrack_vehicles";

/// Storage key of the fuel log collection
pub const LOGS_KEY: &str = "fueltrack_logs";

/// Storage key of the identity session
pub const SESSION_KEY: &str = "fueltrack_session";
