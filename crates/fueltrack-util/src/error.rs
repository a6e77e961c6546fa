//! Error types for fueltrack

use thiserror::Error;

use crate::{LogId, VehicleId};

/// Core error type for fueltrack operations
#[derive(Debug, Error)]
pub enum FuelTrackError {
    #[error("Vehicle not found: {0}")]
    VehicleNotFound(VehicleId),

    #[error("Fuel log not found: {0}")]
    LogNotFound(LogId),

    #[error("Vehicle {vehicle_id} still has {log_count} fuel logs")]
    VehicleHasLogs { vehicle_id: VehicleId, log_count: usize },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Identity error: {0}")]
    IdentityError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FuelTrackError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::StoreError(msg.into())
    }

    pub fn identity(msg: impl Into<String>) -> Self {
        Self::IdentityError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, FuelTrackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_record() {
        let err = FuelTrackError::VehicleNotFound(VehicleId::new("vehicle_abc"));
        assert_eq!(err.to_string(), "Vehicle not found: vehicle_abc");

        let err = FuelTrackError::VehicleHasLogs {
            vehicle_id: VehicleId::new("vehicle_abc"),
            log_count: 3,
        };
        assert_eq!(err.to_string(), "Vehicle vehicle_abc still has 3 fuel logs");
    }

    #[test]
    fn helper_constructors() {
        assert!(matches!(
            FuelTrackError::validation("bad"),
            FuelTrackError::ValidationError(m) if m == "bad"
        ));
        assert!(matches!(FuelTrackError::store("x"), FuelTrackError::StoreError(_)));
    }
}
