//! Store trait definitions

use fueltrack_api::{FuelLog, FuelLogUpdate, NewFuelLog, NewVehicle, Vehicle, VehicleUpdate};
use fueltrack_util::{LogId, VehicleId};

use crate::StoreResult;

/// String key-value persistence
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, if any
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replace the value under `key`
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Delete `key`; missing keys are not an error
    fn remove(&self, key: &str) -> StoreResult<()>;

    /// Check if store is healthy
    fn is_healthy(&self) -> bool;
}

/// Vehicle collection access
pub trait VehicleRepository: Send + Sync {
    /// All vehicles, in insertion order
    fn list(&self) -> StoreResult<Vec<Vehicle>>;

    fn get(&self, id: &VehicleId) -> StoreResult<Option<Vehicle>>;

    /// Assign an id and creation time, then append
    fn add(&self, vehicle: NewVehicle) -> StoreResult<Vehicle>;

    /// Merge `update` into the vehicle; `None` if it does not exist
    fn update(&self, id: &VehicleId, update: VehicleUpdate) -> StoreResult<Option<Vehicle>>;

    /// Remove the vehicle; `false` if it did not exist
    fn delete(&self, id: &VehicleId) -> StoreResult<bool>;

    /// Remove every vehicle
    fn clear(&self) -> StoreResult<()>;
}

/// Fuel log collection access
pub trait FuelLogRepository: Send + Sync {
    /// All logs, in insertion order
    fn list(&self) -> StoreResult<Vec<FuelLog>>;

    fn list_for_vehicle(&self, vehicle_id: &VehicleId) -> StoreResult<Vec<FuelLog>>;

    fn get(&self, id: &LogId) -> StoreResult<Option<FuelLog>>;

    /// Assign an id and creation time, then append
    fn add(&self, log: NewFuelLog) -> StoreResult<FuelLog>;

    /// Merge `update` into the log; `None` if it does not exist
    fn update(&self, id: &LogId, update: FuelLogUpdate) -> StoreResult<Option<FuelLog>>;

    /// Remove the log; `false` if it did not exist
    fn delete(&self, id: &LogId) -> StoreResult<bool>;

    /// Remove every log of a vehicle, returning how many were removed
    fn delete_for_vehicle(&self, vehicle_id: &VehicleId) -> StoreResult<usize>;

    /// Remove every log
    fn clear(&self) -> StoreResult<()>;
}
