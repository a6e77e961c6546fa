//! Record-keeping service

use fueltrack_api::{
    AllVehiclesStats, EfficiencyPoint, FuelLog, FuelLogUpdate, NewFuelLog, NewVehicle, PricePoint,
    Vehicle, VehicleStats, VehicleUpdate, derive_total_cost,
};
use fueltrack_config::{Settings, TotalCostPolicy, VehicleDeletePolicy};
use fueltrack_store::{FuelLogRepository, VehicleRepository};
use fueltrack_util::{FuelTrackError, LogId, Result, VehicleId};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    LogQuery, aggregate_all_vehicles_stats, aggregate_vehicle_stats, efficiency_chart,
    filter_logs, price_series,
};

/// Display name for logs whose vehicle no longer exists
pub const UNKNOWN_VEHICLE_NAME: &str = "Unknown";

/// Outcome of deleting a vehicle
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleDeletion {
    pub vehicle: Vehicle,
    /// Logs removed along with the vehicle (cascade only)
    pub logs_removed: usize,
}

/// The record-keeping service.
///
/// Wraps the vehicle and fuel log repositories, validates input and applies
/// the configured total-cost and vehicle-delete policies. Statistics are
/// computed on demand by the pure aggregators.
pub struct FuelTracker {
    settings: Settings,
    vehicles: Arc<dyn VehicleRepository>,
    logs: Arc<dyn FuelLogRepository>,
}

fn non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FuelTrackError::validation(format!(
            "{name} must be a non-negative number, got {value}"
        )))
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FuelTrackError::validation(format!(
            "{name} must be greater than zero, got {value}"
        )))
    }
}

impl FuelTracker {
    pub fn new(
        settings: Settings,
        vehicles: Arc<dyn VehicleRepository>,
        logs: Arc<dyn FuelLogRepository>,
    ) -> Self {
        info!(
            total_cost = ?settings.records.total_cost,
            on_vehicle_delete = ?settings.records.on_vehicle_delete,
            "Fuel tracker initialized"
        );

        Self {
            settings,
            vehicles,
            logs,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // Vehicles

    pub fn vehicles(&self) -> Result<Vec<Vehicle>> {
        Ok(self.vehicles.list()?)
    }

    pub fn vehicle(&self, id: &VehicleId) -> Result<Option<Vehicle>> {
        Ok(self.vehicles.get(id)?)
    }

    fn require_vehicle(&self, id: &VehicleId) -> Result<Vehicle> {
        self.vehicles
            .get(id)?
            .ok_or_else(|| FuelTrackError::VehicleNotFound(id.clone()))
    }

    /// Name of a vehicle, or `"Unknown"` if it does not exist
    pub fn vehicle_name(&self, id: &VehicleId) -> Result<String> {
        Ok(self
            .vehicles
            .get(id)?
            .map(|v| v.name)
            .unwrap_or_else(|| UNKNOWN_VEHICLE_NAME.to_string()))
    }

    pub fn add_vehicle(&self, vehicle: NewVehicle) -> Result<Vehicle> {
        if vehicle.name.trim().is_empty() {
            return Err(FuelTrackError::validation("Vehicle name cannot be empty"));
        }
        if let Some(capacity) = vehicle.fuel_capacity {
            non_negative("Fuel capacity", capacity)?;
        }

        Ok(self.vehicles.add(vehicle)?)
    }

    pub fn update_vehicle(&self, id: &VehicleId, update: VehicleUpdate) -> Result<Vehicle> {
        if let Some(name) = &update.name
            && name.trim().is_empty()
        {
            return Err(FuelTrackError::validation("Vehicle name cannot be empty"));
        }
        if let Some(capacity) = update.fuel_capacity {
            non_negative("Fuel capacity", capacity)?;
        }

        self.vehicles
            .update(id, update)?
            .ok_or_else(|| FuelTrackError::VehicleNotFound(id.clone()))
    }

    /// Delete a vehicle, handling its logs per the configured policy
    pub fn delete_vehicle(&self, id: &VehicleId) -> Result<VehicleDeletion> {
        let vehicle = self.require_vehicle(id)?;

        let policy = self.settings.records.on_vehicle_delete;
        if policy == VehicleDeletePolicy::Block {
            let log_count = self.logs.list_for_vehicle(id)?.len();
            if log_count > 0 {
                warn!(vehicle_id = %id, log_count, "Vehicle delete blocked");
                return Err(FuelTrackError::VehicleHasLogs {
                    vehicle_id: id.clone(),
                    log_count,
                });
            }
        }

        // Vehicle first: if the log cleanup fails, the leftovers are orphans
        self.vehicles.delete(id)?;
        let logs_removed = match policy {
            VehicleDeletePolicy::Cascade => self.logs.delete_for_vehicle(id)?,
            VehicleDeletePolicy::Block | VehicleDeletePolicy::Orphan => 0,
        };
        info!(vehicle_id = %id, logs_removed, "Vehicle removed");

        Ok(VehicleDeletion {
            vehicle,
            logs_removed,
        })
    }

    // Fuel logs

    pub fn logs(&self) -> Result<Vec<FuelLog>> {
        Ok(self.logs.list()?)
    }

    pub fn logs_for_vehicle(&self, id: &VehicleId) -> Result<Vec<FuelLog>> {
        Ok(self.logs.list_for_vehicle(id)?)
    }

    pub fn log(&self, id: &LogId) -> Result<Option<FuelLog>> {
        Ok(self.logs.get(id)?)
    }

    /// Filtered and ordered log listing
    pub fn query_logs(&self, query: &LogQuery) -> Result<Vec<FuelLog>> {
        let logs = self.logs.list()?;
        let vehicles = self.vehicles.list()?;
        Ok(filter_logs(&logs, &vehicles, query))
    }

    pub fn add_log(&self, mut log: NewFuelLog) -> Result<FuelLog> {
        self.require_vehicle(&log.vehicle_id)?;

        positive("Fuel amount", log.fuel_amount)?;
        non_negative("Price per unit", log.price_per_unit)?;
        non_negative("Odometer", log.odometer)?;
        if let Some(distance) = log.trip_distance {
            non_negative("Trip distance", distance)?;
        }
        if let Some(total) = log.total_cost {
            non_negative("Total cost", total)?;
        }

        if self.settings.records.total_cost == TotalCostPolicy::Derived {
            log.total_cost = None;
        }
        if log.currency.trim().is_empty() {
            log.currency = self.settings.records.default_currency.clone();
        }

        Ok(self.logs.add(log)?)
    }

    pub fn update_log(&self, id: &LogId, mut update: FuelLogUpdate) -> Result<FuelLog> {
        let existing = self
            .logs
            .get(id)?
            .ok_or_else(|| FuelTrackError::LogNotFound(id.clone()))?;

        if let Some(vehicle_id) = &update.vehicle_id
            && vehicle_id != &existing.vehicle_id
        {
            self.require_vehicle(vehicle_id)?;
        }
        if let Some(amount) = update.fuel_amount {
            positive("Fuel amount", amount)?;
        }
        if let Some(price) = update.price_per_unit {
            non_negative("Price per unit", price)?;
        }
        if let Some(odometer) = update.odometer {
            non_negative("Odometer", odometer)?;
        }
        if let Some(distance) = update.trip_distance {
            non_negative("Trip distance", distance)?;
        }
        if let Some(total) = update.total_cost {
            non_negative("Total cost", total)?;
        }

        let amount = update.fuel_amount.unwrap_or(existing.fuel_amount);
        let price = update.price_per_unit.unwrap_or(existing.price_per_unit);
        match self.settings.records.total_cost {
            TotalCostPolicy::Derived => {
                update.total_cost = Some(derive_total_cost(amount, price));
            }
            TotalCostPolicy::Reconcile => {
                if update.total_cost.is_none() && update.changes_cost_inputs() {
                    let derived = derive_total_cost(amount, price);
                    debug!(log_id = %id, total_cost = derived, "Total cost recomputed");
                    update.total_cost = Some(derived);
                }
            }
        }

        self.logs
            .update(id, update)?
            .ok_or_else(|| FuelTrackError::LogNotFound(id.clone()))
    }

    pub fn delete_log(&self, id: &LogId) -> Result<()> {
        if self.logs.delete(id)? {
            Ok(())
        } else {
            Err(FuelTrackError::LogNotFound(id.clone()))
        }
    }

    // Statistics

    pub fn vehicle_stats(&self, id: &VehicleId) -> Result<VehicleStats> {
        self.require_vehicle(id)?;
        let logs = self.logs.list_for_vehicle(id)?;
        Ok(aggregate_vehicle_stats(&logs))
    }

    pub fn all_stats(&self) -> Result<AllVehiclesStats> {
        let logs = self.logs.list()?;
        let vehicles = self.vehicles.list()?;
        Ok(aggregate_all_vehicles_stats(&logs, &vehicles))
    }

    pub fn efficiency_chart(&self, id: &VehicleId) -> Result<Vec<EfficiencyPoint>> {
        let vehicle = self.require_vehicle(id)?;
        let logs = self.logs.list_for_vehicle(id)?;
        Ok(efficiency_chart(&logs, &vehicle))
    }

    pub fn price_series(&self, id: &VehicleId) -> Result<Vec<PricePoint>> {
        self.require_vehicle(id)?;
        let logs = self.logs.list_for_vehicle(id)?;
        Ok(price_series(&logs))
    }

    /// Remove every vehicle and log
    pub fn clear_all(&self) -> Result<()> {
        self.logs.clear()?;
        self.vehicles.clear()?;
        info!("All records cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fueltrack_api::{DistanceUnit, FuelUnit};
    use fueltrack_store::{
        KeyValueStore, LocalFuelLogRepository, LocalVehicleRepository, SqliteStore, StoreError,
        StoreResult,
    };

    /// Vehicle repository whose deletes fail
    struct UndeletableVehicles(LocalVehicleRepository);

    impl VehicleRepository for UndeletableVehicles {
        fn list(&self) -> StoreResult<Vec<Vehicle>> {
            self.0.list()
        }

        fn get(&self, id: &VehicleId) -> StoreResult<Option<Vehicle>> {
            self.0.get(id)
        }

        fn add(&self, vehicle: NewVehicle) -> StoreResult<Vehicle> {
            self.0.add(vehicle)
        }

        fn update(&self, id: &VehicleId, update: VehicleUpdate) -> StoreResult<Option<Vehicle>> {
            self.0.update(id, update)
        }

        fn delete(&self, _id: &VehicleId) -> StoreResult<bool> {
            Err(StoreError::Io(std::io::Error::other("disk full")))
        }

        fn clear(&self) -> StoreResult<()> {
            self.0.clear()
        }
    }

    fn tracker_with(total_cost: TotalCostPolicy, on_delete: VehicleDeletePolicy) -> FuelTracker {
        let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::in_memory().unwrap());
        let mut settings = Settings::default();
        settings.records.total_cost = total_cost;
        settings.records.on_vehicle_delete = on_delete;

        FuelTracker::new(
            settings,
            Arc::new(LocalVehicleRepository::new(store.clone())),
            Arc::new(LocalFuelLogRepository::new(store)),
        )
    }

    fn tracker() -> FuelTracker {
        tracker_with(TotalCostPolicy::Reconcile, VehicleDeletePolicy::Cascade)
    }

    fn add_corolla(tracker: &FuelTracker) -> Vehicle {
        tracker
            .add_vehicle(NewVehicle::new("Toyota Corolla", "car", DistanceUnit::Km, FuelUnit::Liter))
            .unwrap()
    }

    #[test]
    fn test_add_log_requires_vehicle() {
        let tracker = tracker();
        let result = tracker.add_log(NewFuelLog::fill_up(VehicleId::new("vehicle_x"), 1, 100.0, 5.0, 1.0));
        assert!(matches!(result, Err(FuelTrackError::VehicleNotFound(_))));
    }

    #[test]
    fn test_add_log_validation() {
        let tracker = tracker();
        let v = add_corolla(&tracker);

        for (fuel, price, odometer) in [(0.0, 1.0, 10.0), (5.0, -1.0, 10.0), (5.0, 1.0, -10.0), (f64::NAN, 1.0, 10.0)] {
            let result = tracker.add_log(NewFuelLog::fill_up(v.id.clone(), 1, odometer, fuel, price));
            assert!(
                matches!(result, Err(FuelTrackError::ValidationError(_))),
                "fuel={fuel} price={price} odometer={odometer}"
            );
        }
        assert!(tracker.logs().unwrap().is_empty());
    }

    #[test]
    fn test_empty_vehicle_name_rejected() {
        let tracker = tracker();
        let result = tracker.add_vehicle(NewVehicle::new("  ", "car", DistanceUnit::Km, FuelUnit::Liter));
        assert!(matches!(result, Err(FuelTrackError::ValidationError(_))));
    }

    #[test]
    fn test_default_currency_applied() {
        let tracker = tracker();
        let v = add_corolla(&tracker);
        let log = tracker
            .add_log(NewFuelLog::fill_up(v.id.clone(), 1, 100.0, 5.0, 1.0))
            .unwrap();
        assert_eq!(log.currency, "USD");
    }

    #[test]
    fn test_reconcile_keeps_explicit_total() {
        let tracker = tracker();
        let v = add_corolla(&tracker);

        let mut new = NewFuelLog::fill_up(v.id.clone(), 1, 100.0, 40.0, 1.5);
        new.total_cost = Some(58.0);
        let log = tracker.add_log(new).unwrap();
        assert_eq!(log.total_cost, 58.0);

        // Unrelated edit leaves the total alone
        let log = tracker
            .update_log(&log.id, FuelLogUpdate { notes: Some("loyalty discount".into()), ..Default::default() })
            .unwrap();
        assert_eq!(log.total_cost, 58.0);

        // Changing the amount recomputes it
        let log = tracker
            .update_log(&log.id, FuelLogUpdate { fuel_amount: Some(50.0), ..Default::default() })
            .unwrap();
        assert_eq!(log.total_cost, 75.0);

        // Explicit total with new inputs wins
        let log = tracker
            .update_log(
                &log.id,
                FuelLogUpdate {
                    price_per_unit: Some(2.0),
                    total_cost: Some(95.0),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(log.total_cost, 95.0);
    }

    #[test]
    fn test_derived_ignores_supplied_total() {
        let tracker = tracker_with(TotalCostPolicy::Derived, VehicleDeletePolicy::Cascade);
        let v = add_corolla(&tracker);

        let mut new = NewFuelLog::fill_up(v.id.clone(), 1, 100.0, 40.0, 1.5);
        new.total_cost = Some(58.0);
        let log = tracker.add_log(new).unwrap();
        assert_eq!(log.total_cost, 60.0);

        let log = tracker
            .update_log(&log.id, FuelLogUpdate { total_cost: Some(1.0), ..Default::default() })
            .unwrap();
        assert_eq!(log.total_cost, 60.0);
    }

    #[test]
    fn test_update_missing_log() {
        let tracker = tracker();
        let result = tracker.update_log(&LogId::new("log_nope"), FuelLogUpdate::default());
        assert!(matches!(result, Err(FuelTrackError::LogNotFound(_))));
        assert!(matches!(
            tracker.delete_log(&LogId::new("log_nope")),
            Err(FuelTrackError::LogNotFound(_))
        ));
    }

    #[test]
    fn test_cascade_delete() {
        let tracker = tracker();
        let v = add_corolla(&tracker);
        tracker.add_log(NewFuelLog::fill_up(v.id.clone(), 1, 100.0, 5.0, 1.0)).unwrap();
        tracker.add_log(NewFuelLog::fill_up(v.id.clone(), 2, 150.0, 5.0, 1.0)).unwrap();

        let deletion = tracker.delete_vehicle(&v.id).unwrap();
        assert_eq!(deletion.logs_removed, 2);
        assert!(tracker.logs().unwrap().is_empty());
        assert!(tracker.vehicles().unwrap().is_empty());
    }

    #[test]
    fn test_failed_vehicle_delete_keeps_logs() {
        let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::in_memory().unwrap());
        let tracker = FuelTracker::new(
            Settings::default(),
            Arc::new(UndeletableVehicles(LocalVehicleRepository::new(store.clone()))),
            Arc::new(LocalFuelLogRepository::new(store)),
        );
        let v = add_corolla(&tracker);
        tracker.add_log(NewFuelLog::fill_up(v.id.clone(), 1, 100.0, 5.0, 1.0)).unwrap();

        assert!(tracker.delete_vehicle(&v.id).is_err());
        assert_eq!(tracker.vehicles().unwrap().len(), 1);
        assert_eq!(tracker.logs().unwrap().len(), 1);
    }

    #[test]
    fn test_block_delete() {
        let tracker = tracker_with(TotalCostPolicy::Reconcile, VehicleDeletePolicy::Block);
        let v = add_corolla(&tracker);
        let log = tracker.add_log(NewFuelLog::fill_up(v.id.clone(), 1, 100.0, 5.0, 1.0)).unwrap();

        let result = tracker.delete_vehicle(&v.id);
        assert!(matches!(result, Err(FuelTrackError::VehicleHasLogs { log_count: 1, .. })));
        assert!(tracker.vehicle(&v.id).unwrap().is_some());

        tracker.delete_log(&log.id).unwrap();
        assert_eq!(tracker.delete_vehicle(&v.id).unwrap().logs_removed, 0);
    }

    #[test]
    fn test_orphan_delete() {
        let tracker = tracker_with(TotalCostPolicy::Reconcile, VehicleDeletePolicy::Orphan);
        let v = add_corolla(&tracker);
        tracker.add_log(NewFuelLog::fill_up(v.id.clone(), 1, 100.0, 5.0, 1.0)).unwrap();

        tracker.delete_vehicle(&v.id).unwrap();
        assert_eq!(tracker.logs().unwrap().len(), 1);
        assert_eq!(tracker.vehicle_name(&v.id).unwrap(), "Unknown");

        let stats = tracker.all_stats().unwrap();
        assert_eq!(stats.unassigned_logs, 1);
        assert_eq!(stats.total_fuel, 0.0);
    }

    #[test]
    fn test_delete_missing_vehicle() {
        let tracker = tracker();
        assert!(matches!(
            tracker.delete_vehicle(&VehicleId::new("vehicle_nope")),
            Err(FuelTrackError::VehicleNotFound(_))
        ));
    }

    #[test]
    fn test_vehicle_stats_and_charts() {
        let tracker = tracker();
        let v = add_corolla(&tracker);
        tracker.add_log(NewFuelLog::fill_up(v.id.clone(), 1_000, 100.0, 4.0, 1.5)).unwrap();
        tracker.add_log(NewFuelLog::fill_up(v.id.clone(), 2_000, 150.0, 5.0, 1.6)).unwrap();

        let stats = tracker.vehicle_stats(&v.id).unwrap();
        assert_eq!(stats.total_logs, 2);
        assert_eq!(stats.total_distance, 50.0);
        assert_eq!(stats.last_efficiency, Some(10.0));

        let chart = tracker.efficiency_chart(&v.id).unwrap();
        assert_eq!(chart.len(), 1);
        assert_eq!(chart[0].unit, Some(fueltrack_api::EfficiencyUnit::KmPerLiter));

        let prices = tracker.price_series(&v.id).unwrap();
        assert_eq!(prices.iter().map(|p| p.price).collect::<Vec<_>>(), vec![1.5, 1.6]);
    }

    #[test]
    fn test_clear_all() {
        let tracker = tracker();
        let v = add_corolla(&tracker);
        tracker.add_log(NewFuelLog::fill_up(v.id.clone(), 1, 100.0, 5.0, 1.0)).unwrap();

        tracker.clear_all().unwrap();
        assert!(tracker.vehicles().unwrap().is_empty());
        assert!(tracker.logs().unwrap().is_empty());
    }
}
