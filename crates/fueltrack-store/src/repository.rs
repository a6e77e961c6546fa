//! Collection repositories over a key-value store
//!
//! Each collection is a single JSON array under a fixed key. Every mutation
//! reads the whole array, changes it in memory and writes it back, so a
//! per-repository lock serializes read-modify-write cycles.

use fueltrack_api::{
    FuelLog, FuelLogUpdate, LOGS_KEY, NewFuelLog, NewVehicle, VEHICLES_KEY, Vehicle, VehicleUpdate,
};
use fueltrack_util::{LogId, VehicleId, now_millis};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

use crate::{FuelLogRepository, KeyValueStore, StoreError, StoreResult, VehicleRepository};

/// Read a JSON array collection; a missing key is an empty collection
fn read_collection<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> StoreResult<Vec<T>> {
    match store.get(key)? {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(Vec::new()),
    }
}

fn write_collection<T: Serialize>(store: &dyn KeyValueStore, key: &str, items: &[T]) -> StoreResult<()> {
    let json = serde_json::to_string(items)?;
    store.set(key, &json)
}

/// Draw ids from `generate` until one is not already taken in `items`
fn fresh_id<T, I: PartialEq>(
    items: &[T],
    id_of: impl Fn(&T) -> &I,
    mut generate: impl FnMut() -> I,
) -> I {
    loop {
        let id = generate();
        if !items.iter().any(|item| id_of(item) == &id) {
            return id;
        }
    }
}

fn lock(guard: &Mutex<()>) -> StoreResult<MutexGuard<'_, ()>> {
    guard.lock().map_err(|_| StoreError::LockPoisoned)
}

/// Vehicles stored under `fueltrack_vehicles`
pub struct LocalVehicleRepository {
    store: Arc<dyn KeyValueStore>,
    write_guard: Mutex<()>,
}

impl LocalVehicleRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_guard: Mutex::new(()),
        }
    }

    fn load(&self) -> StoreResult<Vec<Vehicle>> {
        read_collection(self.store.as_ref(), VEHICLES_KEY)
    }

    fn save(&self, vehicles: &[Vehicle]) -> StoreResult<()> {
        write_collection(self.store.as_ref(), VEHICLES_KEY, vehicles)
    }
}

impl VehicleRepository for LocalVehicleRepository {
    fn list(&self) -> StoreResult<Vec<Vehicle>> {
        self.load()
    }

    fn get(&self, id: &VehicleId) -> StoreResult<Option<Vehicle>> {
        Ok(self.load()?.into_iter().find(|v| &v.id == id))
    }

    fn add(&self, vehicle: NewVehicle) -> StoreResult<Vehicle> {
        let _guard = lock(&self.write_guard)?;
        let mut vehicles = self.load()?;

        let id = fresh_id(&vehicles, |v| &v.id, VehicleId::generate);
        let vehicle = Vehicle::from_new(vehicle, id, now_millis());
        vehicles.push(vehicle.clone());
        self.save(&vehicles)?;

        info!(vehicle_id = %vehicle.id, name = %vehicle.name, "Vehicle added");
        Ok(vehicle)
    }

    fn update(&self, id: &VehicleId, update: VehicleUpdate) -> StoreResult<Option<Vehicle>> {
        let _guard = lock(&self.write_guard)?;
        let mut vehicles = self.load()?;

        let Some(vehicle) = vehicles.iter_mut().find(|v| &v.id == id) else {
            debug!(vehicle_id = %id, "Update of unknown vehicle ignored");
            return Ok(None);
        };
        vehicle.apply(update);
        let updated = vehicle.clone();
        self.save(&vehicles)?;

        info!(vehicle_id = %id, "Vehicle updated");
        Ok(Some(updated))
    }

    fn delete(&self, id: &VehicleId) -> StoreResult<bool> {
        let _guard = lock(&self.write_guard)?;
        let mut vehicles = self.load()?;

        let before = vehicles.len();
        vehicles.retain(|v| &v.id != id);
        if vehicles.len() == before {
            return Ok(false);
        }
        self.save(&vehicles)?;

        info!(vehicle_id = %id, "Vehicle deleted");
        Ok(true)
    }

    fn clear(&self) -> StoreResult<()> {
        let _guard = lock(&self.write_guard)?;
        self.store.remove(VEHICLES_KEY)?;
        info!("Vehicles cleared");
        Ok(())
    }
}

/// Fuel logs stored under `fueltrack_logs`
pub struct LocalFuelLogRepository {
    store: Arc<dyn KeyValueStore>,
    write_guard: Mutex<()>,
}

impl LocalFuelLogRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_guard: Mutex::new(()),
        }
    }

    fn load(&self) -> StoreResult<Vec<FuelLog>> {
        read_collection(self.store.as_ref(), LOGS_KEY)
    }

    fn save(&self, logs: &[FuelLog]) -> StoreResult<()> {
        write_collection(self.store.as_ref(), LOGS_KEY, logs)
    }
}

impl FuelLogRepository for LocalFuelLogRepository {
    fn list(&self) -> StoreResult<Vec<FuelLog>> {
        self.load()
    }

    fn list_for_vehicle(&self, vehicle_id: &VehicleId) -> StoreResult<Vec<FuelLog>> {
        Ok(self
            .load()?
            .into_iter()
            .filter(|log| &log.vehicle_id == vehicle_id)
            .collect())
    }

    fn get(&self, id: &LogId) -> StoreResult<Option<FuelLog>> {
        Ok(self.load()?.into_iter().find(|log| &log.id == id))
    }

    fn add(&self, log: NewFuelLog) -> StoreResult<FuelLog> {
        let _guard = lock(&self.write_guard)?;
        let mut logs = self.load()?;

        let id = fresh_id(&logs, |log| &log.id, LogId::generate);
        let log = FuelLog::from_new(log, id, now_millis());
        logs.push(log.clone());
        self.save(&logs)?;

        info!(
            log_id = %log.id,
            vehicle_id = %log.vehicle_id,
            fuel_amount = log.fuel_amount,
            total_cost = log.total_cost,
            "Fuel log added"
        );
        Ok(log)
    }

    fn update(&self, id: &LogId, update: FuelLogUpdate) -> StoreResult<Option<FuelLog>> {
        let _guard = lock(&self.write_guard)?;
        let mut logs = self.load()?;

        let Some(log) = logs.iter_mut().find(|log| &log.id == id) else {
            debug!(log_id = %id, "Update of unknown fuel log ignored");
            return Ok(None);
        };
        log.apply(update);
        let updated = log.clone();
        self.save(&logs)?;

        info!(log_id = %id, "Fuel log updated");
        Ok(Some(updated))
    }

    fn delete(&self, id: &LogId) -> StoreResult<bool> {
        let _guard = lock(&self.write_guard)?;
        let mut logs = self.load()?;

        let before = logs.len();
        logs.retain(|log| &log.id != id);
        if logs.len() == before {
            return Ok(false);
        }
        self.save(&logs)?;

        info!(log_id = %id, "Fuel log deleted");
        Ok(true)
    }

    fn delete_for_vehicle(&self, vehicle_id: &VehicleId) -> StoreResult<usize> {
        let _guard = lock(&self.write_guard)?;
        let mut logs = self.load()?;

        let before = logs.len();
        logs.retain(|log| &log.vehicle_id != vehicle_id);
        let removed = before - logs.len();
        if removed > 0 {
            self.save(&logs)?;
        }

        info!(vehicle_id = %vehicle_id, removed, "Fuel logs deleted for vehicle");
        Ok(removed)
    }

    fn clear(&self) -> StoreResult<()> {
        let _guard = lock(&self.write_guard)?;
        self.store.remove(LOGS_KEY)?;
        info!("Fuel logs cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SqliteStore;
    use fueltrack_api::{DistanceUnit, FuelUnit};

    fn store() -> Arc<dyn KeyValueStore> {
        Arc::new(SqliteStore::in_memory().unwrap())
    }

    fn corolla() -> NewVehicle {
        NewVehicle::new("Toyota Corolla", "car", DistanceUnit::Km, FuelUnit::Liter)
    }

    #[test]
    fn test_fresh_id_skips_taken_ids() {
        let taken = FuelLog::from_new(
            NewFuelLog::fill_up(VehicleId::new("vehicle_a"), 0, 100.0, 10.0, 1.5),
            LogId::new("log_abc1234"),
            0,
        );
        let mut candidates = vec![LogId::new("log_def5678"), LogId::new("log_abc1234")];

        let id = fresh_id(std::slice::from_ref(&taken), |log| &log.id, || {
            candidates.pop().unwrap()
        });
        assert_eq!(id, LogId::new("log_def5678"));
    }

    #[test]
    fn test_added_log_never_reuses_stored_id() {
        let repo = LocalFuelLogRepository::new(store());
        let first = repo
            .add(NewFuelLog::fill_up(VehicleId::new("vehicle_a"), 1, 100.0, 10.0, 1.5))
            .unwrap();
        let second = repo
            .add(NewFuelLog::fill_up(VehicleId::new("vehicle_a"), 2, 200.0, 10.0, 1.5))
            .unwrap();
        assert_ne!(first.id, second.id);

        assert!(repo.delete(&first.id).unwrap());
        assert_eq!(repo.list().unwrap(), vec![second]);
    }

    #[test]
    fn test_empty_collections() {
        let store = store();
        let vehicles = LocalVehicleRepository::new(store.clone());
        let logs = LocalFuelLogRepository::new(store);

        assert!(vehicles.list().unwrap().is_empty());
        assert!(logs.list().unwrap().is_empty());
    }

    #[test]
    fn test_vehicle_lifecycle() {
        let repo = LocalVehicleRepository::new(store());

        let added = repo.add(corolla()).unwrap();
        assert!(added.id.as_str().starts_with("vehicle_"));
        assert!(added.created_at > 0);
        assert_eq!(repo.list().unwrap(), vec![added.clone()]);

        let updated = repo
            .update(
                &added.id,
                VehicleUpdate {
                    name: Some("Corolla Hybrid".into()),
                    is_hybrid: Some(true),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Corolla Hybrid");
        assert_eq!(updated.id, added.id);
        assert_eq!(updated.created_at, added.created_at);
        assert_eq!(repo.get(&added.id).unwrap(), Some(updated));

        assert!(repo.delete(&added.id).unwrap());
        assert!(!repo.delete(&added.id).unwrap());
        assert!(repo.get(&added.id).unwrap().is_none());
    }

    #[test]
    fn test_update_missing_vehicle() {
        let repo = LocalVehicleRepository::new(store());
        let result = repo
            .update(&VehicleId::new("vehicle_nope"), VehicleUpdate::default())
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_logs_keep_insertion_order() {
        let repo = LocalFuelLogRepository::new(store());
        let v = VehicleId::new("vehicle_a");

        let first = repo.add(NewFuelLog::fill_up(v.clone(), 2_000, 150.0, 5.0, 1.5)).unwrap();
        let second = repo.add(NewFuelLog::fill_up(v.clone(), 1_000, 100.0, 5.0, 1.5)).unwrap();

        let ids: Vec<_> = repo.list().unwrap().into_iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
        assert_eq!(first.total_cost, 7.5);
    }

    #[test]
    fn test_delete_for_vehicle() {
        let repo = LocalFuelLogRepository::new(store());
        let a = VehicleId::new("vehicle_a");
        let b = VehicleId::new("vehicle_b");

        repo.add(NewFuelLog::fill_up(a.clone(), 1, 100.0, 5.0, 1.0)).unwrap();
        repo.add(NewFuelLog::fill_up(a.clone(), 2, 150.0, 5.0, 1.0)).unwrap();
        repo.add(NewFuelLog::fill_up(b.clone(), 3, 10.0, 5.0, 1.0)).unwrap();

        assert_eq!(repo.delete_for_vehicle(&a).unwrap(), 2);
        assert_eq!(repo.delete_for_vehicle(&a).unwrap(), 0);
        assert!(repo.list_for_vehicle(&a).unwrap().is_empty());
        assert_eq!(repo.list_for_vehicle(&b).unwrap().len(), 1);
    }

    #[test]
    fn test_log_update_rewrites_collection() {
        let store = store();
        let repo = LocalFuelLogRepository::new(store.clone());
        let log = repo
            .add(NewFuelLog::fill_up(VehicleId::new("vehicle_a"), 1, 100.0, 5.0, 1.0))
            .unwrap();

        let updated = repo
            .update(
                &log.id,
                FuelLogUpdate {
                    notes: Some("Full tank".into()),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.notes.as_deref(), Some("Full tank"));

        // A fresh repository over the same store sees the change
        let reread = LocalFuelLogRepository::new(store);
        assert_eq!(reread.get(&log.id).unwrap(), Some(updated));
    }

    #[test]
    fn test_reads_camel_case_json() {
        let store = store();
        store
            .set(
                LOGS_KEY,
                r#"[{"id":"log_abc1234","vehicleId":"vehicle_k2j3h4g","date":1700000000000,
                    "odometer":12500,"isTrip":false,"fuelAmount":40.5,"fuelType":"Regular",
                    "pricePerUnit":1.45,"totalCost":58.73,"currency":"USD","createdAt":1700000000000}]"#,
            )
            .unwrap();

        let repo = LocalFuelLogRepository::new(store);
        let logs = repo.list().unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].vehicle_id.as_str(), "vehicle_k2j3h4g");
        assert_eq!(logs[0].total_cost, 58.73);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let store = store();
        store.set(VEHICLES_KEY, "{not json").unwrap();

        let repo = LocalVehicleRepository::new(store);
        assert!(matches!(repo.list(), Err(StoreError::Serialization(_))));
    }

    #[test]
    fn test_clear_removes_key() {
        let store = store();
        let repo = LocalVehicleRepository::new(store.clone());
        repo.add(corolla()).unwrap();

        repo.clear().unwrap();
        assert!(store.get(VEHICLES_KEY).unwrap().is_none());
        assert!(repo.list().unwrap().is_empty());
    }
}
