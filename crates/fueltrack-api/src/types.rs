//! Vehicle and fuel log records

use fueltrack_util::{LogId, VehicleId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit the odometer and trip distances are recorded in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    Km,
    Mi,
}

impl DistanceUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceUnit::Km => "km",
            DistanceUnit::Mi => "mi",
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit fuel amounts are recorded in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelUnit {
    Liter,
    Gallon,
}

impl FuelUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            FuelUnit::Liter => "liter",
            FuelUnit::Gallon => "gallon",
        }
    }
}

impl fmt::Display for FuelUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: VehicleId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category tag ("car", "truck", ...)
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub distance_unit: DistanceUnit,
    pub fuel_unit: FuelUnit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_capacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_two_tanks: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_hybrid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_plate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_policy: Option<String>,
    /// Creation time, epoch millis
    #[serde(default)]
    pub created_at: i64,
}

/// Fields supplied when registering a vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVehicle {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub image: Option<String>,
    pub distance_unit: DistanceUnit,
    pub fuel_unit: FuelUnit,
    #[serde(default)]
    pub fuel_capacity: Option<f64>,
    #[serde(default)]
    pub fuel_type: Option<String>,
    #[serde(default)]
    pub has_two_tanks: Option<bool>,
    #[serde(default)]
    pub is_hybrid: Option<bool>,
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub license_plate: Option<String>,
    #[serde(default)]
    pub vin: Option<String>,
    #[serde(default)]
    pub insurance_policy: Option<String>,
}

impl NewVehicle {
    /// Minimal vehicle with only the required fields set
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        distance_unit: DistanceUnit,
        fuel_unit: FuelUnit,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            kind: kind.into(),
            image: None,
            distance_unit,
            fuel_unit,
            fuel_capacity: None,
            fuel_type: None,
            has_two_tanks: None,
            is_hybrid: None,
            make: None,
            model: None,
            year: None,
            license_plate: None,
            vin: None,
            insurance_policy: None,
        }
    }
}

/// Partial update of a vehicle's descriptive fields.
/// `None` leaves the stored value unchanged; the ID is never updatable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub image: Option<String>,
    pub distance_unit: Option<DistanceUnit>,
    pub fuel_unit: Option<FuelUnit>,
    pub fuel_capacity: Option<f64>,
    pub fuel_type: Option<String>,
    pub has_two_tanks: Option<bool>,
    pub is_hybrid: Option<bool>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub license_plate: Option<String>,
    pub vin: Option<String>,
    pub insurance_policy: Option<String>,
}

impl Vehicle {
    pub fn from_new(new: NewVehicle, id: VehicleId, created_at: i64) -> Self {
        Self {
            id,
            name: new.name,
            description: new.description,
            kind: new.kind,
            image: new.image,
            distance_unit: new.distance_unit,
            fuel_unit: new.fuel_unit,
            fuel_capacity: new.fuel_capacity,
            fuel_type: new.fuel_type,
            has_two_tanks: new.has_two_tanks,
            is_hybrid: new.is_hybrid,
            make: new.make,
            model: new.model,
            year: new.year,
            license_plate: new.license_plate,
            vin: new.vin,
            insurance_policy: new.insurance_policy,
            created_at,
        }
    }

    /// Merge a partial update into this record
    pub fn apply(&mut self, update: VehicleUpdate) {
        if let Some(v) = update.name {
            self.name = v;
        }
        if let Some(v) = update.kind {
            self.kind = v;
        }
        if let Some(v) = update.distance_unit {
            self.distance_unit = v;
        }
        if let Some(v) = update.fuel_unit {
            self.fuel_unit = v;
        }
        self.description = update.description.or(self.description.take());
        self.image = update.image.or(self.image.take());
        self.fuel_capacity = update.fuel_capacity.or(self.fuel_capacity);
        self.fuel_type = update.fuel_type.or(self.fuel_type.take());
        self.has_two_tanks = update.has_two_tanks.or(self.has_two_tanks);
        self.is_hybrid = update.is_hybrid.or(self.is_hybrid);
        self.make = update.make.or(self.make.take());
        self.model = update.model.or(self.model.take());
        self.year = update.year.or(self.year);
        self.license_plate = update.license_plate.or(self.license_plate.take());
        self.vin = update.vin.or(self.vin.take());
        self.insurance_policy = update.insurance_policy.or(self.insurance_policy.take());
    }
}

fn default_currency() -> String {
    "USD".to_string()
}

/// A single fill-up or trip-distance entry.
///
/// Numeric fields default to zero when absent so that partially-entered
/// records still load; the statistics code treats zero as "no data".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelLog {
    pub id: LogId,
    pub vehicle_id: VehicleId,
    /// Fill-up time, epoch millis
    #[serde(default)]
    pub date: i64,
    /// Absolute odometer reading (meaningful when `is_trip` is false)
    #[serde(default)]
    pub odometer: f64,
    /// Distance is a trip-segment reading rather than an odometer reading
    #[serde(default)]
    pub is_trip: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_distance: Option<f64>,
    #[serde(default)]
    pub fuel_amount: f64,
    #[serde(default)]
    pub fuel_type: String,
    #[serde(default)]
    pub price_per_unit: f64,
    /// Stored, not recomputed at read time
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_station: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default)]
    pub created_at: i64,
}

/// Fields supplied when recording a fuel log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFuelLog {
    pub vehicle_id: VehicleId,
    pub date: i64,
    #[serde(default)]
    pub odometer: f64,
    #[serde(default)]
    pub is_trip: bool,
    #[serde(default)]
    pub trip_distance: Option<f64>,
    pub fuel_amount: f64,
    #[serde(default)]
    pub fuel_type: String,
    pub price_per_unit: f64,
    /// Explicit total; derived from amount and price when absent
    #[serde(default)]
    pub total_cost: Option<f64>,
    /// Empty means the configured default currency
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub gas_station: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl NewFuelLog {
    /// Odometer-based fill-up with the remaining fields defaulted
    pub fn fill_up(
        vehicle_id: VehicleId,
        date: i64,
        odometer: f64,
        fuel_amount: f64,
        price_per_unit: f64,
    ) -> Self {
        Self {
            vehicle_id,
            date,
            odometer,
            is_trip: false,
            trip_distance: None,
            fuel_amount,
            fuel_type: String::new(),
            price_per_unit,
            total_cost: None,
            currency: String::new(),
            gas_station: None,
            notes: None,
            images: Vec::new(),
        }
    }

    /// Trip-distance entry with the remaining fields defaulted
    pub fn trip(
        vehicle_id: VehicleId,
        date: i64,
        trip_distance: f64,
        fuel_amount: f64,
        price_per_unit: f64,
    ) -> Self {
        Self {
            is_trip: true,
            trip_distance: Some(trip_distance),
            ..Self::fill_up(vehicle_id, date, 0.0, fuel_amount, price_per_unit)
        }
    }
}

/// Partial update of a fuel log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelLogUpdate {
    pub vehicle_id: Option<VehicleId>,
    pub date: Option<i64>,
    pub odometer: Option<f64>,
    pub is_trip: Option<bool>,
    pub trip_distance: Option<f64>,
    pub fuel_amount: Option<f64>,
    pub fuel_type: Option<String>,
    pub price_per_unit: Option<f64>,
    pub total_cost: Option<f64>,
    pub currency: Option<String>,
    pub gas_station: Option<String>,
    pub notes: Option<String>,
    pub images: Option<Vec<String>>,
}

impl FuelLogUpdate {
    /// Whether the update touches the amount or the unit price
    pub fn changes_cost_inputs(&self) -> bool {
        self.fuel_amount.is_some() || self.price_per_unit.is_some()
    }
}

/// `amount * price`, rounded to cents
pub fn derive_total_cost(fuel_amount: f64, price_per_unit: f64) -> f64 {
    (fuel_amount * price_per_unit * 100.0).round() / 100.0
}

impl FuelLog {
    pub fn from_new(new: NewFuelLog, id: LogId, created_at: i64) -> Self {
        let total_cost = new
            .total_cost
            .unwrap_or_else(|| derive_total_cost(new.fuel_amount, new.price_per_unit));

        Self {
            id,
            vehicle_id: new.vehicle_id,
            date: new.date,
            odometer: new.odometer,
            is_trip: new.is_trip,
            trip_distance: new.trip_distance,
            fuel_amount: new.fuel_amount,
            fuel_type: new.fuel_type,
            price_per_unit: new.price_per_unit,
            total_cost,
            currency: if new.currency.is_empty() {
                default_currency()
            } else {
                new.currency
            },
            gas_station: new.gas_station,
            notes: new.notes,
            images: new.images,
            created_at,
        }
    }

    /// Merge a partial update into this record. `total_cost` is copied
    /// verbatim when present; reconciling it is the caller's concern.
    pub fn apply(&mut self, update: FuelLogUpdate) {
        if let Some(v) = update.vehicle_id {
            self.vehicle_id = v;
        }
        if let Some(v) = update.date {
            self.date = v;
        }
        if let Some(v) = update.odometer {
            self.odometer = v;
        }
        if let Some(v) = update.is_trip {
            self.is_trip = v;
        }
        if let Some(v) = update.fuel_amount {
            self.fuel_amount = v;
        }
        if let Some(v) = update.fuel_type {
            self.fuel_type = v;
        }
        if let Some(v) = update.price_per_unit {
            self.price_per_unit = v;
        }
        if let Some(v) = update.total_cost {
            self.total_cost = v;
        }
        if let Some(v) = update.currency {
            self.currency = v;
        }
        if let Some(v) = update.images {
            self.images = v;
        }
        self.trip_distance = if update.is_trip == Some(false) {
            None
        } else {
            update.trip_distance.or(self.trip_distance)
        };
        self.gas_station = update.gas_station.or(self.gas_station.take());
        self.notes = update.notes.or(self.notes.take());
    }

    /// Odometer-based entry (as opposed to a trip-distance entry)
    pub fn is_odometer_based(&self) -> bool {
        !self.is_trip
    }
}
