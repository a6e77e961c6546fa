//! Efficiency and statistics result structures

use fueltrack_util::{VehicleId, YearMonth};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::{DistanceUnit, FuelUnit, Vehicle};

/// Efficiency between two consecutive odometer fill-ups.
///
/// The same ratio is exposed under every interpretation; all fields are
/// `None` when there is not enough data. Which one is meaningful depends on
/// the vehicle's units (see [`EfficiencyUnit::for_vehicle`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelEfficiency {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mpg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub km_per_liter: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liters_per_100km: Option<f64>,
}

impl FuelEfficiency {
    pub fn is_empty(&self) -> bool {
        self.mpg.is_none() && self.km_per_liter.is_none() && self.liters_per_100km.is_none()
    }

    /// Value under a chosen interpretation
    pub fn value_in(&self, unit: EfficiencyUnit) -> Option<f64> {
        match unit {
            EfficiencyUnit::Mpg => self.mpg,
            EfficiencyUnit::KmPerLiter => self.km_per_liter,
            EfficiencyUnit::LitersPer100Km => self.liters_per_100km,
        }
    }
}

/// Interpretation of an efficiency ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EfficiencyUnit {
    Mpg,
    KmPerLiter,
    LitersPer100Km,
}

impl EfficiencyUnit {
    /// Natural unit for a vehicle's declared units; `None` for mixed units
    pub fn for_vehicle(vehicle: &Vehicle) -> Option<Self> {
        match (vehicle.distance_unit, vehicle.fuel_unit) {
            (DistanceUnit::Mi, FuelUnit::Gallon) => Some(Self::Mpg),
            (DistanceUnit::Km, FuelUnit::Liter) => Some(Self::KmPerLiter),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Mpg => "MPG",
            Self::KmPerLiter => "km/L",
            Self::LitersPer100Km => "L/100km",
        }
    }
}

impl fmt::Display for EfficiencyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Total spend for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyExpense {
    pub month: YearMonth,
    /// Display label (`Jan 2025`)
    pub label: String,
    pub cost: f64,
}

impl MonthlyExpense {
    pub fn new(month: YearMonth, cost: f64) -> Self {
        Self {
            month,
            label: month.label(),
            cost,
        }
    }
}

/// One element of the efficiency series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyPoint {
    /// Date of the later fill-up, epoch millis
    pub date: i64,
    pub efficiency: f64,
    /// Unit label, when the vehicle's units have a natural interpretation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<EfficiencyUnit>,
}

/// Price per unit at one fill-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: i64,
    pub price: f64,
}

/// Statistics derived from one vehicle's logs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleStats {
    pub total_logs: usize,
    pub total_fuel: f64,
    pub total_cost: f64,
    pub total_distance: f64,
    pub avg_efficiency: Option<f64>,
    pub last_efficiency: Option<f64>,
    pub last_fuel_price: Option<f64>,
    pub avg_fuel_price: Option<f64>,
    pub efficiency_series: Vec<EfficiencyPoint>,
    pub monthly_expenses: Vec<MonthlyExpense>,
}

/// Statistics combined across all vehicles.
///
/// There is deliberately no efficiency figure: vehicles may use different
/// units and their ratios cannot be combined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllVehiclesStats {
    pub total_logs: usize,
    pub total_fuel: f64,
    pub total_cost: f64,
    pub total_distance: f64,
    pub avg_fuel_price: Option<f64>,
    pub last_fuel_price: Option<f64>,
    pub monthly_expenses: Vec<MonthlyExpense>,
    /// Number of logs per vehicle id
    pub vehicle_counts: BTreeMap<VehicleId, usize>,
    /// Fuel amount per fuel-type tag
    pub fuel_type_totals: BTreeMap<String, f64>,
    /// Logs whose vehicle is not registered
    pub unassigned_logs: usize,
}
