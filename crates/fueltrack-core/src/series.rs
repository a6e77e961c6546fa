//! Chart series for the statistics screen

use fueltrack_api::{EfficiencyPoint, EfficiencyUnit, FuelLog, PricePoint, Vehicle};
use std::collections::BTreeMap;

use crate::stats::{sorted_by_date, walk_steps};

/// Per-step efficiency of one vehicle, labelled with its natural unit.
///
/// Logs of other vehicles are ignored. Vehicles with mixed units get points
/// without a unit.
pub fn efficiency_chart(logs: &[FuelLog], vehicle: &Vehicle) -> Vec<EfficiencyPoint> {
    let sorted = sorted_by_date(logs.iter().filter(|log| log.vehicle_id == vehicle.id));
    let unit = EfficiencyUnit::for_vehicle(vehicle);

    let (_, mut series) = walk_steps(&sorted);
    for point in &mut series {
        point.unit = unit;
    }
    series
}

/// Price per unit at each fill-up, oldest first
pub fn price_series(logs: &[FuelLog]) -> Vec<PricePoint> {
    sorted_by_date(logs)
        .into_iter()
        .map(|log| PricePoint {
            date: log.date,
            price: log.price_per_unit,
        })
        .collect()
}

/// Fuel amount per fuel type tag
pub fn fuel_type_totals(logs: &[FuelLog]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for log in logs {
        *totals.entry(log.fuel_type.clone()).or_insert(0.0) += log.fuel_amount;
    }
    totals
}
