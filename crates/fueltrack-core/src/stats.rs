//! Per-vehicle and cross-vehicle statistics
//!
//! The aggregators are pure: they take plain records, never touch storage,
//! and return the same output for the same input.

use chrono::{Local, TimeZone};
use fueltrack_api::{
    AllVehiclesStats, EfficiencyPoint, FuelLog, MonthlyExpense, Vehicle, VehicleStats,
};
use fueltrack_util::{VehicleId, YearMonth};
use std::collections::{BTreeMap, BTreeSet};

use crate::{compute_efficiency, fuel_type_totals, odometer_distance};

/// Logs ordered by date; ties keep their input order
pub(crate) fn sorted_by_date<'a>(logs: impl IntoIterator<Item = &'a FuelLog>) -> Vec<&'a FuelLog> {
    let mut sorted: Vec<&FuelLog> = logs.into_iter().collect();
    sorted.sort_by_key(|log| log.date);
    sorted
}

/// Walk adjacent pairs of date-sorted logs.
///
/// Returns the distance covered by odometer steps and the efficiency of each
/// step that also has a positive fuel amount.
pub(crate) fn walk_steps(sorted: &[&FuelLog]) -> (f64, Vec<EfficiencyPoint>) {
    let mut total_distance = 0.0;
    let mut series = Vec::new();

    for pair in sorted.windows(2) {
        let (previous, current) = (pair[0], pair[1]);
        let Some(distance) = odometer_distance(current, previous) else {
            continue;
        };
        total_distance += distance;

        if let Some(efficiency) = compute_efficiency(current, Some(previous)).km_per_liter {
            series.push(EfficiencyPoint {
                date: current.date,
                efficiency,
                unit: None,
            });
        }
    }

    (total_distance, series)
}

/// Total spend per calendar month in `tz`, in chronological order
pub fn monthly_expenses_in<'a, Tz: TimeZone>(
    logs: impl IntoIterator<Item = &'a FuelLog>,
    tz: &Tz,
) -> Vec<MonthlyExpense> {
    let mut buckets: BTreeMap<YearMonth, f64> = BTreeMap::new();
    for log in logs {
        if let Some(month) = YearMonth::from_millis_in(log.date, tz) {
            *buckets.entry(month).or_insert(0.0) += log.total_cost;
        }
    }

    buckets
        .into_iter()
        .map(|(month, cost)| MonthlyExpense::new(month, cost))
        .collect()
}

fn aggregate_sorted<Tz: TimeZone>(sorted: &[&FuelLog], tz: &Tz) -> VehicleStats {
    let total_fuel: f64 = sorted.iter().map(|log| log.fuel_amount).sum();
    let total_cost: f64 = sorted.iter().map(|log| log.total_cost).sum();
    let (total_distance, efficiency_series) = walk_steps(sorted);

    let avg_efficiency = if efficiency_series.is_empty() {
        None
    } else {
        let sum: f64 = efficiency_series.iter().map(|p| p.efficiency).sum();
        Some(sum / efficiency_series.len() as f64)
    };
    let last_efficiency = efficiency_series.last().map(|p| p.efficiency);

    VehicleStats {
        total_logs: sorted.len(),
        total_fuel,
        total_cost,
        total_distance,
        avg_efficiency,
        last_efficiency,
        last_fuel_price: sorted.last().map(|log| log.price_per_unit),
        avg_fuel_price: (total_fuel > 0.0).then(|| total_cost / total_fuel),
        efficiency_series,
        monthly_expenses: monthly_expenses_in(sorted.iter().copied(), tz),
    }
}

/// Statistics for one vehicle's logs, bucketing months in local time
pub fn aggregate_vehicle_stats(logs: &[FuelLog]) -> VehicleStats {
    aggregate_vehicle_stats_in(logs, &Local)
}

/// Statistics for one vehicle's logs, bucketing months in `tz`
pub fn aggregate_vehicle_stats_in<Tz: TimeZone>(logs: &[FuelLog], tz: &Tz) -> VehicleStats {
    aggregate_sorted(&sorted_by_date(logs), tz)
}

/// Statistics across every registered vehicle, bucketing months in local time
pub fn aggregate_all_vehicles_stats(logs: &[FuelLog], vehicles: &[Vehicle]) -> AllVehiclesStats {
    aggregate_all_vehicles_stats_in(logs, vehicles, &Local)
}

/// Statistics across every registered vehicle, bucketing months in `tz`.
///
/// Fuel, cost and distance totals are summed per registered vehicle, so logs
/// of unknown vehicles only show up in the counts, the fuel type totals and
/// the monthly series. Every registered vehicle has a count, zero included.
pub fn aggregate_all_vehicles_stats_in<Tz: TimeZone>(
    logs: &[FuelLog],
    vehicles: &[Vehicle],
    tz: &Tz,
) -> AllVehiclesStats {
    let mut stats = AllVehiclesStats::default();
    let mut known: BTreeSet<&VehicleId> = BTreeSet::new();

    for vehicle in vehicles {
        if !known.insert(&vehicle.id) {
            continue;
        }

        stats.vehicle_counts.insert(vehicle.id.clone(), 0);
        let vehicle_logs = sorted_by_date(logs.iter().filter(|log| log.vehicle_id == vehicle.id));
        let vehicle_stats = aggregate_sorted(&vehicle_logs, tz);
        stats.total_fuel += vehicle_stats.total_fuel;
        stats.total_cost += vehicle_stats.total_cost;
        stats.total_distance += vehicle_stats.total_distance;
    }

    for log in logs {
        *stats.vehicle_counts.entry(log.vehicle_id.clone()).or_insert(0) += 1;
        if !known.contains(&log.vehicle_id) {
            stats.unassigned_logs += 1;
        }
    }

    let sorted = sorted_by_date(logs);
    stats.total_logs = sorted.len();
    stats.avg_fuel_price = (stats.total_fuel > 0.0).then(|| stats.total_cost / stats.total_fuel);
    stats.last_fuel_price = sorted.last().map(|log| log.price_per_unit);
    stats.fuel_type_totals = fuel_type_totals(logs);
    stats.monthly_expenses = monthly_expenses_in(sorted.iter().copied(), tz);

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fueltrack_api::{DistanceUnit, FuelUnit, NewFuelLog, NewVehicle};
    use fueltrack_util::LogId;

    fn millis(y: i32, m: u32, d: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap().timestamp_millis()
    }

    fn log(vehicle: &str, date: i64, odometer: f64, fuel: f64, price: f64) -> FuelLog {
        FuelLog::from_new(
            NewFuelLog::fill_up(VehicleId::new(vehicle), date, odometer, fuel, price),
            LogId::generate(),
            date,
        )
    }

    fn vehicle(id: &str) -> Vehicle {
        Vehicle::from_new(
            NewVehicle::new(id, "car", DistanceUnit::Km, FuelUnit::Liter),
            VehicleId::new(id),
            0,
        )
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_input() {
        let stats = aggregate_vehicle_stats_in(&[], &Utc);
        assert_eq!(stats.total_logs, 0);
        assert_eq!(stats.total_fuel, 0.0);
        assert_eq!(stats.total_cost, 0.0);
        assert_eq!(stats.total_distance, 0.0);
        assert!(stats.avg_efficiency.is_none());
        assert!(stats.last_efficiency.is_none());
        assert!(stats.avg_fuel_price.is_none());
        assert!(stats.last_fuel_price.is_none());
        assert!(stats.monthly_expenses.is_empty());

        let all = aggregate_all_vehicles_stats_in(&[], &[], &Utc);
        assert_eq!(all, AllVehiclesStats::default());
    }

    #[test]
    fn test_single_vehicle_totals() {
        let logs = vec![
            log("v", millis(2025, 1, 20), 150.0, 5.0, 2.0),
            log("v", millis(2025, 1, 10), 100.0, 4.0, 2.0),
            log("v", millis(2025, 2, 5), 250.0, 10.0, 3.0),
        ];

        let stats = aggregate_vehicle_stats_in(&logs, &Utc);
        assert_eq!(stats.total_logs, 3);
        assert!(approx(stats.total_fuel, 19.0));
        assert!(approx(stats.total_cost, 8.0 + 10.0 + 30.0));
        assert!(approx(stats.total_distance, 150.0));
        // Steps: 50 / 5 = 10, 100 / 10 = 10
        assert_eq!(stats.efficiency_series.len(), 2);
        assert!(approx(stats.avg_efficiency.unwrap(), 10.0));
        assert!(approx(stats.last_efficiency.unwrap(), 10.0));
        assert_eq!(stats.last_fuel_price, Some(3.0));
        assert!(approx(stats.avg_fuel_price.unwrap(), 48.0 / 19.0));
    }

    #[test]
    fn test_monthly_buckets_are_chronological() {
        let logs = vec![
            log("v", millis(2025, 3, 2), 300.0, 5.0, 2.0),
            log("v", millis(2025, 2, 14), 200.0, 5.0, 1.0),
            log("v", millis(2025, 3, 20), 400.0, 5.0, 3.0),
        ];

        let stats = aggregate_vehicle_stats_in(&logs, &Utc);
        let months: Vec<_> = stats.monthly_expenses.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(months, vec!["Feb 2025", "Mar 2025"]);
        assert!(approx(stats.monthly_expenses[0].cost, 5.0));
        assert!(approx(stats.monthly_expenses[1].cost, 10.0 + 15.0));
    }

    #[test]
    fn test_year_boundary_ordering() {
        let logs = vec![
            log("v", millis(2025, 1, 5), 200.0, 5.0, 1.0),
            log("v", millis(2024, 12, 5), 100.0, 5.0, 1.0),
        ];

        let stats = aggregate_vehicle_stats_in(&logs, &Utc);
        let months: Vec<_> = stats.monthly_expenses.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(months, vec!["Dec 2024", "Jan 2025"]);
    }

    #[test]
    fn test_trip_entries_break_steps() {
        let trip = FuelLog::from_new(
            NewFuelLog::trip(VehicleId::new("v"), millis(2025, 1, 15), 80.0, 4.0, 2.0),
            LogId::generate(),
            0,
        );
        let logs = vec![
            log("v", millis(2025, 1, 10), 100.0, 4.0, 2.0),
            trip,
            log("v", millis(2025, 1, 20), 200.0, 5.0, 2.0),
        ];

        let stats = aggregate_vehicle_stats_in(&logs, &Utc);
        assert_eq!(stats.total_distance, 0.0);
        assert!(stats.avg_efficiency.is_none());
        assert!(approx(stats.total_fuel, 13.0));
    }

    #[test]
    fn test_zero_fuel_step_counts_distance_only() {
        let logs = vec![
            log("v", millis(2025, 1, 10), 100.0, 4.0, 2.0),
            log("v", millis(2025, 1, 20), 160.0, 0.0, 2.0),
        ];

        let stats = aggregate_vehicle_stats_in(&logs, &Utc);
        assert!(approx(stats.total_distance, 60.0));
        assert!(stats.efficiency_series.is_empty());
    }

    #[test]
    fn test_cross_vehicle_totals_match_partitions() {
        let logs = vec![
            log("a", millis(2025, 1, 1), 100.0, 4.0, 1.5),
            log("b", millis(2025, 1, 3), 5000.0, 30.0, 3.2),
            log("a", millis(2025, 1, 9), 180.0, 6.0, 1.6),
            log("b", millis(2025, 2, 2), 5300.0, 12.0, 3.4),
            log("a", millis(2025, 2, 11), 260.0, 5.5, 1.7),
        ];
        let vehicles = vec![vehicle("a"), vehicle("b")];

        let all = aggregate_all_vehicles_stats_in(&logs, &vehicles, &Utc);

        let part = |id: &str| -> Vec<FuelLog> {
            logs.iter().filter(|l| l.vehicle_id.as_str() == id).cloned().collect()
        };
        let a = aggregate_vehicle_stats_in(&part("a"), &Utc);
        let b = aggregate_vehicle_stats_in(&part("b"), &Utc);

        assert!(approx(all.total_fuel, a.total_fuel + b.total_fuel));
        assert!(approx(all.total_cost, a.total_cost + b.total_cost));
        assert!(approx(all.total_distance, a.total_distance + b.total_distance));
        assert_eq!(all.total_logs, 5);
        assert_eq!(all.vehicle_counts[&VehicleId::new("a")], 3);
        assert_eq!(all.vehicle_counts[&VehicleId::new("b")], 2);
        assert_eq!(all.last_fuel_price, Some(1.7));
        assert_eq!(all.monthly_expenses.len(), 2);
        assert_eq!(all.unassigned_logs, 0);
    }

    #[test]
    fn test_orphans_and_duplicate_vehicles() {
        let logs = vec![
            log("a", millis(2025, 1, 1), 100.0, 4.0, 1.0),
            log("ghost", millis(2025, 1, 2), 100.0, 7.0, 1.0),
        ];
        let vehicles = vec![vehicle("a"), vehicle("a")];

        let all = aggregate_all_vehicles_stats_in(&logs, &vehicles, &Utc);
        assert!(approx(all.total_fuel, 4.0));
        assert_eq!(all.unassigned_logs, 1);
        assert_eq!(all.vehicle_counts.len(), 2);
        // Monthly series covers the full list
        assert!(approx(all.monthly_expenses[0].cost, 11.0));
    }

    #[test]
    fn test_vehicle_without_logs_counts_zero() {
        let logs = vec![log("a", millis(2025, 3, 1), 100.0, 4.0, 1.0)];
        let vehicles = vec![vehicle("a"), vehicle("idle")];

        let all = aggregate_all_vehicles_stats_in(&logs, &vehicles, &Utc);
        assert_eq!(all.vehicle_counts.len(), 2);
        assert_eq!(all.vehicle_counts[&VehicleId::new("a")], 1);
        assert_eq!(all.vehicle_counts[&VehicleId::new("idle")], 0);

        let empty = aggregate_all_vehicles_stats_in(&[], &vehicles, &Utc);
        assert_eq!(empty.vehicle_counts[&VehicleId::new("idle")], 0);
        assert_eq!(empty.total_logs, 0);
    }

    #[test]
    fn test_aggregators_are_idempotent() {
        let logs = vec![
            log("a", millis(2025, 1, 9), 180.0, 6.0, 1.6),
            log("a", millis(2025, 1, 1), 100.0, 4.0, 1.5),
        ];
        let vehicles = vec![vehicle("a")];
        let before = logs.clone();

        assert_eq!(
            aggregate_vehicle_stats_in(&logs, &Utc),
            aggregate_vehicle_stats_in(&logs, &Utc)
        );
        assert_eq!(
            aggregate_all_vehicles_stats_in(&logs, &vehicles, &Utc),
            aggregate_all_vehicles_stats_in(&logs, &vehicles, &Utc)
        );
        assert_eq!(logs, before);
    }
}
