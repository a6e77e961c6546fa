//! Text rendering for command output

use fueltrack_api::{
    AllVehiclesStats, EfficiencyPoint, EfficiencyUnit, FuelLog, PricePoint, Vehicle, VehicleStats,
};
use fueltrack_core::{UNKNOWN_VEHICLE_NAME, compute_efficiency, previous_fill_up};
use fueltrack_util::{VehicleId, format_date, format_short_date};

/// Width of the bar in text charts
const BAR_WIDTH: f64 = 40.0;

pub fn money(amount: f64, currency: &str) -> String {
    format!("{amount:.2} {currency}")
}

fn optional(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => "-".to_string(),
    }
}

fn vehicle_name<'a>(vehicles: &'a [Vehicle], id: &VehicleId) -> &'a str {
    vehicles
        .iter()
        .find(|v| &v.id == id)
        .map(|v| v.name.as_str())
        .unwrap_or(UNKNOWN_VEHICLE_NAME)
}

pub fn print_vehicles(vehicles: &[Vehicle]) {
    if vehicles.is_empty() {
        println!("No vehicles");
        return;
    }

    println!("{:<38} {:<20} {:<10} {:<6} {:<7}", "ID", "NAME", "TYPE", "DIST", "FUEL");
    for v in vehicles {
        println!(
            "{:<38} {:<20} {:<10} {:<6} {:<7}",
            v.id,
            v.name,
            v.kind,
            v.distance_unit.as_str(),
            v.fuel_unit.as_str()
        );
    }
}

/// Print `logs` with the efficiency of each fill-up, measured against the
/// vehicle's previous fill-up in `all_logs`
pub fn print_logs(logs: &[FuelLog], all_logs: &[FuelLog], vehicles: &[Vehicle]) {
    if logs.is_empty() {
        println!("No fuel logs");
        return;
    }

    println!(
        "{:<38} {:<10} {:<16} {:>10} {:>8} {:>8} {:>14} {:>9}",
        "ID", "DATE", "VEHICLE", "ODOMETER", "FUEL", "PRICE", "TOTAL", "EFF"
    );
    for log in logs {
        let vehicle = vehicles.iter().find(|v| v.id == log.vehicle_id);
        let efficiency = vehicle.and_then(EfficiencyUnit::for_vehicle).and_then(|unit| {
            compute_efficiency(log, previous_fill_up(all_logs, log)).value_in(unit)
        });
        let distance = if log.is_trip {
            format!("+{}", optional(log.trip_distance, 0))
        } else {
            format!("{:.0}", log.odometer)
        };

        println!(
            "{:<38} {:<10} {:<16} {:>10} {:>8.2} {:>8.3} {:>14} {:>9}",
            log.id,
            format_date(log.date),
            vehicle_name(vehicles, &log.vehicle_id),
            distance,
            log.fuel_amount,
            log.price_per_unit,
            money(log.total_cost, &log.currency),
            optional(efficiency, 1)
        );
    }
}

pub fn print_vehicle_stats(vehicle: &Vehicle, stats: &VehicleStats) {
    let unit = EfficiencyUnit::for_vehicle(vehicle)
        .map(|u| u.label())
        .unwrap_or("");

    println!("{} ({})", vehicle.name, vehicle.id);
    println!("  Fill-ups:        {}", stats.total_logs);
    println!(
        "  Fuel:            {:.2} {}",
        stats.total_fuel,
        vehicle.fuel_unit.as_str()
    );
    println!("  Spent:           {:.2}", stats.total_cost);
    println!(
        "  Distance:        {:.0} {}",
        stats.total_distance,
        vehicle.distance_unit.as_str()
    );
    println!("  Avg efficiency:  {} {unit}", optional(stats.avg_efficiency, 2));
    println!("  Last efficiency: {} {unit}", optional(stats.last_efficiency, 2));
    println!("  Avg price:       {}", optional(stats.avg_fuel_price, 3));
    println!("  Last price:      {}", optional(stats.last_fuel_price, 3));

    if !stats.monthly_expenses.is_empty() {
        println!();
        println!("  Monthly spending:");
        for m in &stats.monthly_expenses {
            println!("    {:<9} {:>10.2}", m.label, m.cost);
        }
    }
}

pub fn print_all_stats(stats: &AllVehiclesStats, vehicles: &[Vehicle]) {
    println!("All vehicles");
    println!("  Fill-ups:   {}", stats.total_logs);
    println!("  Fuel:       {:.2}", stats.total_fuel);
    println!("  Spent:      {:.2}", stats.total_cost);
    println!("  Distance:   {:.0}", stats.total_distance);
    println!("  Avg price:  {}", optional(stats.avg_fuel_price, 3));
    println!("  Last price: {}", optional(stats.last_fuel_price, 3));
    if stats.unassigned_logs > 0 {
        println!("  Logs without a vehicle: {}", stats.unassigned_logs);
    }

    if !stats.vehicle_counts.is_empty() {
        println!();
        println!("  Logs per vehicle:");
        for (id, count) in &stats.vehicle_counts {
            println!("    {:<20} {:>5}", vehicle_name(vehicles, id), count);
        }
    }

    if !stats.fuel_type_totals.is_empty() {
        println!();
        println!("  Fuel by type:");
        for (fuel_type, amount) in &stats.fuel_type_totals {
            println!("    {:<20} {:>10.2}", fuel_type, amount);
        }
    }

    if !stats.monthly_expenses.is_empty() {
        println!();
        println!("  Monthly spending:");
        for m in &stats.monthly_expenses {
            println!("    {:<9} {:>10.2}", m.label, m.cost);
        }
    }
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH).round().max(0.0) as usize;
    "#".repeat(len)
}

pub fn print_efficiency_chart(points: &[EfficiencyPoint]) {
    if points.is_empty() {
        println!("Not enough fill-ups to chart efficiency");
        return;
    }

    let max = points.iter().map(|p| p.efficiency).fold(0.0, f64::max);
    for p in points {
        let unit = p.unit.map(|u| u.label()).unwrap_or("");
        println!(
            "{:<7} {:>7.2} {:<8} {}",
            format_short_date(p.date),
            p.efficiency,
            unit,
            bar(p.efficiency, max)
        );
    }
}

pub fn print_price_chart(points: &[PricePoint]) {
    if points.is_empty() {
        println!("No fuel logs");
        return;
    }

    let max = points.iter().map(|p| p.price).fold(0.0, f64::max);
    for p in points {
        println!(
            "{:<7} {:>7.3} {}",
            format_short_date(p.date),
            p.price,
            bar(p.price, max)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money() {
        assert_eq!(money(45.5, "USD"), "45.50 USD");
        assert_eq!(money(0.004, "EUR"), "0.00 EUR");
    }

    #[test]
    fn test_optional() {
        assert_eq!(optional(Some(12.346), 2), "12.35");
        assert_eq!(optional(None, 2), "-");
    }

    #[test]
    fn test_bar() {
        assert_eq!(bar(10.0, 10.0).len(), 40);
        assert_eq!(bar(5.0, 10.0).len(), 20);
        assert!(bar(1.0, 0.0).is_empty());
    }
}
