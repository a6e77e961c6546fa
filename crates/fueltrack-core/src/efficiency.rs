//! Efficiency between consecutive fill-ups

use fueltrack_api::{FuelEfficiency, FuelLog};

/// Distance covered between two odometer fill-ups, when there is one.
///
/// `None` if either log is a trip entry or the odometer did not increase.
pub fn odometer_distance(current: &FuelLog, previous: &FuelLog) -> Option<f64> {
    if !(current.is_odometer_based() && previous.is_odometer_based()) {
        return None;
    }

    let distance = current.odometer - previous.odometer;
    (distance.is_finite() && distance > 0.0).then_some(distance)
}

/// Efficiency of `current` relative to the fill-up before it.
///
/// Returns an empty result when there is no previous log, when either log is
/// a trip entry, when the odometer did not increase, or when the fuel amount
/// is not positive. Units are not checked; the same ratio is exposed under
/// every interpretation.
pub fn compute_efficiency(current: &FuelLog, previous: Option<&FuelLog>) -> FuelEfficiency {
    let Some(previous) = previous else {
        return FuelEfficiency::default();
    };
    let Some(distance) = odometer_distance(current, previous) else {
        return FuelEfficiency::default();
    };
    if !(current.fuel_amount.is_finite() && current.fuel_amount > 0.0) {
        return FuelEfficiency::default();
    }

    let efficiency = distance / current.fuel_amount;
    FuelEfficiency {
        mpg: Some(efficiency),
        km_per_liter: Some(efficiency),
        liters_per_100km: Some(100.0 / efficiency),
    }
}

/// The most recent odometer fill-up of the same vehicle strictly before
/// `log`, as used for the per-entry efficiency shown in log listings.
pub fn previous_fill_up<'a>(logs: &'a [FuelLog], log: &FuelLog) -> Option<&'a FuelLog> {
    logs.iter()
        .filter(|l| l.vehicle_id == log.vehicle_id && l.is_odometer_based() && l.date < log.date)
        .max_by_key(|l| l.date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fueltrack_api::{EfficiencyUnit, NewFuelLog};
    use fueltrack_util::{LogId, VehicleId};

    fn fill_up(id: &str, date: i64, odometer: f64, fuel: f64) -> FuelLog {
        FuelLog::from_new(
            NewFuelLog::fill_up(VehicleId::new("vehicle_a"), date, odometer, fuel, 1.5),
            LogId::new(id),
            date,
        )
    }

    fn trip(id: &str, date: i64, distance: f64, fuel: f64) -> FuelLog {
        FuelLog::from_new(
            NewFuelLog::trip(VehicleId::new("vehicle_a"), date, distance, fuel, 1.5),
            LogId::new(id),
            date,
        )
    }

    #[test]
    fn test_simple_pair() {
        let prev = fill_up("a", 1, 100.0, 4.0);
        let cur = fill_up("b", 2, 150.0, 5.0);

        let eff = compute_efficiency(&cur, Some(&prev));
        assert_eq!(eff.mpg, Some(10.0));
        assert_eq!(eff.km_per_liter, Some(10.0));
        assert_eq!(eff.liters_per_100km, Some(10.0));
        assert_eq!(eff.value_in(EfficiencyUnit::LitersPer100Km), Some(10.0));
    }

    #[test]
    fn test_no_previous() {
        let cur = fill_up("b", 2, 150.0, 5.0);
        assert!(compute_efficiency(&cur, None).is_empty());
    }

    #[test]
    fn test_decreasing_odometer() {
        let prev = fill_up("a", 1, 200.0, 4.0);
        for fuel in [0.0, 5.0, 50.0] {
            let cur = fill_up("b", 2, 150.0, fuel);
            assert!(compute_efficiency(&cur, Some(&prev)).is_empty());
        }

        let same = fill_up("c", 3, 200.0, 5.0);
        assert!(compute_efficiency(&same, Some(&prev)).is_empty());
    }

    #[test]
    fn test_trip_on_either_side() {
        let odo = fill_up("a", 1, 100.0, 4.0);
        let later_odo = fill_up("b", 2, 150.0, 5.0);
        let t = trip("t", 2, 50.0, 5.0);

        assert!(compute_efficiency(&t, Some(&odo)).is_empty());
        assert!(compute_efficiency(&later_odo, Some(&t)).is_empty());
        assert!(compute_efficiency(&t, Some(&t)).is_empty());
    }

    #[test]
    fn test_zero_fuel_is_insufficient() {
        let prev = fill_up("a", 1, 100.0, 4.0);
        let cur = fill_up("b", 2, 150.0, 0.0);
        assert!(compute_efficiency(&cur, Some(&prev)).is_empty());
        assert_eq!(odometer_distance(&cur, &prev), Some(50.0));
    }

    #[test]
    fn test_non_finite_input() {
        let prev = fill_up("a", 1, 100.0, 4.0);
        let cur = fill_up("b", 2, f64::NAN, 5.0);
        assert!(compute_efficiency(&cur, Some(&prev)).is_empty());
    }

    #[test]
    fn test_previous_fill_up_skips_trips_and_later_logs() {
        let logs = vec![
            fill_up("a", 10, 100.0, 4.0),
            fill_up("b", 30, 180.0, 4.0),
            trip("t", 25, 40.0, 2.0),
            fill_up("c", 20, 140.0, 4.0),
        ];

        let prev = previous_fill_up(&logs, &logs[1]).unwrap();
        assert_eq!(prev.id.as_str(), "c");
        assert!(previous_fill_up(&logs, &logs[0]).is_none());
    }
}
