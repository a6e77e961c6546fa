//! Log list filtering and ordering

use fueltrack_api::{FuelLog, Vehicle};
use fueltrack_util::{VehicleId, format_date};

/// Date ordering of a log listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// Filter applied to a log listing
#[derive(Debug, Clone, Default)]
pub struct LogQuery {
    /// Only logs of this vehicle
    pub vehicle: Option<VehicleId>,
    /// Case-insensitive text matched against vehicle name, date, fuel type,
    /// gas station and notes
    pub search: Option<String>,
    pub order: SortOrder,
}

impl LogQuery {
    pub fn for_vehicle(vehicle: VehicleId) -> Self {
        Self {
            vehicle: Some(vehicle),
            ..Default::default()
        }
    }

    fn matches(&self, log: &FuelLog, vehicles: &[Vehicle]) -> bool {
        if let Some(vehicle) = &self.vehicle
            && &log.vehicle_id != vehicle
        {
            return false;
        }

        let Some(needle) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
            return true;
        };
        let needle = needle.to_lowercase();

        let vehicle_name = vehicles
            .iter()
            .find(|v| v.id == log.vehicle_id)
            .map(|v| v.name.to_lowercase());

        vehicle_name.is_some_and(|name| name.contains(&needle))
            || format_date(log.date).contains(&needle)
            || log.fuel_type.to_lowercase().contains(&needle)
            || log
                .gas_station
                .as_deref()
                .is_some_and(|s| s.to_lowercase().contains(&needle))
            || log
                .notes
                .as_deref()
                .is_some_and(|s| s.to_lowercase().contains(&needle))
    }
}

/// Apply `query` to `logs`, returning matching logs in the requested order
pub fn filter_logs(logs: &[FuelLog], vehicles: &[Vehicle], query: &LogQuery) -> Vec<FuelLog> {
    let mut filtered: Vec<FuelLog> = logs
        .iter()
        .filter(|log| query.matches(log, vehicles))
        .cloned()
        .collect();

    match query.order {
        SortOrder::Ascending => filtered.sort_by_key(|log| log.date),
        SortOrder::Descending => filtered.sort_by_key(|log| std::cmp::Reverse(log.date)),
    }
    filtered
}
