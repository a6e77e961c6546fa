//! Sample data for demos and first runs

use chrono::{DateTime, Datelike, NaiveDate, TimeZone};
use fueltrack_api::{DistanceUnit, FuelLog, FuelUnit, NewFuelLog, NewVehicle, Vehicle};
use fueltrack_util::{Result, YearMonth};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::FuelTracker;

/// Months of history generated per vehicle, including the current one
const SAMPLE_MONTHS: i32 = 13;

/// How fuel use is modelled for a sample vehicle
#[derive(Debug, Clone, Copy)]
enum Consumption {
    /// Liters per 100 km, centre and spread
    PerHundred(f64, f64),
    /// Distance per unit of fuel, centre and spread
    PerUnit(f64, f64),
}

struct Profile {
    name: &'static str,
    description: &'static str,
    kind: &'static str,
    distance_unit: DistanceUnit,
    fuel_unit: FuelUnit,
    fuel_capacity: f64,
    fuel_type: &'static str,
    has_two_tanks: bool,
    is_hybrid: bool,
    make: &'static str,
    model: &'static str,
    year: i32,
    license_plate: &'static str,
    image: &'static str,

    start_odometer: f64,
    max_logs_per_month: u32,
    /// Minimum distance between fill-ups and the random span above it
    distance: (u32, u32),
    consumption: Consumption,
    base_price: f64,
    price_spread: f64,
    log_fuel_types: &'static [&'static str],
    stations: &'static [&'static str],
    note: &'static str,
}

const PROFILES: [Profile; 4] = [
    Profile {
        name: "Toyota Corolla",
        description: "My daily commuter car",
        kind: "car",
        distance_unit: DistanceUnit::Km,
        fuel_unit: FuelUnit::Liter,
        fuel_capacity: 50.0,
        fuel_type: "gasoline",
        has_two_tanks: false,
        is_hybrid: false,
        make: "Toyota",
        model: "Corolla",
        year: 2019,
        license_plate: "ABC-1234",
        image: "https://images.unsplash.com/photo-1623869675781-80aa31012a5a?q=80&w=2070&auto=format&fit=crop",
        start_odometer: 15000.0,
        max_logs_per_month: 3,
        distance: (200, 400),
        consumption: Consumption::PerHundred(7.0, 1.0),
        base_price: 1.5,
        price_spread: 0.2,
        log_fuel_types: &["Regular", "Premium", "Super"],
        stations: &["Shell", "BP", "Esso", "Texaco"],
        note: "Regular fill-up",
    },
    Profile {
        name: "Honda Civic",
        description: "Family car for weekend trips",
        kind: "car",
        distance_unit: DistanceUnit::Mi,
        fuel_unit: FuelUnit::Gallon,
        fuel_capacity: 12.4,
        fuel_type: "gasoline",
        has_two_tanks: false,
        is_hybrid: false,
        make: "Honda",
        model: "Civic",
        year: 2020,
        license_plate: "XYZ-5678",
        image: "https://images.unsplash.com/photo-1533473359331-0135ef1b58bf?q=80&w=2070&auto=format&fit=crop",
        start_odometer: 10000.0,
        max_logs_per_month: 2,
        distance: (150, 250),
        consumption: Consumption::PerUnit(30.0, 3.0),
        base_price: 3.5,
        price_spread: 0.4,
        log_fuel_types: &["Regular"],
        stations: &["Chevron", "Mobil", "7-Eleven", "Costco"],
        note: "Monthly fill-up",
    },
    Profile {
        name: "Ford F-150",
        description: "Work truck for hauling",
        kind: "truck",
        distance_unit: DistanceUnit::Mi,
        fuel_unit: FuelUnit::Gallon,
        fuel_capacity: 26.0,
        fuel_type: "diesel",
        has_two_tanks: true,
        is_hybrid: false,
        make: "Ford",
        model: "F-150",
        year: 2018,
        license_plate: "TRK-9012",
        image: "https://images.unsplash.com/photo-1605893477799-b99e3b8b93fe?q=80&w=2070&auto=format&fit=crop",
        start_odometer: 25000.0,
        max_logs_per_month: 3,
        distance: (100, 300),
        consumption: Consumption::PerUnit(18.0, 2.0),
        base_price: 3.8,
        price_spread: 0.4,
        log_fuel_types: &["Diesel"],
        stations: &["Chevron", "Shell", "Pilot", "Flying J"],
        note: "Work trip fill-up",
    },
    Profile {
        name: "Toyota Prius",
        description: "Eco-friendly hybrid",
        kind: "car",
        distance_unit: DistanceUnit::Km,
        fuel_unit: FuelUnit::Liter,
        fuel_capacity: 43.0,
        fuel_type: "gasoline",
        has_two_tanks: false,
        is_hybrid: true,
        make: "Toyota",
        model: "Prius",
        year: 2021,
        license_plate: "ECO-4567",
        image: "https://images.unsplash.com/photo-1619767886558-efdc259cde1a?q=80&w=2071&auto=format&fit=crop",
        start_odometer: 5000.0,
        max_logs_per_month: 2,
        distance: (300, 500),
        consumption: Consumption::PerHundred(4.5, 0.5),
        base_price: 1.5,
        price_spread: 0.2,
        log_fuel_types: &["Regular", "Premium"],
        stations: &["Shell", "BP", "Esso", "Texaco"],
        note: "Eco mode fill-up",
    },
];

impl Profile {
    fn new_vehicle(&self) -> NewVehicle {
        let mut vehicle = NewVehicle::new(self.name, self.kind, self.distance_unit, self.fuel_unit);
        vehicle.description = Some(self.description.to_string());
        vehicle.image = Some(self.image.to_string());
        vehicle.fuel_capacity = Some(self.fuel_capacity);
        vehicle.fuel_type = Some(self.fuel_type.to_string());
        vehicle.has_two_tanks = Some(self.has_two_tanks);
        vehicle.is_hybrid = Some(self.is_hybrid);
        vehicle.make = Some(self.make.to_string());
        vehicle.model = Some(self.model.to_string());
        vehicle.year = Some(self.year);
        vehicle.license_plate = Some(self.license_plate.to_string());
        vehicle
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn pick<'a>(rng: &mut StdRng, options: &[&'a str]) -> &'a str {
    options[rng.gen_range(0..options.len())]
}

/// Fill-up timestamps for one month, oldest first.
///
/// Days follow `now`'s day of month plus a random offset, capped at the
/// 28th so every month has them.
fn fill_up_dates<Tz: TimeZone>(
    rng: &mut StdRng,
    now: &DateTime<Tz>,
    month: YearMonth,
    count: u32,
) -> Vec<i64> {
    let mut days: Vec<u32> = (0..count)
        .map(|_| (now.day() + rng.gen_range(0..30)).min(28))
        .collect();
    days.sort_unstable();

    days.into_iter()
        .filter_map(|day| {
            let naive = NaiveDate::from_ymd_opt(month.year(), month.month(), day)?
                .and_time(now.time());
            let local = now.timezone().from_local_datetime(&naive).earliest()?;
            Some(local.timestamp_millis())
        })
        .collect()
}

/// Records created by [`generate_sample_data`]
#[derive(Debug, Clone)]
pub struct SampleData {
    pub vehicles: Vec<Vehicle>,
    pub logs: Vec<FuelLog>,
    /// `false` when existing records were kept instead
    pub generated: bool,
}

/// Populate the tracker with four sample vehicles and a year of fill-ups.
///
/// Existing data is left alone when both collections are non-empty;
/// otherwise everything is cleared first. The same `seed` and `now` always
/// produce the same records, apart from generated ids.
pub fn generate_sample_data<Tz: TimeZone>(
    tracker: &FuelTracker,
    seed: u64,
    now: &DateTime<Tz>,
) -> Result<SampleData> {
    let existing_vehicles = tracker.vehicles()?;
    let existing_logs = tracker.logs()?;
    if !existing_vehicles.is_empty() && !existing_logs.is_empty() {
        info!(
            vehicles = existing_vehicles.len(),
            logs = existing_logs.len(),
            "Records present, sample data skipped"
        );
        return Ok(SampleData {
            vehicles: existing_vehicles,
            logs: existing_logs,
            generated: false,
        });
    }

    tracker.clear_all()?;

    let mut rng = StdRng::seed_from_u64(seed);
    let current_month = YearMonth::from_datetime(now);
    let mut vehicles = Vec::with_capacity(PROFILES.len());
    let mut logs = Vec::new();

    for profile in &PROFILES {
        let vehicle = tracker.add_vehicle(profile.new_vehicle())?;
        let mut odometer = profile.start_odometer;

        for months_back in (0..SAMPLE_MONTHS).rev() {
            let month = YearMonth::from_key(current_month.key() - months_back);
            let count = rng.gen_range(1..=profile.max_logs_per_month);

            for (index, date) in fill_up_dates(&mut rng, now, month, count).into_iter().enumerate() {
                let (min, span) = profile.distance;
                let distance = f64::from(min + rng.gen_range(0..span));
                odometer += distance;

                let fuel_amount = match profile.consumption {
                    Consumption::PerHundred(centre, spread) => {
                        let per_hundred = centre + rng.gen_range(-spread..spread);
                        round_to(distance * per_hundred / 100.0, 2)
                    }
                    Consumption::PerUnit(centre, spread) => {
                        let per_unit = centre + rng.gen_range(-spread..spread);
                        round_to(distance / per_unit, 2)
                    }
                };
                let price = round_to(
                    profile.base_price + rng.gen_range(-profile.price_spread..profile.price_spread),
                    3,
                );

                let mut new = NewFuelLog::fill_up(vehicle.id.clone(), date, odometer, fuel_amount, price);
                new.fuel_type = pick(&mut rng, profile.log_fuel_types).to_string();
                new.gas_station = Some(pick(&mut rng, profile.stations).to_string());
                new.notes = (index == 0).then(|| profile.note.to_string());
                new.currency = "USD".to_string();

                logs.push(tracker.add_log(new)?);
            }
        }

        vehicles.push(vehicle);
    }

    info!(
        seed,
        vehicles = vehicles.len(),
        logs = logs.len(),
        "Sample data generated"
    );

    Ok(SampleData {
        vehicles,
        logs,
        generated: true,
    })
}
