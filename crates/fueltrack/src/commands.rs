//! Command handlers

use anyhow::{Context, Result, anyhow, bail};
use chrono::{Local, NaiveDate, NaiveTime, TimeZone};
use fueltrack_api::{FuelLogUpdate, NewFuelLog, NewVehicle, VehicleUpdate};
use fueltrack_core::{FuelTracker, LogQuery, SortOrder, generate_sample_data};
use fueltrack_identity::{AuthGate, GateDecision, IdentityProvider, SupabaseIdentity};
use fueltrack_store::KeyValueStore;
use fueltrack_util::{LogId, VehicleId, now_millis};

use crate::output;
use crate::{
    ChartCommand, LogCommand, LogFields, LogUpdateFields, VehicleCommand, VehicleFields,
    VehicleUpdateFields,
};

/// Time of day stamped on logs entered with a bare date
const DEFAULT_LOG_TIME: (u32, u32) = (12, 0);

/// Parse a `YYYY-MM-DD` date as local noon, in epoch millis
fn parse_log_date(s: &str) -> Result<i64> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{s}', expected YYYY-MM-DD"))?;
    let time = NaiveTime::from_hms_opt(DEFAULT_LOG_TIME.0, DEFAULT_LOG_TIME.1, 0)
        .ok_or_else(|| anyhow!("Invalid default log time"))?;
    let local = Local
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .ok_or_else(|| anyhow!("Date '{s}' does not exist in the local timezone"))?;
    Ok(local.timestamp_millis())
}

fn new_vehicle(fields: VehicleFields) -> NewVehicle {
    let mut vehicle = NewVehicle::new(
        fields.name,
        fields.kind,
        fields.distance_unit.into(),
        fields.fuel_unit.into(),
    );
    vehicle.description = fields.description;
    vehicle.make = fields.make;
    vehicle.model = fields.model;
    vehicle.year = fields.year;
    vehicle.fuel_type = fields.fuel_type;
    vehicle.fuel_capacity = fields.fuel_capacity;
    vehicle.license_plate = fields.license_plate;
    vehicle.is_hybrid = fields.hybrid.then_some(true);
    vehicle
}

fn vehicle_update(fields: VehicleUpdateFields) -> VehicleUpdate {
    VehicleUpdate {
        name: fields.name,
        description: fields.description,
        kind: fields.kind,
        distance_unit: fields.distance_unit.map(Into::into),
        fuel_unit: fields.fuel_unit.map(Into::into),
        fuel_capacity: fields.fuel_capacity,
        fuel_type: fields.fuel_type,
        make: fields.make,
        model: fields.model,
        year: fields.year,
        license_plate: fields.license_plate,
        ..Default::default()
    }
}

fn new_log(fields: LogFields) -> Result<NewFuelLog> {
    let vehicle_id = VehicleId::new(fields.vehicle);
    let date = match &fields.date {
        Some(s) => parse_log_date(s)?,
        None => now_millis(),
    };

    let mut log = match (fields.odometer, fields.trip) {
        (Some(odometer), None) => {
            NewFuelLog::fill_up(vehicle_id, date, odometer, fields.fuel, fields.price)
        }
        (None, Some(trip)) => NewFuelLog::trip(vehicle_id, date, trip, fields.fuel, fields.price),
        _ => bail!("Give either --odometer or --trip"),
    };
    log.total_cost = fields.total;
    log.fuel_type = fields.fuel_type;
    log.currency = fields.currency.unwrap_or_default();
    log.gas_station = fields.station;
    log.notes = fields.notes;
    Ok(log)
}

fn log_update(fields: LogUpdateFields) -> Result<FuelLogUpdate> {
    let date = fields.date.as_deref().map(parse_log_date).transpose()?;
    let (odometer, is_trip, trip_distance) = match (fields.odometer, fields.trip) {
        (Some(odometer), _) => (Some(odometer), Some(false), None),
        (None, Some(trip)) => (None, Some(true), Some(trip)),
        (None, None) => (None, None, None),
    };

    Ok(FuelLogUpdate {
        vehicle_id: fields.vehicle.map(VehicleId::new),
        date,
        odometer,
        is_trip,
        trip_distance,
        fuel_amount: fields.fuel,
        fuel_type: fields.fuel_type,
        price_per_unit: fields.price,
        total_cost: fields.total,
        currency: fields.currency,
        gas_station: fields.station,
        notes: fields.notes,
        ..Default::default()
    })
}

pub fn vehicle(tracker: &FuelTracker, cmd: VehicleCommand) -> Result<()> {
    match cmd {
        VehicleCommand::Add(fields) => {
            let vehicle = tracker.add_vehicle(new_vehicle(fields))?;
            println!("Added {} ({})", vehicle.name, vehicle.id);
        }
        VehicleCommand::List { json } => {
            let vehicles = tracker.vehicles()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&vehicles)?);
            } else {
                output::print_vehicles(&vehicles);
            }
        }
        VehicleCommand::Update { id, fields } => {
            let vehicle = tracker.update_vehicle(&VehicleId::new(id), vehicle_update(fields))?;
            println!("Updated {} ({})", vehicle.name, vehicle.id);
        }
        VehicleCommand::Remove { id } => {
            let deletion = tracker.delete_vehicle(&VehicleId::new(id))?;
            println!(
                "Removed {} ({}), {} fuel logs deleted",
                deletion.vehicle.name, deletion.vehicle.id, deletion.logs_removed
            );
        }
    }
    Ok(())
}

pub fn log(tracker: &FuelTracker, cmd: LogCommand) -> Result<()> {
    match cmd {
        LogCommand::Add(fields) => {
            let log = tracker.add_log(new_log(fields)?)?;
            let name = tracker.vehicle_name(&log.vehicle_id)?;
            println!(
                "Logged {} for {} on {} ({})",
                output::money(log.total_cost, &log.currency),
                name,
                fueltrack_util::format_date(log.date),
                log.id
            );
        }
        LogCommand::List {
            vehicle,
            search,
            asc,
            json,
        } => {
            let query = LogQuery {
                vehicle: vehicle.map(VehicleId::new),
                search,
                order: if asc {
                    SortOrder::Ascending
                } else {
                    SortOrder::Descending
                },
            };
            let logs = tracker.query_logs(&query)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&logs)?);
            } else {
                let all_logs = tracker.logs()?;
                let vehicles = tracker.vehicles()?;
                output::print_logs(&logs, &all_logs, &vehicles);
            }
        }
        LogCommand::Update { id, fields } => {
            let log = tracker.update_log(&LogId::new(id), log_update(fields)?)?;
            println!(
                "Updated fuel log {} ({})",
                log.id,
                output::money(log.total_cost, &log.currency)
            );
        }
        LogCommand::Remove { id } => {
            tracker.delete_log(&LogId::new(id.clone()))?;
            println!("Removed fuel log {id}");
        }
    }
    Ok(())
}

pub fn stats(tracker: &FuelTracker, vehicle: Option<String>, json: bool) -> Result<()> {
    match vehicle {
        Some(id) => {
            let id = VehicleId::new(id);
            let vehicle = tracker
                .vehicle(&id)?
                .ok_or_else(|| anyhow!("Vehicle not found: {id}"))?;
            let stats = tracker.vehicle_stats(&id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                output::print_vehicle_stats(&vehicle, &stats);
            }
        }
        None => {
            let stats = tracker.all_stats()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                let vehicles = tracker.vehicles()?;
                output::print_all_stats(&stats, &vehicles);
            }
        }
    }
    Ok(())
}

pub fn chart(tracker: &FuelTracker, cmd: ChartCommand) -> Result<()> {
    match cmd {
        ChartCommand::Efficiency { vehicle } => {
            let points = tracker.efficiency_chart(&VehicleId::new(vehicle))?;
            output::print_efficiency_chart(&points);
        }
        ChartCommand::Price { vehicle } => {
            let points = tracker.price_series(&VehicleId::new(vehicle))?;
            output::print_price_chart(&points);
        }
    }
    Ok(())
}

pub fn seed(tracker: &FuelTracker, seed: u64) -> Result<()> {
    let data = generate_sample_data(tracker, seed, &fueltrack_util::now())?;
    if data.generated {
        println!(
            "Created {} sample vehicles with {} fuel logs",
            data.vehicles.len(),
            data.logs.len()
        );
    } else {
        println!(
            "Records already present ({} vehicles, {} fuel logs); nothing generated",
            data.vehicles.len(),
            data.logs.len()
        );
    }
    Ok(())
}

pub async fn logout(
    tracker: &FuelTracker,
    identity: Option<&SupabaseIdentity>,
    store: &dyn KeyValueStore,
) -> Result<()> {
    match identity {
        Some(identity) => fueltrack_identity::logout(identity, store)
            .await
            .context("Logout failed")?,
        None => tracker.clear_all()?,
    }
    println!("Logged out; local records deleted");
    Ok(())
}

pub async fn whoami(gate: &AuthGate, identity: &dyn IdentityProvider, route: &str) -> Result<()> {
    match gate.check(identity, route).await {
        GateDecision::Render(Some(user)) => {
            println!("Signed in as {} ({})", user.display_name(), user.id);
            println!("{route}: allowed");
        }
        GateDecision::Render(None) => {
            println!("Not signed in");
            println!("{route}: allowed");
        }
        GateDecision::RedirectToMain => {
            println!("Signed in");
            println!("{route}: redirect to {}", gate.main_route());
        }
        GateDecision::RedirectToLogin => {
            println!("Not signed in");
            println!("{route}: redirect to {}", gate.login_route());
        }
    }
    Ok(())
}
