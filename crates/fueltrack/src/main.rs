//! fueltrack - fuel log and vehicle statistics tracker
//!
//! This is the main entry point for the fueltrack command line tool.
//! It wires together all the components:
//! - Configuration loading with environment overrides
//! - Store initialization
//! - The record-keeping service
//! - The optional identity provider and auth gate

mod commands;
mod output;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use fueltrack_api::{DistanceUnit, FuelUnit};
use fueltrack_config::{IdentityConfig, Settings, load_config_or_default};
use fueltrack_core::FuelTracker;
use fueltrack_identity::{AuthGate, GateDecision, SupabaseIdentity};
use fueltrack_store::{KeyValueStore, LocalFuelLogRepository, LocalVehicleRepository, SqliteStore};
use fueltrack_util::{database_path, default_config_path};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// fueltrack - Track fill-ups, fuel efficiency and spending per vehicle
#[derive(Parser, Debug)]
#[command(name = "fueltrack", version)]
#[command(about = "Track fill-ups, fuel efficiency and spending per vehicle", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/fueltrack/config.toml)
    #[arg(short, long, env = "FUELTRACK_CONFIG", default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Data directory override (or set FUELTRACK_DATA_DIR env var)
    #[arg(short, long, env = "FUELTRACK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Supabase project URL override
    #[arg(long, env = "FUELTRACK_SUPABASE_URL")]
    supabase_url: Option<String>,

    /// Supabase anon key override
    #[arg(long, env = "FUELTRACK_SUPABASE_ANON_KEY", hide_env_values = true)]
    supabase_anon_key: Option<String>,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage vehicles
    #[command(subcommand)]
    Vehicle(VehicleCommand),

    /// Manage fuel logs
    #[command(subcommand)]
    Log(LogCommand),

    /// Show statistics for one vehicle or all of them
    Stats {
        /// Vehicle id (default: all vehicles)
        #[arg(long)]
        vehicle: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print chart series for a vehicle
    #[command(subcommand)]
    Chart(ChartCommand),

    /// Fill an empty database with sample vehicles and logs
    Seed {
        /// RNG seed
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },

    /// Sign in with an access token issued by the identity service
    Login {
        #[arg(long)]
        token: String,

        /// Token expiry as epoch seconds
        #[arg(long)]
        expires_at: Option<i64>,
    },

    /// Sign out and delete all local records
    Logout,

    /// Show the signed-in user and what the auth gate decides for a route
    Whoami {
        #[arg(long, default_value = "/")]
        route: String,
    },
}

#[derive(Subcommand, Debug)]
enum VehicleCommand {
    /// Register a vehicle
    Add(VehicleFields),

    /// List vehicles
    List {
        #[arg(long)]
        json: bool,
    },

    /// Change a vehicle's details
    Update {
        id: String,

        #[command(flatten)]
        fields: VehicleUpdateFields,
    },

    /// Remove a vehicle (its logs follow the configured delete policy)
    Remove { id: String },
}

#[derive(clap::Args, Debug)]
struct VehicleFields {
    name: String,

    /// Category tag (car, truck, motorcycle, ...)
    #[arg(long = "type", default_value = "car")]
    kind: String,

    #[arg(long, value_enum, default_value_t = DistanceUnitArg::Km)]
    distance_unit: DistanceUnitArg,

    #[arg(long, value_enum, default_value_t = FuelUnitArg::Liter)]
    fuel_unit: FuelUnitArg,

    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    make: Option<String>,
    #[arg(long)]
    model: Option<String>,
    #[arg(long)]
    year: Option<i32>,
    #[arg(long)]
    fuel_type: Option<String>,
    #[arg(long)]
    fuel_capacity: Option<f64>,
    #[arg(long)]
    license_plate: Option<String>,
    #[arg(long)]
    hybrid: bool,
}

#[derive(clap::Args, Debug)]
struct VehicleUpdateFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long = "type")]
    kind: Option<String>,
    #[arg(long, value_enum)]
    distance_unit: Option<DistanceUnitArg>,
    #[arg(long, value_enum)]
    fuel_unit: Option<FuelUnitArg>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    make: Option<String>,
    #[arg(long)]
    model: Option<String>,
    #[arg(long)]
    year: Option<i32>,
    #[arg(long)]
    fuel_type: Option<String>,
    #[arg(long)]
    fuel_capacity: Option<f64>,
    #[arg(long)]
    license_plate: Option<String>,
}

#[derive(Subcommand, Debug)]
enum LogCommand {
    /// Record a fill-up
    Add(LogFields),

    /// List fuel logs, newest first
    List {
        /// Only logs of this vehicle
        #[arg(long)]
        vehicle: Option<String>,

        /// Match vehicle name, date, fuel type, station or notes
        #[arg(long)]
        search: Option<String>,

        /// Oldest first
        #[arg(long)]
        asc: bool,

        #[arg(long)]
        json: bool,
    },

    /// Correct a fuel log
    Update {
        id: String,

        #[command(flatten)]
        fields: LogUpdateFields,
    },

    /// Delete a fuel log
    Remove { id: String },
}

#[derive(clap::Args, Debug)]
struct LogFields {
    /// Vehicle id
    #[arg(long)]
    vehicle: String,

    /// Fill-up date, YYYY-MM-DD (default: now)
    #[arg(long)]
    date: Option<String>,

    /// Odometer reading
    #[arg(long, conflicts_with = "trip")]
    odometer: Option<f64>,

    /// Distance since the last fill-up, for trip-meter entries
    #[arg(long)]
    trip: Option<f64>,

    /// Amount of fuel
    #[arg(long)]
    fuel: f64,

    /// Price per unit of fuel
    #[arg(long)]
    price: f64,

    /// Total paid, when it differs from fuel x price
    #[arg(long)]
    total: Option<f64>,

    #[arg(long, default_value = "Regular")]
    fuel_type: String,

    /// ISO 4217 code (default: from config)
    #[arg(long)]
    currency: Option<String>,

    #[arg(long)]
    station: Option<String>,

    #[arg(long)]
    notes: Option<String>,
}

#[derive(clap::Args, Debug)]
struct LogUpdateFields {
    /// Move the log to another vehicle
    #[arg(long)]
    vehicle: Option<String>,
    #[arg(long)]
    date: Option<String>,
    #[arg(long, conflicts_with = "trip")]
    odometer: Option<f64>,
    #[arg(long)]
    trip: Option<f64>,
    #[arg(long)]
    fuel: Option<f64>,
    #[arg(long)]
    price: Option<f64>,
    #[arg(long)]
    total: Option<f64>,
    #[arg(long)]
    fuel_type: Option<String>,
    #[arg(long)]
    currency: Option<String>,
    #[arg(long)]
    station: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Subcommand, Debug)]
enum ChartCommand {
    /// Efficiency per fill-up in the vehicle's unit
    Efficiency {
        #[arg(long)]
        vehicle: String,
    },

    /// Price per unit over time
    Price {
        #[arg(long)]
        vehicle: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DistanceUnitArg {
    Km,
    Mi,
}

impl From<DistanceUnitArg> for DistanceUnit {
    fn from(arg: DistanceUnitArg) -> Self {
        match arg {
            DistanceUnitArg::Km => DistanceUnit::Km,
            DistanceUnitArg::Mi => DistanceUnit::Mi,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FuelUnitArg {
    Liter,
    Gallon,
}

impl From<FuelUnitArg> for FuelUnit {
    fn from(arg: FuelUnitArg) -> Self {
        match arg {
            FuelUnitArg::Liter => FuelUnit::Liter,
            FuelUnitArg::Gallon => FuelUnit::Gallon,
        }
    }
}

/// Wired-up application state
struct App {
    store: Arc<dyn KeyValueStore>,
    tracker: FuelTracker,
    identity: Option<SupabaseIdentity>,
    gate: AuthGate,
}

/// Apply command line and environment overrides on top of the config file
fn resolve_settings(args: &Args) -> Result<Settings> {
    let mut settings = load_config_or_default(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;

    if let Some(data_dir) = &args.data_dir {
        settings.storage.data_dir = data_dir.clone();
    }

    match (&args.supabase_url, &args.supabase_anon_key) {
        (Some(url), Some(anon_key)) => {
            let (login_route, main_route) = match &settings.identity {
                Some(existing) => (existing.login_route.clone(), existing.main_route.clone()),
                None => (
                    fueltrack_config::DEFAULT_LOGIN_ROUTE.to_string(),
                    fueltrack_config::DEFAULT_MAIN_ROUTE.to_string(),
                ),
            };
            settings.identity = Some(IdentityConfig {
                url: url.trim_end_matches('/').to_string(),
                anon_key: anon_key.clone(),
                login_route,
                main_route,
            });
        }
        (Some(_), None) => bail!("--supabase-url requires --supabase-anon-key"),
        (None, Some(_)) => bail!("--supabase-anon-key requires --supabase-url"),
        (None, None) => {}
    }

    Ok(settings)
}

impl App {
    fn new(args: &Args) -> Result<Self> {
        let settings = resolve_settings(args)?;

        info!(
            config_path = %args.config.display(),
            data_dir = %settings.storage.data_dir.display(),
            identity = settings.identity.is_some(),
            "Configuration loaded"
        );

        let db_path = database_path(&settings.storage.data_dir);
        let store: Arc<dyn KeyValueStore> = Arc::new(
            SqliteStore::open(&db_path)
                .with_context(|| format!("Failed to open database {:?}", db_path))?,
        );
        debug!(db_path = %db_path.display(), "Store initialized");

        let (identity, gate) = match &settings.identity {
            Some(config) => (
                Some(
                    SupabaseIdentity::new(config, store.clone())
                        .context("Failed to create identity client")?,
                ),
                AuthGate::from_config(config),
            ),
            None => (None, AuthGate::default()),
        };

        let tracker = FuelTracker::new(
            settings,
            Arc::new(LocalVehicleRepository::new(store.clone())),
            Arc::new(LocalFuelLogRepository::new(store.clone())),
        );

        Ok(Self {
            store,
            tracker,
            identity,
            gate,
        })
    }

    /// Refuse to continue unless the identity provider (when configured)
    /// lets `route` render
    async fn require_access(&self, route: &str) -> Result<()> {
        let Some(identity) = &self.identity else {
            return Ok(());
        };

        match self.gate.check(identity, route).await {
            GateDecision::Render(_) | GateDecision::RedirectToMain => Ok(()),
            GateDecision::RedirectToLogin => {
                bail!("Not signed in. Run `fueltrack login --token <ACCESS_TOKEN>` first.")
            }
        }
    }

    async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Vehicle(cmd) => {
                self.require_access("/vehicles").await?;
                commands::vehicle(&self.tracker, cmd)
            }
            Command::Log(cmd) => {
                self.require_access("/logs").await?;
                commands::log(&self.tracker, cmd)
            }
            Command::Stats { vehicle, json } => {
                self.require_access("/statistics").await?;
                commands::stats(&self.tracker, vehicle, json)
            }
            Command::Chart(cmd) => {
                self.require_access("/statistics").await?;
                commands::chart(&self.tracker, cmd)
            }
            Command::Seed { seed } => {
                self.require_access("/").await?;
                commands::seed(&self.tracker, seed)
            }
            Command::Login { token, expires_at } => {
                let Some(identity) = &self.identity else {
                    bail!("No identity service configured; fueltrack is running in local mode");
                };
                let user = identity
                    .sign_in_with_token(&token, expires_at)
                    .await
                    .context("Sign-in failed")?;
                println!("Signed in as {}", user.display_name());
                Ok(())
            }
            Command::Logout => {
                commands::logout(&self.tracker, self.identity.as_ref(), self.store.as_ref()).await
            }
            Command::Whoami { route } => match &self.identity {
                Some(identity) => commands::whoami(&self.gate, identity, &route).await,
                None => {
                    println!("Local mode (no identity service configured)");
                    Ok(())
                }
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    debug!(version = env!("CARGO_PKG_VERSION"), "fueltrack starting");
    if fueltrack_util::is_mock_time_active() {
        warn!(now = %fueltrack_util::now(), "Mock time active; new records use it");
    }

    let app = App::new(&args)?;
    app.run(args.command).await
}
