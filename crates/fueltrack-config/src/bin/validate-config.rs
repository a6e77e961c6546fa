//! Config validation CLI tool
//!
//! Validates a fueltrack configuration file and reports any errors.

use fueltrack_config::{ConfigError, CURRENT_CONFIG_VERSION};
use fueltrack_util::{database_path, default_config_path};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let config_path = match args.get(1) {
        Some(path) => PathBuf::from(path),
        None => {
            let default_path = default_config_path();
            eprintln!("Usage: validate-config [config-file]");
            eprintln!();
            eprintln!("Validates a fueltrack configuration file.");
            eprintln!();
            eprintln!("Example:");
            eprintln!("  validate-config {}", default_path.display());
            return ExitCode::from(2);
        }
    };

    if !config_path.exists() {
        eprintln!("Error: Configuration file not found: {}", config_path.display());
        return ExitCode::from(1);
    }

    match fueltrack_config::load_config(&config_path) {
        Ok(settings) => {
            println!("✓ Configuration is valid");
            println!();
            println!("Summary:");
            println!("  Config version: {}", CURRENT_CONFIG_VERSION);
            let db_path = database_path(&settings.storage.data_dir);
            let db_state = if db_path.exists() { "exists" } else { "will be created" };
            println!("  Database: {} ({})", db_path.display(), db_state);
            match &settings.identity {
                Some(identity) => {
                    println!("  Identity: {}", identity.url);
                    println!(
                        "  Routes: login {}, main {}",
                        identity.login_route, identity.main_route
                    );
                }
                None => println!("  Identity: none (local only)"),
            }
            println!("  Currency: {}", settings.records.default_currency);
            println!("  Total cost: {:?}", settings.records.total_cost);
            println!("  On vehicle delete: {:?}", settings.records.on_vehicle_delete);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed");
            eprintln!();
            match &e {
                ConfigError::ReadError(io_err) => {
                    eprintln!("Failed to read file: {}", io_err);
                }
                ConfigError::ParseError(parse_err) => {
                    eprintln!("TOML parse error:");
                    eprintln!("  {}", parse_err);
                }
                ConfigError::ValidationFailed { errors } => {
                    eprintln!("Validation errors ({}):", errors.len());
                    for err in errors {
                        eprintln!("  - {}", err);
                    }
                }
                ConfigError::UnsupportedVersion(ver) => {
                    eprintln!(
                        "Unsupported config version: {} (expected {})",
                        ver, CURRENT_CONFIG_VERSION
                    );
                }
            }
            ExitCode::from(1)
        }
    }
}
