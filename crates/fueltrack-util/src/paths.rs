//! Default paths for fueltrack components
//!
//! Paths are user-writable by default:
//! - Data: `$XDG_DATA_HOME/fueltrack` or `~/.local/share/fueltrack`
//! - Config: `$XDG_CONFIG_HOME/fueltrack/config.toml` or `~/.config/fueltrack/config.toml`

use std::path::PathBuf;

/// Environment variable for overriding the data directory
pub const FUELTRACK_DATA_DIR_ENV: &str = "FUELTRACK_DATA_DIR";

/// Environment variable for overriding the config file path
pub const FUELTRACK_CONFIG_ENV: &str = "FUELTRACK_CONFIG";

/// Application subdirectory name
const APP_DIR: &str = "fueltrack";

/// Config filename within the config directory
const CONFIG_FILENAME: &str = "config.toml";

/// Database filename within the data directory
pub const DATABASE_FILENAME: &str = "fueltrack.db";

/// Get the default data directory.
///
/// Order of precedence:
/// 1. `$FUELTRACK_DATA_DIR` environment variable (if set)
/// 2. `$XDG_DATA_HOME/fueltrack` (if XDG_DATA_HOME is set)
/// 3. `~/.local/share/fueltrack` (fallback)
pub fn default_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var(FUELTRACK_DATA_DIR_ENV) {
        return PathBuf::from(path);
    }

    data_dir_without_env()
}

/// Get the data directory without checking FUELTRACK_DATA_DIR.
/// Used for default values in configs where the env var is checked separately.
pub fn data_dir_without_env() -> PathBuf {
    if let Ok(data_home) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(data_home).join(APP_DIR);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_DIR);
    }

    // Last resort
    PathBuf::from("/tmp").join(APP_DIR).join("data")
}

/// Get the default configuration file path.
///
/// Order of precedence:
/// 1. `$FUELTRACK_CONFIG` environment variable (if set)
/// 2. `$XDG_CONFIG_HOME/fueltrack/config.toml`
/// 3. `~/.config/fueltrack/config.toml`
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(FUELTRACK_CONFIG_ENV) {
        return PathBuf::from(path);
    }

    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home).join(APP_DIR).join(CONFIG_FILENAME);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILENAME);
    }

    PathBuf::from("/etc").join(APP_DIR).join(CONFIG_FILENAME)
}

/// Path of the SQLite database inside a data directory
pub fn database_path(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join(DATABASE_FILENAME)
}
