//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Where records are persisted
    #[serde(default)]
    pub storage: RawStorageConfig,

    /// Identity backend; absent means no authentication
    #[serde(default)]
    pub identity: Option<RawIdentityConfig>,

    /// Record-keeping rules
    #[serde(default)]
    pub records: RawRecordsConfig,
}

/// Storage settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawStorageConfig {
    /// Data directory holding the database
    pub data_dir: Option<PathBuf>,
}

/// Identity provider settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawIdentityConfig {
    /// Base URL of the auth backend (e.g. `https://xyz.supabase.co`)
    pub url: String,

    /// Public anon key sent with every request
    pub anon_key: String,

    /// Login entry point (default: `/login`)
    pub login_route: Option<String>,

    /// Main entry point (default: `/`)
    pub main_route: Option<String>,
}

/// Record-keeping settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawRecordsConfig {
    /// ISO 4217 code used when a log does not name one (default: `USD`)
    pub default_currency: Option<String>,

    /// `"reconcile"` or `"derived"`
    pub total_cost: Option<String>,

    /// `"cascade"`, `"block"` or `"orphan"`
    pub on_vehicle_delete: Option<String>,
}
