//! Validated settings types

use crate::schema::{RawConfig, RawIdentityConfig, RawRecordsConfig, RawStorageConfig};
use crate::validation::{parse_delete_policy, parse_total_cost_policy};
use fueltrack_util::default_data_dir;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default currency for new fuel logs
pub const DEFAULT_CURRENCY: &str = "USD";

/// Default login route
pub const DEFAULT_LOGIN_ROUTE: &str = "/login";

/// Default main route
pub const DEFAULT_MAIN_ROUTE: &str = "/";

/// Validated settings, ready for the tracker
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub storage: StorageConfig,
    /// `None` runs without authentication
    pub identity: Option<IdentityConfig>,
    pub records: RecordsPolicy,
}

impl Settings {
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            storage: StorageConfig::from_raw(raw.storage),
            identity: raw.identity.map(IdentityConfig::from_raw),
            records: RecordsPolicy::from_raw(raw.records),
        }
    }
}

/// Where records live
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    fn from_raw(raw: RawStorageConfig) -> Self {
        Self {
            data_dir: raw.data_dir.unwrap_or_else(default_data_dir),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Remote identity backend
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub url: String,
    pub anon_key: String,
    pub login_route: String,
    pub main_route: String,
}

impl IdentityConfig {
    fn from_raw(raw: RawIdentityConfig) -> Self {
        Self {
            url: raw.url.trim_end_matches('/').to_string(),
            anon_key: raw.anon_key,
            login_route: raw
                .login_route
                .unwrap_or_else(|| DEFAULT_LOGIN_ROUTE.to_string()),
            main_route: raw
                .main_route
                .unwrap_or_else(|| DEFAULT_MAIN_ROUTE.to_string()),
        }
    }
}

/// How a fuel log's total cost is kept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalCostPolicy {
    /// Always `fuel_amount * price_per_unit`, rounded to cents
    Derived,
    /// Accept a caller-supplied total; derive it only when missing or when
    /// an update changes the amount or price
    #[default]
    Reconcile,
}

/// What happens to a vehicle's logs when it is deleted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleDeletePolicy {
    /// Delete the logs with the vehicle
    #[default]
    Cascade,
    /// Refuse to delete a vehicle that still has logs
    Block,
    /// Keep the logs; they show up as unassigned
    Orphan,
}

/// Record-keeping rules
#[derive(Debug, Clone)]
pub struct RecordsPolicy {
    pub default_currency: String,
    pub total_cost: TotalCostPolicy,
    pub on_vehicle_delete: VehicleDeletePolicy,
}

impl RecordsPolicy {
    fn from_raw(raw: RawRecordsConfig) -> Self {
        Self {
            default_currency: raw
                .default_currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            total_cost: raw
                .total_cost
                .as_deref()
                .and_then(parse_total_cost_policy)
                .unwrap_or_default(),
            on_vehicle_delete: raw
                .on_vehicle_delete
                .as_deref()
                .and_then(parse_delete_policy)
                .unwrap_or_default(),
        }
    }
}

impl Default for RecordsPolicy {
    fn default() -> Self {
        Self {
            default_currency: DEFAULT_CURRENCY.to_string(),
            total_cost: TotalCostPolicy::default(),
            on_vehicle_delete: VehicleDeletePolicy::default(),
        }
    }
}
