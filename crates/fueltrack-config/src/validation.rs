//! Configuration validation

use crate::schema::{RawConfig, RawIdentityConfig, RawRecordsConfig};
use crate::settings::{TotalCostPolicy, VehicleDeletePolicy};
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Identity: {0}")]
    IdentityError(String),

    #[error("Invalid currency code '{0}': expected three uppercase letters")]
    InvalidCurrency(String),

    #[error("Unknown total_cost policy '{0}' (expected reconcile or derived)")]
    UnknownTotalCostPolicy(String),

    #[error("Unknown on_vehicle_delete policy '{0}' (expected cascade, block or orphan)")]
    UnknownDeletePolicy(String),

    #[error("Global config error: {0}")]
    GlobalError(String),
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(identity) = &config.identity {
        errors.extend(validate_identity(identity));
    }

    errors.extend(validate_records(&config.records));

    if let Some(dir) = &config.storage.data_dir
        && dir.as_os_str().is_empty()
    {
        errors.push(ValidationError::GlobalError(
            "storage.data_dir cannot be empty".into(),
        ));
    }

    errors
}

fn validate_identity(identity: &RawIdentityConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if !(identity.url.starts_with("https://") || identity.url.starts_with("http://")) {
        errors.push(ValidationError::IdentityError(format!(
            "url '{}' must start with http:// or https://",
            identity.url
        )));
    }

    if identity.anon_key.trim().is_empty() {
        errors.push(ValidationError::IdentityError(
            "anon_key cannot be empty".into(),
        ));
    }

    for (name, route) in [
        ("login_route", &identity.login_route),
        ("main_route", &identity.main_route),
    ] {
        if let Some(route) = route
            && !route.starts_with('/')
        {
            errors.push(ValidationError::IdentityError(format!(
                "{} '{}' must start with '/'",
                name, route
            )));
        }
    }

    errors
}

fn validate_records(records: &RawRecordsConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(currency) = &records.default_currency
        && !is_currency_code(currency)
    {
        errors.push(ValidationError::InvalidCurrency(currency.clone()));
    }

    if let Some(policy) = &records.total_cost
        && parse_total_cost_policy(policy).is_none()
    {
        errors.push(ValidationError::UnknownTotalCostPolicy(policy.clone()));
    }

    if let Some(policy) = &records.on_vehicle_delete
        && parse_delete_policy(policy).is_none()
    {
        errors.push(ValidationError::UnknownDeletePolicy(policy.clone()));
    }

    errors
}

/// Three uppercase ASCII letters
pub fn is_currency_code(s: &str) -> bool {
    s.len() == 3 && s.chars().all(|c| c.is_ascii_uppercase())
}

/// Parse a total-cost policy name
pub fn parse_total_cost_policy(s: &str) -> Option<TotalCostPolicy> {
    match s.to_lowercase().as_str() {
        "reconcile" => Some(TotalCostPolicy::Reconcile),
        "derived" | "derive" => Some(TotalCostPolicy::Derived),
        _ => None,
    }
}

/// Parse a vehicle-delete policy name
pub fn parse_delete_policy(s: &str) -> Option<VehicleDeletePolicy> {
    match s.to_lowercase().as_str() {
        "cascade" => Some(VehicleDeletePolicy::Cascade),
        "block" => Some(VehicleDeletePolicy::Block),
        "orphan" => Some(VehicleDeletePolicy::Orphan),
        _ => None,
    }
}
