//! Persistence layer for fueltrack
//!
//! Provides:
//! - A string key-value store (SQLite-backed)
//! - Vehicle and fuel log repositories that keep each collection as one
//!   JSON document under a fixed key

mod repository;
mod sqlite;
mod traits;

pub use repository::*;
pub use sqlite::*;
pub use traits::*;

use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

impl From<StoreError> for fueltrack_util::FuelTrackError {
    fn from(e: StoreError) -> Self {
        fueltrack_util::FuelTrackError::store(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
