//! Error types for trip-log

use thiserror::Error;

/// Message shown when a point does not resolve to a place (open ocean, poles, ...)
pub const NOT_A_CITY_MESSAGE: &str = "Isso não parece ser uma cidade.";

/// Main error type for trip-log operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("{}", NOT_A_CITY_MESSAGE)]
    NotACity,

    #[error("{0}")]
    LookupTransport(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid country code: {0:?}")]
    InvalidCountryCode(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reasons a trip entry cannot be submitted
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("City name is required")]
    MissingCityName,

    #[error("Visit date is required")]
    MissingVisitDate,
}

/// Result type alias for trip-log operations
pub type Result<T> = std::result::Result<T, Error>;
