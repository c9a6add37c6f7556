//! Reverse geocoding
//!
//! Resolves a latitude/longitude pair to the city and country it falls in.

pub mod bigdatacloud;

use crate::config::Config;
use crate::coord::Coordinates;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A resolved place
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocodeResult {
    /// City name, falling back to the locality; may be empty
    pub city_name: String,
    /// Country display name
    pub country_name: String,
    /// ISO 3166-1 alpha-2 code, as returned by the service
    pub country_code: String,
}

/// Trait for reverse geocoding backends
pub trait GeocodeBackend: Send + Sync {
    /// Resolve coordinates to a place
    ///
    /// Fails with `Error::NotACity` when the point is not inside any country
    /// and `Error::LookupTransport` when the service could not be reached or
    /// answered with something unreadable. One attempt, no retries.
    fn reverse_geocode(
        &self,
        coords: Coordinates,
    ) -> impl std::future::Future<Output = Result<GeocodeResult>> + Send;
}

/// Get the geocoding backend described by the config
pub fn get_geocoder(config: &Config) -> Result<bigdatacloud::BigDataCloudBackend> {
    bigdatacloud::BigDataCloudBackend::from_config(&config.geocoding)
}
