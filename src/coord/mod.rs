//! Geographic coordinates
//!
//! This module handles:
//! - Validated latitude/longitude points
//! - The possibly-incomplete coordinate pair produced by a map selection
//! - Reading a selected position from a `?lat=..&lng=..` query string

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A geographic coordinate (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }
}

/// The position selected on the map, either half of which may be missing
///
/// Serialized as `{"lat": .., "lng": ..}` with `null` for missing halves.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CoordinatePair {
    #[serde(rename = "lat")]
    pub latitude: Option<f64>,
    #[serde(rename = "lng")]
    pub longitude: Option<f64>,
}

impl CoordinatePair {
    /// A pair with both halves present
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
        }
    }

    /// No point selected yet
    pub fn absent() -> Self {
        Self::default()
    }

    /// Both halves, if both are present
    pub fn resolved(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        }
    }

    /// True when no usable point is available
    pub fn is_absent(&self) -> bool {
        self.resolved().is_none()
    }

    /// Read `lat` and `lng` parameters from a URL or bare query string
    ///
    /// Accepts `https://host/app/form?lat=48.85&lng=2.35`, `?lat=..&lng=..`
    /// or `lat=..&lng=..`. Missing or unparsable values leave that half absent.
    pub fn from_query(input: &str) -> Self {
        let query = match input.split_once('?') {
            Some((_, q)) => q,
            None => input,
        };
        let query = query.split('#').next().unwrap_or_default();

        let mut pair = Self::absent();
        for param in query.split('&') {
            let Some((key, value)) = param.split_once('=') else {
                continue;
            };
            let Ok(value) = urlencoding::decode(value) else {
                continue;
            };
            let parsed = value.trim().parse::<f64>().ok().filter(|v| v.is_finite());
            match key {
                "lat" => pair.latitude = parsed,
                "lng" => pair.longitude = parsed,
                _ => {}
            }
        }
        pair
    }
}

impl From<Coordinates> for CoordinatePair {
    fn from(coords: Coordinates) -> Self {
        Self::new(coords.lat, coords.lng)
    }
}
