//! Centralized constants for the trip-log crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// External API endpoints
pub mod api {
    /// BigDataCloud client-side reverse geocoding (free, no key required)
    pub const BIGDATACLOUD_REVERSE_URL: &str =
        "https://api.bigdatacloud.net/data/reverse-geocode-client";

    /// User-Agent sent with outgoing requests
    pub const USER_AGENT: &str = concat!("trip-log/", env!("CARGO_PKG_VERSION"));
}

/// Flag glyph encoding
pub mod flag {
    /// Distance from an uppercase ASCII letter to its regional indicator symbol
    /// ('A' = 0x41 maps to U+1F1E6)
    pub const REGIONAL_INDICATOR_OFFSET: u32 = 127_397;
}

/// Storage file names
pub mod storage {
    /// Application directory name (for XDG paths)
    pub const APP_DIR_NAME: &str = "trip-log";

    /// Saved trips file name
    pub const TRIPS_FILE_NAME: &str = "trips.json";
}
