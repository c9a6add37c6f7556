//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default reverse geocoding request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default format for typed visit dates (day/month/year)
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";
