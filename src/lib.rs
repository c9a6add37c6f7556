//! trip-log: record visited cities from map coordinates
//!
//! A library and CLI tool that turns a selected map position into a saved
//! "city visit": the point is reverse geocoded to a city and country, the
//! user adjusts the name, date and notes, and the finished entry is stored.
//!
//! ## Features
//!
//! - BigDataCloud reverse geocoding with loading/error states
//! - Country flag glyphs from ISO country codes
//! - Stale lookup results are never applied
//! - JSON file storage for saved trips
//!
//! ## Quick Start
//!
//! ```no_run
//! use trip_log::coord::CoordinatePair;
//! use trip_log::geo::bigdatacloud::BigDataCloudBackend;
//! use trip_log::store::FileSink;
//! use trip_log::trip::TripEntryController;
//!
//! # async fn example() -> trip_log::Result<()> {
//! let geocoder = BigDataCloudBackend::new()?;
//! let mut entry = TripEntryController::new(geocoder, chrono::Utc::now());
//!
//! entry.set_coordinates(CoordinatePair::new(48.85, 2.35)).await;
//! entry.set_notes("Nice trip");
//!
//! let record = entry.submit(&FileSink::new("trips.json")).await?;
//! println!("{} {}", record.flag, record.city_name);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod flag;
pub mod geo;
pub mod store;
pub mod trip;

// Re-export commonly used types
pub use config::Config;
pub use coord::{CoordinatePair, Coordinates};
pub use error::{Error, Result, ValidationError};
pub use flag::encode_flag;
pub use geo::{GeocodeBackend, GeocodeResult};
pub use trip::{LookupStatus, RecordSink, TripEntryController, TripEntryState, TripRecord};
