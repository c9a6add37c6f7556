//! Trip entry workflow
//!
//! A trip entry session starts when a point is picked on the map:
//! - the point is reverse geocoded (loading, then either seeded or failed)
//! - the user adjusts the city name, visit date and notes
//! - the finished entry is validated and handed to a `RecordSink`

pub mod controller;
pub mod state;


pub use controller::{LookupOutcome, LookupTicket, TripEntryController};
pub use state::{parse_visit_date, TripEntryState};

use crate::coord::CoordinatePair;
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Progress of the reverse geocoding lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStatus {
    #[default]
    Idle,
    Loading,
    Error,
}

/// What the caller should present for the current session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TripEntryView<'a> {
    /// No point selected and nothing entered yet
    AwaitingSelection,
    /// Lookup in flight; takes precedence over everything else
    Loading,
    /// Lookup failed; only the message is shown
    Error(&'a str),
    /// Editable form
    Form(&'a TripEntryState),
}

/// A submitted city visit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRecord {
    pub city_name: String,
    pub country: String,
    #[serde(rename = "emoji")]
    pub flag: String,
    #[serde(rename = "date")]
    pub visit_date: DateTime<Utc>,
    pub notes: String,
    #[serde(rename = "position")]
    pub coordinates: CoordinatePair,
}

/// Destination for submitted trips
///
/// Whatever error the sink returns is handed back to the submitter as is.
pub trait RecordSink: Send + Sync {
    /// Persist one record
    fn create(&self, record: &TripRecord) -> impl std::future::Future<Output = Result<()>> + Send;
}
