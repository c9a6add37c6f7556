//! Editable trip entry state

use crate::coord::CoordinatePair;
use crate::error::{Error, Result, ValidationError};
use crate::trip::{LookupStatus, TripRecord};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// ISO date, always accepted alongside the configured format
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// State of one trip entry session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripEntryState {
    pub city_name: String,
    pub country: String,
    /// None when the typed date could not be understood
    pub visit_date: Option<DateTime<Utc>>,
    pub notes: String,
    /// Derived from the last resolved country code
    pub flag: String,
    pub coordinates: CoordinatePair,
    pub lookup_status: LookupStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup_error: Option<String>,
}

impl TripEntryState {
    /// Empty state with the given default visit date
    pub fn new(default_visit_date: DateTime<Utc>) -> Self {
        Self {
            city_name: String::new(),
            country: String::new(),
            visit_date: Some(default_visit_date),
            notes: String::new(),
            flag: String::new(),
            coordinates: CoordinatePair::absent(),
            lookup_status: LookupStatus::Idle,
            lookup_error: None,
        }
    }

    /// Check required fields
    pub fn validate(&self) -> std::result::Result<DateTime<Utc>, ValidationError> {
        if self.city_name.is_empty() {
            return Err(ValidationError::MissingCityName);
        }
        self.visit_date.ok_or(ValidationError::MissingVisitDate)
    }

    /// Snapshot the state as a record, if it is complete
    pub fn to_record(&self) -> Result<TripRecord> {
        let visit_date = self.validate()?;

        Ok(TripRecord {
            city_name: self.city_name.clone(),
            country: self.country.clone(),
            flag: self.flag.clone(),
            visit_date,
            notes: self.notes.clone(),
            coordinates: self.coordinates,
        })
    }
}

/// Parse a typed visit date as midnight UTC
///
/// Tries `format` first (a chrono format string, e.g. `%d/%m/%Y`), then ISO
/// `YYYY-MM-DD`.
pub fn parse_visit_date(input: &str, format: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();

    let date = NaiveDate::parse_from_str(input, format)
        .or_else(|_| NaiveDate::parse_from_str(input, ISO_DATE_FORMAT))
        .map_err(|_| Error::InvalidDate(format!("{:?} does not match {}", input, format)))?;

    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .ok_or_else(|| Error::InvalidDate(input.to_string()))
}
