//! Saved trips storage
//!
//! Stores and retrieves submitted trips from a JSON file.
//! Trips are stored in the XDG data directory (~/.local/share/trip-log/)
//! unless `storage.path` is configured.

use crate::error::{Error, Result};
use crate::trip::{RecordSink, TripRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A saved trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTrip {
    /// Generated identifier (UUID v4)
    pub id: String,

    /// When the trip was saved
    pub created_at: DateTime<Utc>,

    #[serde(flatten)]
    pub record: TripRecord,
}

impl StoredTrip {
    /// Wrap a record with a fresh id
    pub fn new(record: TripRecord) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            record,
        }
    }
}

/// Trips file manager
#[derive(Debug)]
pub struct TripStore {
    trips: Vec<StoredTrip>,
    path: PathBuf,
}

impl TripStore {
    /// Load trips from a file; a missing file is an empty store
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let trips = if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| Error::Storage(format!("Failed to read trips file: {}", e)))?;

            serde_json::from_str(&content)
                .map_err(|e| Error::Storage(format!("Failed to parse trips file: {}", e)))?
        } else {
            Vec::new()
        };

        Ok(Self { trips, path })
    }

    /// Save trips to disk
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Storage(format!("Failed to create trips directory: {}", e))
            })?;
        }

        let content = serde_json::to_string_pretty(&self.trips)
            .map_err(|e| Error::Storage(format!("Failed to serialize trips: {}", e)))?;

        fs::write(&self.path, content)
            .map_err(|e| Error::Storage(format!("Failed to write trips file: {}", e)))?;

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Add a record, most recent first
    pub fn add(&mut self, record: TripRecord) -> &StoredTrip {
        self.trips.insert(0, StoredTrip::new(record));
        &self.trips[0]
    }

    /// Get all trips
    pub fn trips(&self) -> &[StoredTrip] {
        &self.trips
    }

    /// Get trip by ID
    pub fn get(&self, id: &str) -> Option<&StoredTrip> {
        self.trips.iter().find(|t| t.id == id)
    }

    /// Find a trip by ID prefix
    ///
    /// Fails when nothing matches or the prefix is ambiguous.
    pub fn find(&self, prefix: &str) -> Result<&StoredTrip> {
        if prefix.is_empty() {
            return Err(Error::Storage("Trip id is empty".to_string()));
        }

        let mut matches = self.trips.iter().filter(|t| t.id.starts_with(prefix));

        match (matches.next(), matches.next()) {
            (Some(trip), None) => Ok(trip),
            (Some(_), Some(_)) => Err(Error::Storage(format!("Ambiguous trip id: {}", prefix))),
            (None, _) => Err(Error::Storage(format!("Trip not found: {}", prefix))),
        }
    }

    /// Remove trip by ID
    pub fn remove(&mut self, id: &str) -> Option<StoredTrip> {
        let idx = self.trips.iter().position(|t| t.id == id)?;
        Some(self.trips.remove(idx))
    }

    /// Get number of trips
    pub fn len(&self) -> usize {
        self.trips.len()
    }

    /// Check if there are no trips
    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Remove all trips
    pub fn clear(&mut self) {
        self.trips.clear();
    }

    /// Get most recent trips
    pub fn recent(&self, count: usize) -> &[StoredTrip] {
        &self.trips[..count.min(self.trips.len())]
    }
}

/// Sink appending submitted trips to a trips file
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSink for FileSink {
    async fn create(&self, record: &TripRecord) -> Result<()> {
        let mut store = TripStore::load_from(self.path.clone())?;
        let id = store.add(record.clone()).id.clone();
        store.save()?;

        debug!(id = %id, path = %self.path.display(), "trip saved");
        Ok(())
    }
}
