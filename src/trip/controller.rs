//! Trip entry controller
//!
//! Drives one session: watches the selected coordinates, runs one reverse
//! geocoding lookup per new pair, seeds the form from the result and submits
//! the finished entry.
//!
//! A lookup is split in three steps so callers can interleave them with user
//! input on a single task:
//!
//! ```text
//! observe(pair) -> ticket      (sync, state becomes Loading)
//! lookup(ticket) -> outcome    (async, owns its geocoder handle)
//! apply(outcome)               (sync, ignored unless it is the latest ticket)
//! ```
//!
//! The lookup future does not borrow the controller, so new pairs and edits
//! can be fed in while it is in flight. `set_coordinates` runs all three back
//! to back.

use crate::coord::{CoordinatePair, Coordinates};
use crate::error::Result;
use crate::flag::encode_flag;
use crate::geo::{GeocodeBackend, GeocodeResult};
use crate::trip::{LookupStatus, RecordSink, TripEntryState, TripEntryView, TripRecord};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Identifies one issued lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookupTicket {
    id: u64,
    coords: Coordinates,
}

impl LookupTicket {
    /// Coordinates this lookup was issued for
    pub fn coords(&self) -> Coordinates {
        self.coords
    }
}

/// Finished lookup, waiting to be applied
#[derive(Debug)]
pub struct LookupOutcome {
    ticket: LookupTicket,
    result: Result<GeocodeResult>,
}

impl LookupOutcome {
    /// Wrap a result obtained outside `lookup`
    pub fn new(ticket: LookupTicket, result: Result<GeocodeResult>) -> Self {
        Self { ticket, result }
    }

    pub fn ticket(&self) -> LookupTicket {
        self.ticket
    }

    pub fn result(&self) -> &Result<GeocodeResult> {
        &self.result
    }

    pub fn into_parts(self) -> (LookupTicket, Result<GeocodeResult>) {
        (self.ticket, self.result)
    }
}

/// Controller for one trip entry session
#[derive(Debug)]
pub struct TripEntryController<G> {
    geocoder: Arc<G>,
    state: TripEntryState,
    last_ticket: u64,
    /// Latest ticket not yet applied
    pending: Option<u64>,
    /// At least one lookup has seeded the form
    seeded: bool,
    /// The user has typed into any field
    edited: bool,
    /// The city name was typed since the current lookup began
    city_edited: bool,
}

impl<G: GeocodeBackend + 'static> TripEntryController<G> {
    /// Start a session; `default_visit_date` pre-fills the date field
    pub fn new(geocoder: G, default_visit_date: DateTime<Utc>) -> Self {
        Self {
            geocoder: Arc::new(geocoder),
            state: TripEntryState::new(default_visit_date),
            last_ticket: 0,
            pending: None,
            seeded: false,
            edited: false,
            city_edited: false,
        }
    }

    pub fn state(&self) -> &TripEntryState {
        &self.state
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// React to the currently selected coordinates
    ///
    /// Returns a ticket when a lookup must run. The same pair observed twice
    /// in a row yields nothing the second time. An absent pair returns to
    /// Idle, orphans any lookup still in flight and drops what the last
    /// lookup seeded; a city name typed since then is kept.
    pub fn observe(&mut self, pair: CoordinatePair) -> Option<LookupTicket> {
        if pair == self.state.coordinates {
            return None;
        }

        self.state.coordinates = pair;
        self.state.lookup_error = None;
        self.pending = None;

        let Some(coords) = pair.resolved() else {
            debug!("no point selected");
            self.state.lookup_status = LookupStatus::Idle;
            self.unseed();
            return None;
        };

        if let Err(e) = coords.validate() {
            warn!(error = %e, "ignoring out of range coordinates");
            self.state.lookup_status = LookupStatus::Error;
            self.state.lookup_error = Some(e.to_string());
            return None;
        }

        self.last_ticket += 1;
        self.pending = Some(self.last_ticket);
        self.city_edited = false;
        self.state.lookup_status = LookupStatus::Loading;

        debug!(ticket = self.last_ticket, lat = coords.lat, lng = coords.lng, "lookup started");
        Some(LookupTicket {
            id: self.last_ticket,
            coords,
        })
    }

    /// Run the reverse geocoding call for a ticket
    ///
    /// The returned future holds its own handle on the geocoder and can be
    /// spawned or awaited while the controller keeps taking input.
    pub fn lookup(
        &self,
        ticket: LookupTicket,
    ) -> impl Future<Output = LookupOutcome> + Send + 'static {
        let geocoder = Arc::clone(&self.geocoder);
        async move {
            let result = geocoder.reverse_geocode(ticket.coords).await;
            LookupOutcome { ticket, result }
        }
    }

    /// Apply a finished lookup
    ///
    /// Only the most recently issued ticket is applied, and only once.
    /// Returns false when the outcome was discarded as stale.
    pub fn apply(&mut self, outcome: LookupOutcome) -> bool {
        let LookupOutcome { ticket, result } = outcome;

        if self.pending != Some(ticket.id) {
            debug!(ticket = ticket.id, "discarding stale lookup result");
            return false;
        }
        self.pending = None;

        let seeded = result.and_then(|place| {
            let flag = encode_flag(&place.country_code)?;
            Ok((place, flag))
        });

        match seeded {
            Ok((place, flag)) => self.seed(place, flag),
            Err(e) => {
                warn!(
                    ticket = ticket.id,
                    lat = ticket.coords.lat,
                    lng = ticket.coords.lng,
                    error = ?e,
                    "lookup failed"
                );
                self.state.lookup_status = LookupStatus::Error;
                self.state.lookup_error = Some(e.to_string());
            }
        }
        true
    }

    /// Observe, look up and apply in one go
    ///
    /// Returns true when a lookup ran and its result was applied.
    pub async fn set_coordinates(&mut self, pair: CoordinatePair) -> bool {
        let Some(ticket) = self.observe(pair) else {
            return false;
        };
        let outcome = self.lookup(ticket).await;
        self.apply(outcome)
    }

    fn seed(&mut self, place: GeocodeResult, flag: String) {
        info!(city = %place.city_name, country = %place.country_name, "location resolved");

        if self.city_edited {
            debug!(kept = %self.state.city_name, "city name edited during lookup, not seeding it");
        } else {
            self.state.city_name = place.city_name;
        }
        self.state.country = place.country_name;
        self.state.flag = flag;
        self.state.lookup_status = LookupStatus::Idle;
        self.seeded = true;
    }

    fn unseed(&mut self) {
        if !self.seeded {
            return;
        }
        if !self.city_edited {
            self.state.city_name.clear();
        }
        self.state.country.clear();
        self.state.flag.clear();
        self.seeded = false;
    }

    pub fn set_city_name(&mut self, city_name: impl Into<String>) {
        self.state.city_name = city_name.into();
        self.city_edited = true;
        self.edited = true;
    }

    /// Set the visit date; None marks the typed date as invalid
    pub fn set_visit_date(&mut self, visit_date: Option<DateTime<Utc>>) {
        self.state.visit_date = visit_date;
        self.edited = true;
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.state.notes = notes.into();
        self.edited = true;
    }

    /// What should be presented right now
    pub fn view(&self) -> TripEntryView<'_> {
        match self.state.lookup_status {
            LookupStatus::Loading => TripEntryView::Loading,
            LookupStatus::Error => {
                TripEntryView::Error(self.state.lookup_error.as_deref().unwrap_or_default())
            }
            LookupStatus::Idle if !self.seeded && !self.edited => {
                TripEntryView::AwaitingSelection
            }
            LookupStatus::Idle => TripEntryView::Form(&self.state),
        }
    }

    /// Idle with something to show: a seeded lookup or user input
    pub fn is_ready(&self) -> bool {
        self.state.lookup_status == LookupStatus::Idle && (self.seeded || self.edited)
    }

    /// Validate the entry and hand it to the sink
    ///
    /// Validation failures return before the sink is touched. Sink errors
    /// come back exactly as the sink produced them. The session state is left
    /// as is; tearing it down is up to the caller.
    pub async fn submit<S: RecordSink>(&self, sink: &S) -> Result<TripRecord> {
        let record = self.state.to_record().map_err(|e| {
            debug!(error = %e, "submission rejected");
            e
        })?;

        info!(city = %record.city_name, date = %record.visit_date, "submitting trip");
        sink.create(&record).await?;

        Ok(record)
    }
}
