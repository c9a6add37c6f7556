//! Trips command handler
//!
//! View and manage saved trips.

use crate::config::Config;
use crate::error::Result;
use crate::store::{StoredTrip, TripStore};
use clap::{Args, Subcommand};

/// Trips command arguments
#[derive(Args)]
pub struct TripsArgs {
    #[command(subcommand)]
    pub command: Option<TripsCommand>,

    /// Number of trips to show (default: 10)
    #[arg(short = 'n', long, default_value = "10")]
    pub count: usize,
}

/// Trips subcommands
#[derive(Subcommand)]
pub enum TripsCommand {
    /// List saved trips
    List {
        /// Number of trips to show
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,
    },
    /// Show a specific trip
    Show {
        /// Trip ID (a unique prefix is enough)
        id: String,
    },
    /// Delete a trip
    Delete {
        /// Trip ID (a unique prefix is enough)
        id: String,
    },
    /// Delete all trips
    Clear,
}

/// Run the trips command
pub fn run(args: TripsArgs) -> Result<()> {
    let config = Config::load()?;
    let mut store = TripStore::load_from(config.trips_path()?)?;
    let date_format = config.display.date_format.as_str();

    match args.command.unwrap_or(TripsCommand::List { count: args.count }) {
        TripsCommand::List { count } => list_trips(&store, count, date_format),
        TripsCommand::Show { id } => show_trip(store.find(&id)?, date_format),
        TripsCommand::Delete { id } => {
            let full_id = store.find(&id)?.id.clone();
            store.remove(&full_id);
            store.save()?;
            println!("Deleted trip: {}", full_id);
        }
        TripsCommand::Clear => {
            let count = store.len();
            store.clear();
            store.save()?;
            println!("Cleared {} trips.", count);
        }
    }

    Ok(())
}

/// List recent trips
fn list_trips(store: &TripStore, count: usize, date_format: &str) {
    if store.is_empty() {
        println!("No trips saved.");
        return;
    }

    println!("Recent trips ({} of {}):\n", count.min(store.len()), store.len());

    for trip in store.recent(count) {
        println!(
            "  {} - {} {}, {}\n    Visited {}\n",
            short_id(trip),
            trip.record.flag,
            trip.record.city_name,
            trip.record.country,
            trip.record.visit_date.format(date_format)
        );
    }
}

/// Show one trip in full
fn show_trip(trip: &StoredTrip, date_format: &str) {
    let record = &trip.record;

    println!("Trip: {} {}", record.flag, record.city_name);
    println!("ID: {}", trip.id);
    println!("Saved: {}", trip.created_at.to_rfc3339());
    println!("\nCountry: {}", record.country);
    println!("Visited: {}", record.visit_date.format(date_format));
    match record.coordinates.resolved() {
        Some(coords) => println!("Position: ({}, {})", coords.lat, coords.lng),
        None => println!("Position: (unknown)"),
    }

    if !record.notes.is_empty() {
        println!("\nNotes: {}", record.notes);
    }
}

fn short_id(trip: &StoredTrip) -> &str {
    trip.id.get(..8).unwrap_or(&trip.id)
}
