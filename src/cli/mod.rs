//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod add;
pub mod config;
pub mod lookup;
pub mod trips;

use crate::coord::{CoordinatePair, Coordinates};
use crate::error::{Error, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Record visited cities from map coordinates
#[derive(Parser)]
#[command(name = "trip-log")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a point to its city and country
    Lookup(lookup::LookupArgs),

    /// Resolve a point and save it as a visited city
    Add(add::AddArgs),

    /// View and manage saved trips
    Trips(trips::TripsArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Selected map position, as a pair of numbers or a URL query string
#[derive(Args, Debug, Clone)]
pub struct PositionArgs {
    /// Latitude
    #[arg(long, allow_hyphen_values = true, requires = "lng")]
    pub lat: Option<f64>,

    /// Longitude
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    pub lng: Option<f64>,

    /// Map URL or query string carrying lat= and lng=
    #[arg(long, conflicts_with_all = ["lat", "lng"])]
    pub position: Option<String>,
}

impl PositionArgs {
    /// The pair as given; absent halves stay absent
    pub fn pair(&self) -> CoordinatePair {
        match &self.position {
            Some(query) => CoordinatePair::from_query(query),
            None => CoordinatePair {
                latitude: self.lat,
                longitude: self.lng,
            },
        }
    }

    /// Both halves, or an error telling the user how to give them
    pub fn coordinates(&self) -> Result<Coordinates> {
        self.pair().resolved().ok_or_else(|| {
            Error::InvalidCoordinates(
                "No position given. Use --lat/--lng or --position".to_string(),
            )
        })
    }
}

/// Install the tracing subscriber on stderr
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Lookup(args) => lookup::run(args).await,
        Commands::Add(args) => add::run(args).await,
        Commands::Trips(args) => trips::run(args),
        Commands::Config(args) => config::run(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_position_from_numbers() {
        let cli = Cli::try_parse_from(["trip-log", "lookup", "--lat", "-23.55", "--lng", "-46.63"]).unwrap();
        let Commands::Lookup(args) = cli.command else {
            panic!("expected lookup");
        };
        let coords = args.position.coordinates().unwrap();
        assert_eq!(coords, Coordinates::new(-23.55, -46.63));
    }

    #[test]
    fn test_position_from_query() {
        let cli = Cli::try_parse_from([
            "trip-log",
            "add",
            "--position",
            "http://localhost:5173/app/form?lat=48.85&lng=2.35",
        ])
        .unwrap();
        let Commands::Add(args) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(args.position.pair(), CoordinatePair::new(48.85, 2.35));
    }

    #[test]
    fn test_position_required_halves() {
        assert!(Cli::try_parse_from(["trip-log", "lookup", "--lat", "1"]).is_err());

        let cli = Cli::try_parse_from(["trip-log", "lookup", "--position", "?lat=1"]).unwrap();
        let Commands::Lookup(args) = cli.command else {
            panic!("expected lookup");
        };
        assert!(matches!(
            args.position.coordinates(),
            Err(Error::InvalidCoordinates(_))
        ));
    }
}
