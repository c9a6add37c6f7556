//! Add command handler
//!
//! Runs one trip entry session from the command line: resolve the point,
//! apply the edits given as flags, then save.

use crate::cli::PositionArgs;
use crate::config::Config;
use crate::coord::CoordinatePair;
use crate::error::{Error, Result};
use crate::geo::{get_geocoder, GeocodeBackend};
use crate::store::FileSink;
use crate::trip::{parse_visit_date, LookupOutcome, TripEntryController, TripEntryState};
use chrono::Utc;
use clap::Args;

/// Add command arguments
#[derive(Args)]
pub struct AddArgs {
    #[command(flatten)]
    pub position: PositionArgs,

    /// City name (replaces the resolved one)
    #[arg(long, short = 'c')]
    pub city: Option<String>,

    /// Visit date (display.date_format, or YYYY-MM-DD); defaults to today
    #[arg(long, short = 'd')]
    pub date: Option<String>,

    /// Notes about the trip
    #[arg(long, short = 'n')]
    pub notes: Option<String>,

    /// Show the record without saving it
    #[arg(long)]
    pub dry_run: bool,
}

/// Run the add command
pub async fn run(args: AddArgs) -> Result<()> {
    let config = Config::load()?;

    let mut controller = TripEntryController::new(get_geocoder(&config)?, Utc::now());
    resolve(&mut controller, args.position.pair()).await?;

    if let Some(city) = args.city {
        controller.set_city_name(city);
    }
    if let Some(date) = &args.date {
        let visit_date = parse_visit_date(date, &config.display.date_format)?;
        controller.set_visit_date(Some(visit_date));
    }
    if let Some(notes) = args.notes {
        controller.set_notes(notes);
    }

    print_entry(controller.state(), &config.display.date_format);

    if args.dry_run {
        let record = controller.state().to_record()?;
        println!("\n{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    let path = config.trips_path()?;
    let record = controller.submit(&FileSink::new(&path)).await?;

    println!("\nSaved {} {} to {}", record.flag, record.city_name, path.display());
    Ok(())
}

/// Look up the position and seed the session, returning any lookup failure
async fn resolve<G: GeocodeBackend + 'static>(
    controller: &mut TripEntryController<G>,
    pair: CoordinatePair,
) -> Result<()> {
    let Some(coords) = pair.resolved() else {
        return Err(Error::InvalidCoordinates(
            "No position given. Use --lat/--lng or --position".to_string(),
        ));
    };
    coords.validate()?;

    if let Some(ticket) = controller.observe(pair) {
        let (ticket, result) = controller.lookup(ticket).await.into_parts();
        let place = result?;
        controller.apply(LookupOutcome::new(ticket, Ok(place)));
        if !controller.is_ready() {
            // the answer carried a country code no flag can be made from
            return Err(Error::NotACity);
        }
    }
    Ok(())
}

/// Print the entry as it will be saved
fn print_entry(state: &TripEntryState, date_format: &str) {
    let city = if state.city_name.is_empty() {
        "(none, use --city)"
    } else {
        state.city_name.as_str()
    };
    let date = state
        .visit_date
        .map(|d| d.format(date_format).to_string())
        .unwrap_or_default();

    println!("City:    {} {}", state.flag, city);
    println!("Country: {}", state.country);
    println!("Date:    {}", date);
    if !state.notes.is_empty() {
        println!("Notes:   {}", state.notes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coordinates;
    use crate::geo::GeocodeResult;
    use chrono::TimeZone;

    /// Geocoder giving the same answer for every point
    struct FixedGeocoder(fn() -> Result<GeocodeResult>);

    impl GeocodeBackend for FixedGeocoder {
        async fn reverse_geocode(&self, _coords: Coordinates) -> Result<GeocodeResult> {
            (self.0)()
        }
    }

    fn place(code: &str) -> Result<GeocodeResult> {
        Ok(GeocodeResult {
            city_name: "Porto".to_string(),
            country_name: "Portugal".to_string(),
            country_code: code.to_string(),
        })
    }

    fn controller(answer: fn() -> Result<GeocodeResult>) -> TripEntryController<FixedGeocoder> {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        TripEntryController::new(FixedGeocoder(answer), start)
    }

    #[tokio::test]
    async fn test_resolve_seeds_session() {
        let mut c = controller(|| place("PT"));
        resolve(&mut c, CoordinatePair::new(41.15, -8.61)).await.unwrap();
        assert_eq!(c.state().city_name, "Porto");
        assert_eq!(c.state().flag, "🇵🇹");
    }

    #[tokio::test]
    async fn test_resolve_returns_lookup_error() {
        let mut c = controller(|| Err(Error::NotACity));
        let err = resolve(&mut c, CoordinatePair::new(0.0, -30.0)).await.unwrap_err();
        assert!(matches!(err, Error::NotACity));

        let mut c = controller(|| Err(Error::LookupTransport("connection refused".to_string())));
        let err = resolve(&mut c, CoordinatePair::new(0.0, -30.0)).await.unwrap_err();
        assert_eq!(err.to_string(), "connection refused");
    }

    #[tokio::test]
    async fn test_resolve_rejects_unusable_country_code() {
        let mut c = controller(|| place("P1"));
        let err = resolve(&mut c, CoordinatePair::new(41.15, -8.61)).await.unwrap_err();
        assert!(matches!(err, Error::NotACity));
    }

    #[tokio::test]
    async fn test_resolve_rejects_missing_or_bad_position() {
        let mut c = controller(|| place("PT"));
        assert!(matches!(
            resolve(&mut c, CoordinatePair::absent()).await,
            Err(Error::InvalidCoordinates(_))
        ));
        assert!(matches!(
            resolve(&mut c, CoordinatePair::new(95.0, 0.0)).await,
            Err(Error::InvalidCoordinates(_))
        ));
    }
}
