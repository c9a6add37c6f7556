//! Lookup command handler
//!
//! Resolves a point without saving anything.

use crate::cli::PositionArgs;
use crate::config::Config;
use crate::error::Result;
use crate::flag::encode_flag;
use crate::geo::{get_geocoder, GeocodeBackend, GeocodeResult};
use clap::Args;
use serde::Serialize;

/// Lookup command arguments
#[derive(Args)]
pub struct LookupArgs {
    #[command(flatten)]
    pub position: PositionArgs,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct LookupOutput<'a> {
    #[serde(flatten)]
    place: &'a GeocodeResult,
    flag: &'a str,
}

/// Run the lookup command
pub async fn run(args: LookupArgs) -> Result<()> {
    let config = Config::load()?;

    let coords = args.position.coordinates()?;
    coords.validate()?;

    let place = get_geocoder(&config)?.reverse_geocode(coords).await?;
    let flag = encode_flag(&place.country_code)?;

    if args.json {
        let output = LookupOutput {
            place: &place,
            flag: &flag,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let city = if place.city_name.is_empty() {
            "(no city)"
        } else {
            place.city_name.as_str()
        };
        println!("{} {}, {}", flag, city, place.country_name);
    }

    Ok(())
}
