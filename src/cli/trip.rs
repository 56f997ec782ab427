use std::path::PathBuf;

use anyhow::Context as _;
use chrono::NaiveDate;
use clap::Parser;
use packlist::{Directory, Store, Trip, TripDetails, domain::CampingStyle};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, clap::Subcommand)]
pub enum TripCommand {
    /// Create a trip
    Add(AddTrip),

    /// List every trip
    List,
}

impl TripCommand {
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let directory = Directory::open(root).context("failed to open packing list directory")?;
        match self {
            Self::Add(command) => command.run(&directory),
            Self::List => list(&directory),
        }
    }
}

#[derive(Debug, Parser)]
pub struct AddTrip {
    /// The name of the trip
    name: String,

    /// The first day of the trip (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_name = "DATE")]
    start: Option<NaiveDate>,

    /// Approximate latitude of the destination, negative in the southern
    /// hemisphere
    #[arg(long, allow_negative_numbers = true)]
    latitude: Option<f64>,

    /// How the party camps (carCamping, backpacking, hammock, rv)
    #[arg(long)]
    style: Option<CampingStyle>,

    /// A label for the destination
    #[arg(long)]
    location: Option<String>,
}

impl AddTrip {
    #[instrument(skip(directory))]
    fn run(self, directory: &Directory) -> anyhow::Result<()> {
        let trip = Trip::new(
            self.name,
            TripDetails {
                start_date: self.start,
                latitude: self.latitude,
                camping_style: self.style,
                location_name: self.location,
            },
        );
        let id = trip.id;
        let name = trip.name.clone();
        directory.create_trip(trip)?;

        println!("{}", format!("✅ Created trip '{name}'").success());
        println!("{}", format!("   {id}").dim());
        println!();
        println!("Next steps:");
        println!("  pack init \"{name}\"");
        Ok(())
    }
}

fn list(directory: &Directory) -> anyhow::Result<()> {
    let trips = directory.trips()?;
    if trips.is_empty() {
        println!("{}", "No trips yet. Create one with 'pack trip add'.".dim());
        return Ok(());
    }

    for trip in trips {
        let start = trip
            .details
            .start_date
            .map_or_else(|| "no date".to_string(), |date| date.to_string());
        let style = trip
            .details
            .camping_style
            .map_or_else(|| "default style".to_string(), |style| style.to_string());
        let state = if trip.marker.initialized {
            format!("v{}", trip.marker.version).success()
        } else {
            "not initialized".warning()
        };

        println!("{}  {}", trip.id.to_string().dim(), trip.name);
        println!("    {start}, {style}, {state}");
    }
    Ok(())
}
