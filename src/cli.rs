use std::{path::PathBuf, sync::Arc};

mod catalog;
mod init;
mod items;
mod show;
mod suggest;
mod terminal;
mod trip;

use anyhow::Context as _;
use catalog::Catalog;
use clap::ArgAction;
use init::{Init, Reset};
use items::{Add, Pack, Qty, Remove};
use packlist::{
    Directory, PackingEngine, Store, TripId,
    domain::{FixedWeather, Observation, Precipitation},
};
use show::{Context, Show};
use suggest::{Accept, Dismiss, Suggest};
use trip::TripCommand;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the root of the packing list directory
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);
        self.command.run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Create and list trips
    #[command(subcommand)]
    Trip(TripCommand),

    /// Show the context a trip's list is built for
    Context(Context),

    /// Build a trip's packing list from the catalog
    ///
    /// Does nothing if the list is already in sync with the catalog.
    Init(Init),

    /// Discard a trip's list and suggestion decisions and build it again
    Reset(Reset),

    /// Show suggestions for a trip
    Suggest(Suggest),

    /// Add a suggested item to a trip's list
    Accept(Accept),

    /// Dismiss a suggestion
    Dismiss(Dismiss),

    /// Add a custom item to a trip's list
    Add(Add),

    /// Toggle whether an item is packed
    Pack(Pack),

    /// Change the quantity of an item
    Qty(Qty),

    /// Remove an item from a trip's list
    Remove(Remove),

    /// Show a trip's packing list, grouped by category
    Show(Show),

    /// Show the gear catalog
    Catalog(Catalog),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Trip(command) => command.run(root)?,
            Self::Context(command) => command.run(root)?,
            Self::Init(command) => command.run(root)?,
            Self::Reset(command) => command.run(root)?,
            Self::Suggest(command) => command.run(root)?,
            Self::Accept(command) => command.run(root)?,
            Self::Dismiss(command) => command.run(root)?,
            Self::Add(command) => command.run(root)?,
            Self::Pack(command) => command.run(root)?,
            Self::Qty(command) => command.run(root)?,
            Self::Remove(command) => command.run(root)?,
            Self::Show(command) => command.run(root)?,
            Self::Catalog(command) => command.run(root)?,
        }
        Ok(())
    }
}

/// Weather conditions to assume instead of the calm, dry defaults.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct WeatherArgs {
    /// Assume strong wind
    #[arg(long)]
    windy: bool,

    /// Assume precipitation (none, rain, snow)
    #[arg(long, value_name = "KIND")]
    precipitation: Option<Precipitation>,
}

impl WeatherArgs {
    fn observation(&self) -> Option<Observation> {
        (self.windy || self.precipitation.is_some()).then(|| Observation {
            windy: self.windy,
            precipitation: self.precipitation.unwrap_or_default(),
            temperature_band: None,
        })
    }
}

/// Opens the directory at `root` and builds an engine from its configuration
/// and catalog.
fn open_engine(root: PathBuf, weather: &WeatherArgs) -> anyhow::Result<PackingEngine<Directory>> {
    let directory = Directory::open(root).context("failed to open packing list directory")?;
    let config = directory.load_config();
    let catalog = directory
        .load_catalog(&config)
        .context("failed to load catalog")?;

    let engine = PackingEngine::new(directory, Arc::new(catalog), config);
    Ok(match weather.observation() {
        Some(observation) => engine.with_weather(FixedWeather(observation)),
        None => engine,
    })
}

/// Resolves a trip given by id or by exact name.
fn resolve_trip(store: &impl Store, reference: &str) -> anyhow::Result<TripId> {
    if let Ok(id) = reference.parse::<TripId>() {
        return Ok(id);
    }

    let matches: Vec<_> = store
        .trips()?
        .into_iter()
        .filter(|trip| trip.name == reference)
        .collect();

    match matches.as_slice() {
        [trip] => Ok(trip.id),
        [] => anyhow::bail!("no trip named '{reference}'"),
        _ => anyhow::bail!(
            "{} trips are named '{reference}', use the trip id instead",
            matches.len()
        ),
    }
}

#[cfg(test)]
mod tests {
    use packlist::{MemoryStore, Trip, TripDetails};

    use super::*;

    #[test]
    fn trips_resolve_by_id_or_name() {
        let store = MemoryStore::new();
        let trip = Trip::new("Glacier", TripDetails::default());
        let id = trip.id;
        store.create_trip(trip).unwrap();

        assert_eq!(resolve_trip(&store, "Glacier").unwrap(), id);
        assert_eq!(resolve_trip(&store, &id.to_string()).unwrap(), id);
        assert!(resolve_trip(&store, "Yosemite").is_err());
    }

    #[test]
    fn ambiguous_names_are_rejected() {
        let store = MemoryStore::new();
        store
            .create_trip(Trip::new("Glacier", TripDetails::default()))
            .unwrap();
        store
            .create_trip(Trip::new("Glacier", TripDetails::default()))
            .unwrap();

        assert!(resolve_trip(&store, "Glacier").is_err());
    }

    #[test]
    fn weather_flags_build_an_observation() {
        assert_eq!(WeatherArgs::default().observation(), None);

        let args = WeatherArgs {
            windy: false,
            precipitation: Some(Precipitation::Rain),
        };
        let observation = args.observation().unwrap();
        assert!(!observation.windy);
        assert_eq!(observation.precipitation, Precipitation::Rain);
    }
}
