use std::path::PathBuf;

use clap::Parser;
use packlist::Store;
use tracing::instrument;

use super::{
    WeatherArgs, open_engine, resolve_trip,
    terminal::{Colorize, checkbox},
};

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Parser)]
#[command(about = "Display a trip's packing list grouped by category")]
pub struct Show {
    /// The trip, by id or name
    trip: String,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,

    /// Hide packed items
    #[arg(long)]
    unpacked: bool,
}

impl Show {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let engine = open_engine(root, &WeatherArgs::default())?;
        let trip_id = resolve_trip(engine.store(), &self.trip)?;
        let trip = engine.store().trip(trip_id)?;
        let groups = engine.packing_list(trip_id)?;

        if let OutputFormat::Json = self.output {
            let output = serde_json::json!({
                "trip": trip,
                "needsInitialization": engine.needs_initialization(trip_id)?,
                "groups": groups,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        let packed: usize = groups.iter().map(|group| group.packed_count).sum();
        let total: usize = groups.iter().map(|group| group.total_count).sum();
        println!("# {}", trip.name);
        println!("{}\n", format!("{packed}/{total} packed").dim());

        if engine.needs_initialization(trip_id)? {
            println!(
                "{}\n",
                "⚠️  List is not in sync with the catalog, run 'pack init'".warning()
            );
        }

        for group in groups {
            println!(
                "{} {}",
                group.label.info(),
                format!("({}/{})", group.packed_count, group.total_count).dim()
            );
            for item in group
                .items
                .iter()
                .filter(|item| !(self.unpacked && item.packed))
            {
                let id = item.id.to_string();
                let mut line = format!("  {} {} × {}", checkbox(item.packed), item.qty, item.name);
                if let Some(reason) = &item.added_reason {
                    line.push_str(&format!(" {}", format!("({reason})").dim()));
                }
                println!("{line}  {}", id[..8].dim());
            }
            println!();
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Context {
    /// The trip, by id or name
    trip: String,

    #[command(flatten)]
    weather: WeatherArgs,
}

impl Context {
    #[instrument]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let engine = open_engine(root, &self.weather)?;
        let trip_id = resolve_trip(engine.store(), &self.trip)?;
        let trip = engine.store().trip(trip_id)?;
        let context = engine.resolve_context(trip_id)?;

        println!("# {}", trip.name);
        if let Some(location) = &context.location_name {
            println!("  Location:      {location}");
        }
        println!("  Season:        {}", context.season);
        println!("  Temperature:   {}", context.temperature_band);
        println!("  Wind:          {}", context.wind());
        println!("  Precipitation: {}", context.precipitation);
        println!("  Style:         {}", context.camping_style);

        if let Some(weather) = trip.weather {
            println!();
            println!(
                "{}",
                format!(
                    "Last observed {}: {}, {}",
                    weather.observed_at.format("%Y-%m-%d %H:%M"),
                    if weather.windy { "windy" } else { "calm" },
                    weather.precipitation
                )
                .dim()
            );
        }

        let marker = trip.marker;
        println!();
        if marker.is_current(engine.catalog().version()) {
            println!("{}", format!("Built from catalog v{}", marker.version).success());
        } else if marker.initialized {
            println!(
                "{}",
                format!(
                    "Built from catalog v{}, current is v{}",
                    marker.version,
                    engine.catalog().version()
                )
                .warning()
            );
        } else {
            println!("{}", "Not initialized".warning());
        }
        Ok(())
    }
}
