use std::path::PathBuf;

use clap::Parser;
use packlist::{
    Directory, PackingEngine, TripId,
    domain::{LibraryItemId, reason},
};
use tracing::instrument;

use super::{WeatherArgs, open_engine, resolve_trip, terminal::Colorize};

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Parser)]
pub struct Suggest {
    /// The trip, by id or name
    trip: String,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,

    #[command(flatten)]
    weather: WeatherArgs,
}

impl Suggest {
    #[instrument]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let engine = open_engine(root, &self.weather)?;
        let trip = resolve_trip(engine.store(), &self.trip)?;
        let suggestions = engine.compute_suggestions(trip)?;

        match self.output {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&suggestions)?);
            }
            OutputFormat::Pretty => {
                if suggestions.is_empty() {
                    println!("{}", "No suggestions for this trip".dim());
                    return Ok(());
                }
                for suggestion in suggestions {
                    println!(
                        "{} {}  {}",
                        format!("[{}]", suggestion.priority).info(),
                        suggestion.name,
                        suggestion.reason.dim()
                    );
                    println!("    {}", suggestion.library_item_id.to_string().dim());
                    if let Some(notes) = suggestion.notes {
                        println!("    {notes}");
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Accept {
    /// The trip, by id or name
    trip: String,

    /// The id of the suggested catalog item
    library_id: String,

    /// Why the item was added. Defaults to the suggestion's reason.
    #[arg(long)]
    reason: Option<String>,

    #[command(flatten)]
    weather: WeatherArgs,
}

impl Accept {
    #[instrument]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let engine = open_engine(root, &self.weather)?;
        let trip = resolve_trip(engine.store(), &self.trip)?;
        let id = LibraryItemId::new(self.library_id);

        let reason = match self.reason {
            Some(reason) => reason,
            None => default_reason(&engine, trip, &id)?,
        };
        let item = engine.accept_suggestion(trip, &id, reason)?;

        println!(
            "{}",
            format!("✅ Added {} × {}", item.qty, item.name).success()
        );
        Ok(())
    }
}

/// The reason the engine currently gives for suggesting the item.
fn default_reason(
    engine: &PackingEngine<Directory>,
    trip: TripId,
    id: &LibraryItemId,
) -> anyhow::Result<String> {
    let Some(item) = engine.catalog().item(id) else {
        return Ok(reason::GENERIC_REASON.to_string());
    };
    let context = engine.resolve_context(trip)?;
    Ok(reason::suggestion_reason(item, &context))
}

#[derive(Debug, Parser)]
pub struct Dismiss {
    /// The trip, by id or name
    trip: String,

    /// The id of the suggested catalog item
    library_id: String,
}

impl Dismiss {
    #[instrument]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let engine = open_engine(root, &WeatherArgs::default())?;
        let trip = resolve_trip(engine.store(), &self.trip)?;
        let id = LibraryItemId::new(self.library_id);

        engine.dismiss_suggestion(trip, &id)?;

        let name = engine
            .catalog()
            .item(&id)
            .map_or_else(|| id.to_string(), |item| item.name.clone());
        println!("{}", format!("Dismissed {name}").dim());
        Ok(())
    }
}
