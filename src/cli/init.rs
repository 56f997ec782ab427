use std::path::PathBuf;

use clap::Parser;
use packlist::{InitOutcome, Store};
use tracing::instrument;

use super::{WeatherArgs, open_engine, resolve_trip, terminal::Colorize};

#[derive(Debug, Parser)]
pub struct Init {
    /// The trip, by id or name
    trip: String,

    #[command(flatten)]
    weather: WeatherArgs,
}

impl Init {
    #[instrument]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let engine = open_engine(root, &self.weather)?;
        let trip = resolve_trip(engine.store(), &self.trip)?;

        report(engine.initialize_list(trip)?);
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Reset {
    /// The trip, by id or name
    trip: String,

    /// Skip the confirmation prompt
    #[arg(long, short)]
    yes: bool,

    #[command(flatten)]
    weather: WeatherArgs,
}

impl Reset {
    #[instrument]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let engine = open_engine(root, &self.weather)?;
        let trip = resolve_trip(engine.store(), &self.trip)?;

        if !self.yes {
            let name = engine.store().trip(trip)?.name;
            let items = engine.store().items(trip)?.len();
            eprintln!(
                "{}",
                format!("⚠️  This removes all {items} items from '{name}', including custom ones,")
                    .warning()
            );
            eprintln!("{}", "   and forgets every dismissed suggestion.".warning());

            let proceed = dialoguer::Confirm::new()
                .with_prompt("Proceed?")
                .default(false)
                .interact()?;
            if !proceed {
                println!("Cancelled");
                return Ok(());
            }
        }

        report(engine.force_reinitialize(trip)?);
        Ok(())
    }
}

fn report(outcome: InitOutcome) {
    match outcome {
        InitOutcome::AlreadyInitialized => {
            println!("{}", "List is already up to date".dim());
        }
        InitOutcome::NothingToAdd { context } => {
            println!(
                "{}",
                format!(
                    "⚠️  No catalog item fits a {} {} trip, the list was left empty",
                    context.season, context.camping_style
                )
                .warning()
            );
        }
        InitOutcome::Initialized { added, context } => {
            println!(
                "{}",
                format!("✅ Added {} items", added.len()).success()
            );
            println!(
                "{}",
                format!(
                    "   {}, {}, {}",
                    context.season, context.temperature_band, context.camping_style
                )
                .dim()
            );
            for item in added {
                match item.added_reason {
                    Some(reason) => println!("  • {} {}", item.name, format!("({reason})").dim()),
                    None => println!("  • {}", item.name),
                }
            }
        }
    }
}
