use std::path::PathBuf;

use clap::Parser;
use packlist::domain::{
    CampingStyle, LibraryItem,
    catalog::{FacetSet, Tags},
    context::Facet,
};
use tracing::instrument;

use super::{WeatherArgs, open_engine, terminal::Colorize};

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Parser)]
pub struct Catalog {
    /// Only show items allowed for this camping style
    #[arg(long)]
    style: Option<CampingStyle>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

impl Catalog {
    #[instrument]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let engine = open_engine(root, &WeatherArgs::default())?;
        let catalog = engine.catalog();
        let include_premium = engine.config().include_premium;

        let visible = |item: &&LibraryItem| {
            (include_premium || !item.premium)
                && self
                    .style
                    .is_none_or(|style| item.tags.camping_styles.allows(style))
        };

        if let OutputFormat::Json = self.output {
            let items: Vec<_> = catalog.items().iter().filter(visible).collect();
            let output = serde_json::json!({
                "version": catalog.version(),
                "categories": catalog.categories(),
                "items": items,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        println!("{}\n", format!("Catalog v{}", catalog.version()).dim());
        for category in catalog.categories() {
            let items: Vec<_> = catalog
                .items()
                .iter()
                .filter(|item| item.category_id == category.id)
                .filter(visible)
                .collect();
            if items.is_empty() {
                continue;
            }

            println!("{}", category.label.info());
            for item in items {
                let marker = if item.base { "base" } else { "    " };
                println!(
                    "  [{}] {} {}  {}",
                    item.priority,
                    marker.dim(),
                    item.name,
                    describe(&item.tags).dim()
                );
                println!("         {}", item.id.to_string().dim());
            }
            println!();
        }
        Ok(())
    }
}

/// A short description of the weather facets an item is tagged with.
fn describe(tags: &Tags) -> String {
    fn facet<T: Facet>(set: &FacetSet<T>) -> Option<String> {
        if set.is_any() {
            return None;
        }
        let values: Vec<_> = T::ALL
            .iter()
            .filter(|value| set.hits(**value))
            .map(|value| value.as_str())
            .collect();
        Some(values.join("/"))
    }

    let parts: Vec<_> = [
        facet(&tags.seasons),
        facet(&tags.temperature_bands),
        facet(&tags.wind),
        facet(&tags.precipitation),
    ]
    .into_iter()
    .flatten()
    .collect();

    if parts.is_empty() {
        "any conditions".to_string()
    } else {
        parts.join(", ")
    }
}
