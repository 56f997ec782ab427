use std::path::PathBuf;

use clap::Parser;
use packlist::{NewItem, Store, TripId, domain::ItemId};
use tracing::instrument;

use super::{WeatherArgs, open_engine, resolve_trip, terminal::Colorize};

/// Resolves an item given by id or by a unique prefix of its id.
fn resolve_item(store: &impl Store, trip: TripId, reference: &str) -> anyhow::Result<ItemId> {
    if let Ok(id) = reference.parse::<ItemId>() {
        return Ok(id);
    }

    let matches: Vec<_> = store
        .items(trip)?
        .into_iter()
        .map(|item| item.id)
        .filter(|id| id.to_string().starts_with(reference))
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => anyhow::bail!("no item with id '{reference}'"),
        _ => anyhow::bail!("'{reference}' matches {} items", matches.len()),
    }
}

#[derive(Debug, Parser)]
pub struct Add {
    /// The trip, by id or name
    trip: String,

    /// The name of the item
    name: String,

    /// Category id or label. Unknown categories are filed under 'other'.
    #[arg(long, short)]
    category: Option<String>,

    /// Number of units to pack
    #[arg(long, short, default_value_t = 1)]
    qty: u32,
}

impl Add {
    #[instrument]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let engine = open_engine(root, &WeatherArgs::default())?;
        let trip = resolve_trip(engine.store(), &self.trip)?;

        let mut new = NewItem::named(self.name).with_qty(self.qty);
        new.category = self.category;
        let item = engine.add_custom_item(trip, new)?;

        println!(
            "{}",
            format!("✅ Added {} × {} to {}", item.qty, item.name, item.category_id).success()
        );
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Pack {
    /// The trip, by id or name
    trip: String,

    /// The item id, or a unique prefix of it
    item: String,
}

impl Pack {
    #[instrument]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let engine = open_engine(root, &WeatherArgs::default())?;
        let trip = resolve_trip(engine.store(), &self.trip)?;
        let id = resolve_item(engine.store(), trip, &self.item)?;

        let item = engine.toggle_packed(trip, id)?;
        if item.packed {
            println!("{}", format!("Packed {}", item.name).success());
        } else {
            println!("{}", format!("Unpacked {}", item.name).dim());
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Qty {
    /// The trip, by id or name
    trip: String,

    /// The item id, or a unique prefix of it
    item: String,

    /// The new quantity, at least 1
    qty: u32,
}

impl Qty {
    #[instrument]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let engine = open_engine(root, &WeatherArgs::default())?;
        let trip = resolve_trip(engine.store(), &self.trip)?;
        let id = resolve_item(engine.store(), trip, &self.item)?;

        let item = engine.update_quantity(trip, id, self.qty)?;
        println!("{} × {}", item.qty, item.name);
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Remove {
    /// The trip, by id or name
    trip: String,

    /// The item id, or a unique prefix of it
    item: String,
}

impl Remove {
    #[instrument]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let engine = open_engine(root, &WeatherArgs::default())?;
        let trip = resolve_trip(engine.store(), &self.trip)?;
        let id = resolve_item(engine.store(), trip, &self.item)?;

        engine.delete_item(trip, id)?;
        println!("{}", "Removed".dim());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use packlist::{
        MemoryStore, Trip, TripDetails,
        domain::TripPackingItem,
        storage::{Transaction, Write},
    };

    use super::*;

    #[test]
    fn items_resolve_by_unique_prefix() {
        let store = MemoryStore::new();
        let trip = Trip::new("Glacier", TripDetails::default());
        let trip_id = trip.id;
        store.create_trip(trip).unwrap();
        let item = TripPackingItem::custom("Rope".into(), "other".into(), 1);
        store
            .commit(trip_id, Transaction::new().write(Write::PutItem(item.clone())))
            .unwrap();

        let full = item.id.to_string();
        assert_eq!(resolve_item(&store, trip_id, &full).unwrap(), item.id);
        assert_eq!(resolve_item(&store, trip_id, &full[..8]).unwrap(), item.id);
        assert!(resolve_item(&store, trip_id, "zzz").is_err());
    }
}
