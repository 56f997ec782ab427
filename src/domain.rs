//! Domain models for packing lists.
//!
//! This module contains the gear catalog, trip context derivation, the
//! matcher that selects items for a context, and the per-trip entities the
//! engine persists.

/// The gear library and its matching facets.
pub mod catalog;
pub use catalog::{Catalog, CatalogError, Category, LibraryItem, LibraryItemId};

mod config;
pub use config::Config;

/// Facet values and trip context derivation.
pub mod context;
pub use context::{CampingStyle, Precipitation, Season, TemperatureBand, TripContext};

mod item;
pub use item::{
    ItemId, ItemSource, NewItem, SuggestionRecord, SuggestionStatus, TripPackingItem,
};

/// Selection of catalog items for a trip context.
pub mod matcher;
pub use matcher::Matcher;

/// Explanations shown next to context-matched items.
pub mod reason;

mod trip;
pub use trip::{InitMarker, Trip, TripDetails, TripId, WeatherSnapshot};

/// Optional weather enrichment.
pub mod weather;
pub use weather::{FixedWeather, Observation, WeatherSource};
