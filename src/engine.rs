//! The packing list engine.
//!
//! [`PackingEngine`] ties a [`Store`] to a [`Catalog`] and exposes the
//! operations a caller needs: list initialization, suggestions, and edits to
//! the items on a list.

use std::sync::Arc;

use chrono::Utc;

use crate::{
    domain::{
        Catalog, Config, ItemId, LibraryItemId, Matcher, Observation, SuggestionStatus, Trip,
        TripContext, TripId, WeatherSource,
    },
    storage::{Store, StoreError},
};

mod initializer;
mod mutator;
mod suggestions;

pub use initializer::InitOutcome;
pub use mutator::{CategoryGroup, group_items_by_category};
pub use suggestions::Suggestion;

/// A referenced entity does not exist.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NotFound {
    /// No trip with this id.
    #[error("trip {0} not found")]
    Trip(TripId),
    /// No item with this id on the trip's list.
    #[error("item {0} not found")]
    Item(ItemId),
    /// No catalog item with this id.
    #[error("library item {0} not found")]
    LibraryItem(LibraryItemId),
}

/// Input rejected before anything was written.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The item name is empty or only whitespace.
    #[error("item name must not be empty")]
    EmptyName,
    /// The quantity is below one.
    #[error("quantity must be at least 1, got {0}")]
    QuantityTooLow(u32),
}

/// Errors returned by engine operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A referenced entity does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFound),
    /// The input was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The catalog item is already on the trip's list.
    #[error("library item {0} is already on the list")]
    AlreadyOnList(LibraryItemId),
    /// The suggestion was already accepted or dismissed.
    #[error("suggestion {id} was already {status}")]
    SuggestionClosed {
        /// The suggested catalog item.
        id: LibraryItemId,
        /// Its recorded status.
        status: SuggestionStatus,
    },
    /// The store failed. Nothing was written.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for Error {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::TripNotFound(id) => Self::NotFound(NotFound::Trip(id)),
            other => Self::Store(other),
        }
    }
}

/// Builds and maintains trip packing lists.
pub struct PackingEngine<S> {
    store: S,
    catalog: Arc<Catalog>,
    config: Config,
    weather: Option<Box<dyn WeatherSource>>,
}

impl<S> std::fmt::Debug for PackingEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackingEngine")
            .field("catalog_version", &self.catalog.version())
            .field("config", &self.config)
            .field("weather", &self.weather.is_some())
            .finish_non_exhaustive()
    }
}

impl<S: Store> PackingEngine<S> {
    /// Creates an engine without weather enrichment.
    #[must_use]
    pub fn new(store: S, catalog: Arc<Catalog>, config: Config) -> Self {
        Self {
            store,
            catalog,
            config,
            weather: None,
        }
    }

    /// Enriches trip contexts with observations from `source`.
    #[must_use]
    pub fn with_weather(mut self, source: impl WeatherSource + 'static) -> Self {
        self.weather = Some(Box::new(source));
        self
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The catalog lists are built from.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The engine configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Derives the current context of a trip.
    ///
    /// # Errors
    ///
    /// Returns an error if the trip cannot be read.
    pub fn resolve_context(&self, trip_id: TripId) -> Result<TripContext, Error> {
        let trip = self.store.trip(trip_id)?;
        Ok(self.context_for(&trip).0)
    }

    fn matcher(&self) -> Matcher<'_> {
        Matcher::new(&self.catalog).include_premium(self.config.include_premium)
    }

    fn context_for(&self, trip: &Trip) -> (TripContext, Option<Observation>) {
        let today = Utc::now().date_naive();
        let date = trip.details.start_date.unwrap_or(today);

        let observation = self.weather.as_ref().and_then(|source| {
            match source.observe(&trip.details, date) {
                Ok(observation) => {
                    if observation.is_none() {
                        tracing::debug!(trip = %trip.id, "no weather data, using defaults");
                    }
                    observation
                }
                Err(e) => {
                    tracing::warn!(trip = %trip.id, "{e}, using default conditions");
                    None
                }
            }
        });

        let context = TripContext::resolve(
            &trip.details,
            observation.as_ref(),
            today,
            self.config.default_camping_style,
        );
        (context, observation)
    }
}

fn validate_qty(qty: u32) -> Result<(), ValidationError> {
    if qty == 0 {
        Err(ValidationError::QuantityTooLow(qty))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        domain::{
            CampingStyle, FixedWeather, NewItem, Precipitation, Season, TemperatureBand,
            TripDetails,
            weather::WeatherError,
        },
        storage::MemoryStore,
    };

    pub(super) fn engine() -> PackingEngine<MemoryStore> {
        PackingEngine::new(
            MemoryStore::new(),
            Arc::new(Catalog::builtin()),
            Config::default(),
        )
    }

    pub(super) fn january_backpacking() -> TripDetails {
        TripDetails {
            start_date: NaiveDate::from_ymd_opt(2026, 1, 17),
            latitude: Some(45.0),
            camping_style: Some(CampingStyle::Backpacking),
            location_name: Some("Mount Hood".into()),
        }
    }

    pub(super) fn add_trip(engine: &PackingEngine<MemoryStore>, details: TripDetails) -> TripId {
        let trip = Trip::new("Test trip", details);
        let id = trip.id;
        engine.store().create_trip(trip).unwrap();
        id
    }

    pub(super) fn library_id(engine: &PackingEngine<MemoryStore>, name: &str) -> LibraryItemId {
        engine
            .catalog()
            .items()
            .iter()
            .find(|item| item.name == name)
            .map(|item| item.id.clone())
            .unwrap_or_else(|| panic!("no library item named {name}"))
    }

    fn names(engine: &PackingEngine<MemoryStore>, trip: TripId) -> Vec<String> {
        engine
            .store()
            .items(trip)
            .unwrap()
            .into_iter()
            .map(|item| item.name)
            .collect()
    }

    #[test]
    fn winter_backpacking_end_to_end() {
        let engine = engine();
        let trip = add_trip(&engine, january_backpacking());

        let context = engine.resolve_context(trip).unwrap();
        assert_eq!(context.season, Season::Winter);
        assert_eq!(context.temperature_band, TemperatureBand::BelowFreezing);
        assert_eq!(context.camping_style, CampingStyle::Backpacking);

        assert!(engine.needs_initialization(trip).unwrap());
        engine.initialize_list(trip).unwrap();
        assert!(!engine.needs_initialization(trip).unwrap());

        let names = names(&engine, trip);
        for expected in [
            "Tent",
            "Sleeping bag",
            "Water filter",
            "Cold-weather sleeping bag (0-20°F)",
            "4-season tent",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing {expected}");
        }
        for unexpected in ["Camp chairs", "Cooler", "Leveling blocks"] {
            assert!(!names.iter().any(|n| n == unexpected), "unexpected {unexpected}");
        }

        let suggestions = engine.compute_suggestions(trip).unwrap();
        assert!(!suggestions.is_empty());
        for suggestion in &suggestions {
            assert!(!names.contains(&suggestion.name), "{}", suggestion.name);
        }
    }

    #[test]
    fn dismissal_survives_until_reinitialization() {
        let engine = engine();
        let trip = add_trip(&engine, january_backpacking());
        engine.initialize_list(trip).unwrap();

        let target = engine.compute_suggestions(trip).unwrap()[0]
            .library_item_id
            .clone();
        engine.dismiss_suggestion(trip, &target).unwrap();

        for _ in 0..2 {
            let ids: Vec<_> = engine
                .compute_suggestions(trip)
                .unwrap()
                .into_iter()
                .map(|s| s.library_item_id)
                .collect();
            assert!(!ids.contains(&target));
        }

        engine.force_reinitialize(trip).unwrap();

        assert!(engine.store().suggestion_records(trip).unwrap().is_empty());
        let ids: Vec<_> = engine
            .compute_suggestions(trip)
            .unwrap()
            .into_iter()
            .map(|s| s.library_item_id)
            .collect();
        assert!(ids.contains(&target));
    }

    #[test]
    fn user_items_survive_everything_but_reinitialization() {
        let engine = engine();
        let trip = add_trip(&engine, january_backpacking());
        engine.initialize_list(trip).unwrap();
        engine
            .add_custom_item(trip, NewItem::named("Thermos").in_category("kitchen"))
            .unwrap();

        engine.initialize_list(trip).unwrap();
        assert!(names(&engine, trip).contains(&"Thermos".to_string()));

        engine.force_reinitialize(trip).unwrap();
        assert!(!names(&engine, trip).contains(&"Thermos".to_string()));
    }

    #[test]
    fn weather_observation_feeds_the_context() {
        let engine = engine().with_weather(FixedWeather(Observation {
            windy: true,
            precipitation: Precipitation::Snow,
            temperature_band: None,
        }));
        let trip = add_trip(&engine, january_backpacking());

        let context = engine.resolve_context(trip).unwrap();
        assert!(context.windy);
        assert_eq!(context.precipitation, Precipitation::Snow);

        engine.initialize_list(trip).unwrap();
        let snapshot = engine.store().trip(trip).unwrap().weather.unwrap();
        assert!(snapshot.windy);
        assert_eq!(snapshot.precipitation, Precipitation::Snow);
        assert!(names(&engine, trip).contains(&"Microspikes".to_string()));
    }

    struct BrokenWeather;

    impl WeatherSource for BrokenWeather {
        fn observe(
            &self,
            _details: &TripDetails,
            _date: NaiveDate,
        ) -> Result<Option<Observation>, WeatherError> {
            Err(WeatherError("service unavailable".into()))
        }
    }

    #[test]
    fn weather_failure_degrades_to_defaults() {
        let engine = engine().with_weather(BrokenWeather);
        let trip = add_trip(&engine, january_backpacking());

        let context = engine.resolve_context(trip).unwrap();
        assert!(!context.windy);
        assert_eq!(context.precipitation, Precipitation::None);

        engine.initialize_list(trip).unwrap();
        assert!(engine.store().trip(trip).unwrap().weather.is_none());
    }

    #[test]
    fn missing_trip_is_not_found() {
        let engine = engine();
        let missing = TripId::new();
        assert!(matches!(
            engine.initialize_list(missing),
            Err(Error::NotFound(NotFound::Trip(id))) if id == missing
        ));
        assert!(matches!(
            engine.compute_suggestions(missing),
            Err(Error::NotFound(NotFound::Trip(_)))
        ));
    }
}
