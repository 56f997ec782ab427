//! Populates a trip's packing list from the catalog.

use std::collections::HashSet;

use tracing::instrument;

use crate::{
    domain::{
        InitMarker, ItemSource, TripContext, TripId, TripPackingItem, WeatherSnapshot,
        matcher::dedup_by_name, reason::initial_reason,
    },
    engine::{Error, PackingEngine},
    storage::{Guard, Store, StoreError, Transaction, Write},
};

/// The result of [`PackingEngine::initialize_list`].
#[derive(Debug, Clone, PartialEq)]
pub enum InitOutcome {
    /// The list was already in sync with the catalog. Nothing was written.
    AlreadyInitialized,
    /// No catalog item applies to the trip and its list is empty. Nothing
    /// was written and the list still needs initialization.
    NothingToAdd {
        /// The context that selected nothing.
        context: TripContext,
    },
    /// The list was populated.
    Initialized {
        /// The items added by this call.
        added: Vec<TripPackingItem>,
        /// The context the items were selected for.
        context: TripContext,
    },
}

impl<S: Store> PackingEngine<S> {
    /// Whether the trip's list is missing or was built from an older catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the trip cannot be read.
    pub fn needs_initialization(&self, trip_id: TripId) -> Result<bool, Error> {
        let trip = self.store.trip(trip_id)?;
        let items = self.store.items(trip_id)?;
        Ok(!trip.marker.is_current(self.catalog.version()) || items.is_empty())
    }

    /// Builds the trip's list from the catalog, unless it is already in sync.
    ///
    /// Base items for the camping style are always added. Context-matched
    /// items are added when their priority reaches the configured threshold.
    /// Items already on the list are kept and never duplicated. An empty
    /// selection for an empty list writes nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the trip cannot be read, or if the list changed
    /// concurrently and is still not in sync.
    #[instrument(skip(self))]
    pub fn initialize_list(&self, trip_id: TripId) -> Result<InitOutcome, Error> {
        let trip = self.store.trip(trip_id)?;
        let existing = self.store.items(trip_id)?;
        let version = self.catalog.version();

        if trip.marker.is_current(version) && !existing.is_empty() {
            tracing::debug!("list already in sync with catalog version {version}");
            return Ok(InitOutcome::AlreadyInitialized);
        }

        let (context, observation) = self.context_for(&trip);
        let matcher = self.matcher();
        let threshold = self.config.initial_priority_threshold();

        let base = matcher.select_base_items(context.camping_style);
        let contextual = matcher
            .select_contextual_items(&context)
            .into_iter()
            .filter(|item| item.priority >= threshold);

        let existing_ids: HashSet<_> = existing
            .iter()
            .filter_map(|item| item.library_item_id.as_ref())
            .collect();
        let existing_names: HashSet<_> = existing
            .iter()
            .map(|item| item.name.to_lowercase())
            .collect();

        let added: Vec<_> = dedup_by_name(base.into_iter().chain(contextual))
            .into_iter()
            .filter(|item| {
                let present = existing_ids.contains(&item.id)
                    || existing_names.contains(&item.name.to_lowercase());
                if present {
                    tracing::debug!("'{}' is already on the list", item.name);
                }
                !present
            })
            .map(|item| {
                if item.base {
                    TripPackingItem::from_library(item, ItemSource::Base, None)
                } else {
                    let reason = initial_reason(item, &context);
                    TripPackingItem::from_library(item, ItemSource::Suggested, Some(reason))
                }
            })
            .collect();

        if added.is_empty() && existing.is_empty() {
            tracing::warn!(
                "no catalog item applies to '{}', leaving the list uninitialized",
                trip.name
            );
            return Ok(InitOutcome::NothingToAdd { context });
        }

        let transaction = Transaction::new()
            .guard(Guard::MarkerIs(trip.marker))
            .guard(Guard::ItemsAre(existing.iter().map(|item| item.id).collect()))
            .writes(added.iter().cloned().map(Write::PutItem))
            .write(Write::SetMarker(InitMarker::initialized(version)))
            .writes(
                observation
                    .as_ref()
                    .map(|observation| Write::SetWeather(WeatherSnapshot::capture(observation))),
            );

        match self.store.commit(trip_id, transaction) {
            Ok(()) => {}
            Err(StoreError::Conflict(guard)) => {
                tracing::debug!("initialization raced with another writer");
                if self.needs_initialization(trip_id)? {
                    return Err(StoreError::Conflict(guard).into());
                }
                return Ok(InitOutcome::AlreadyInitialized);
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(
            "Initialized '{}' with {} items from catalog version {version}",
            trip.name,
            added.len()
        );
        Ok(InitOutcome::Initialized { added, context })
    }

    /// Discards the trip's list and suggestion decisions and builds the list
    /// again from scratch.
    ///
    /// User-authored items are lost.
    ///
    /// # Errors
    ///
    /// Returns an error if the trip cannot be read or written.
    #[instrument(skip(self))]
    pub fn force_reinitialize(&self, trip_id: TripId) -> Result<InitOutcome, Error> {
        self.store.commit(
            trip_id,
            Transaction::new().writes([
                Write::ClearItems,
                Write::ClearSuggestions,
                Write::SetMarker(InitMarker::reset()),
            ]),
        )?;
        tracing::info!("Cleared list and suggestion records");

        self.initialize_list(trip_id)
    }
}
