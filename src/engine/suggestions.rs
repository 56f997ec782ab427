//! Suggestions offered on top of an initialized list.

use std::collections::HashSet;

use serde::Serialize;
use tracing::instrument;

use crate::{
    domain::{
        ItemSource, LibraryItem, LibraryItemId, SuggestionRecord, SuggestionStatus, TripId,
        TripPackingItem, reason::suggestion_reason,
    },
    engine::{Error, NotFound, PackingEngine},
    storage::{Guard, Store, StoreError, Transaction, Write},
};

/// A catalog item offered for a trip, with the reason it fits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// The catalog item.
    pub library_item_id: LibraryItemId,
    /// Display name.
    pub name: String,
    /// Category the item would be grouped under.
    pub category_id: String,
    /// Number of units added on acceptance.
    pub default_qty: u32,
    /// Importance from 1 to 5.
    pub priority: u8,
    /// Extra guidance for the user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Why the item is suggested.
    pub reason: String,
}

impl Suggestion {
    fn new(item: &LibraryItem, reason: String) -> Self {
        Self {
            library_item_id: item.id.clone(),
            name: item.name.clone(),
            category_id: item.category_id.clone(),
            default_qty: item.default_qty,
            priority: item.priority,
            notes: item.notes.clone(),
            reason,
        }
    }
}

impl<S: Store> PackingEngine<S> {
    /// Context-matched catalog items that are not on the list and have not
    /// been decided on, most important first.
    ///
    /// Nothing is written.
    ///
    /// # Errors
    ///
    /// Returns an error if the trip cannot be read.
    #[instrument(skip(self))]
    pub fn compute_suggestions(&self, trip_id: TripId) -> Result<Vec<Suggestion>, Error> {
        let trip = self.store.trip(trip_id)?;
        let items = self.store.items(trip_id)?;
        let records = self.store.suggestion_records(trip_id)?;
        let (context, _) = self.context_for(&trip);

        let on_list: HashSet<_> = items
            .iter()
            .filter_map(|item| item.library_item_id.as_ref())
            .collect();
        let names: HashSet<_> = items.iter().map(|item| item.name.to_lowercase()).collect();
        let decided: HashSet<_> = records
            .iter()
            .filter(|record| record.status.is_terminal())
            .map(|record| &record.library_item_id)
            .collect();

        let mut candidates: Vec<_> = self
            .matcher()
            .select_contextual_items(&context)
            .into_iter()
            .filter(|item| {
                let excluded = on_list.contains(&item.id)
                    || names.contains(&item.name.to_lowercase())
                    || decided.contains(&item.id);
                if excluded {
                    tracing::trace!("excluding '{}'", item.name);
                }
                !excluded
            })
            .collect();

        candidates.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.name.cmp(&b.name)));
        candidates.truncate(self.config.max_suggestions());

        tracing::debug!("{} suggestions for '{}'", candidates.len(), trip.name);
        Ok(candidates
            .into_iter()
            .map(|item| Suggestion::new(item, suggestion_reason(item, &context)))
            .collect())
    }

    /// Adds a suggested catalog item to the list and records the decision.
    ///
    /// The item and the record are written together or not at all.
    ///
    /// # Errors
    ///
    /// - [`NotFound`] if the trip or the catalog item does not exist.
    /// - [`Error::SuggestionClosed`] if the suggestion was already accepted or
    ///   dismissed.
    /// - [`Error::AlreadyOnList`] if an item from this catalog entry is
    ///   already on the list.
    #[instrument(skip(self, reason))]
    pub fn accept_suggestion(
        &self,
        trip_id: TripId,
        library_item_id: &LibraryItemId,
        reason: impl Into<String>,
    ) -> Result<TripPackingItem, Error> {
        let item = self.library_item(library_item_id)?;
        let status = self.suggestion_status(trip_id, library_item_id)?;
        ensure_open(library_item_id, status)?;

        let added = TripPackingItem::from_library(item, ItemSource::Suggested, Some(reason.into()));
        let transaction = Transaction::new()
            .guard(Guard::NoItemForLibrary(library_item_id.clone()))
            .guard(Guard::SuggestionStatusIs(library_item_id.clone(), status))
            .writes([
                Write::PutItem(added.clone()),
                Write::PutSuggestion(SuggestionRecord::new(
                    library_item_id.clone(),
                    SuggestionStatus::Added,
                )),
            ]);

        match self.store.commit(trip_id, transaction) {
            Ok(()) => {}
            Err(StoreError::Conflict(Guard::NoItemForLibrary(id))) => {
                return Err(Error::AlreadyOnList(id));
            }
            Err(StoreError::Conflict(guard @ Guard::SuggestionStatusIs(..))) => {
                let current = self.suggestion_status(trip_id, library_item_id)?;
                ensure_open(library_item_id, current)?;
                return Err(StoreError::Conflict(guard).into());
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!("Accepted suggestion '{}'", added.name);
        Ok(added)
    }

    /// Records that the user does not want a suggestion.
    ///
    /// The list itself is not changed. Dismissing a suggestion twice has no
    /// further effect.
    ///
    /// # Errors
    ///
    /// - [`NotFound`] if the trip or the catalog item does not exist.
    /// - [`Error::SuggestionClosed`] if the suggestion was already accepted.
    #[instrument(skip(self))]
    pub fn dismiss_suggestion(
        &self,
        trip_id: TripId,
        library_item_id: &LibraryItemId,
    ) -> Result<(), Error> {
        let item = self.library_item(library_item_id)?;
        let status = self.suggestion_status(trip_id, library_item_id)?;

        if status == Some(SuggestionStatus::Dismissed) {
            tracing::debug!("'{}' is already dismissed", item.name);
            return Ok(());
        }
        ensure_open(library_item_id, status)?;

        let transaction = Transaction::new()
            .guard(Guard::SuggestionStatusIs(library_item_id.clone(), status))
            .write(Write::PutSuggestion(SuggestionRecord::new(
                library_item_id.clone(),
                SuggestionStatus::Dismissed,
            )));

        match self.store.commit(trip_id, transaction) {
            Ok(()) => {}
            Err(StoreError::Conflict(guard)) => {
                match self.suggestion_status(trip_id, library_item_id)? {
                    Some(SuggestionStatus::Dismissed) => return Ok(()),
                    current => {
                        ensure_open(library_item_id, current)?;
                        return Err(StoreError::Conflict(guard).into());
                    }
                }
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!("Dismissed suggestion '{}'", item.name);
        Ok(())
    }

    /// The catalog item, if it is offered under the current configuration.
    fn library_item(&self, id: &LibraryItemId) -> Result<&LibraryItem, NotFound> {
        let matcher = self.matcher();
        self.catalog
            .item(id)
            .filter(|item| matcher.admits(item))
            .ok_or_else(|| NotFound::LibraryItem(id.clone()))
    }

    fn suggestion_status(
        &self,
        trip_id: TripId,
        id: &LibraryItemId,
    ) -> Result<Option<SuggestionStatus>, Error> {
        Ok(self
            .store
            .suggestion_records(trip_id)?
            .into_iter()
            .find(|record| record.library_item_id == *id)
            .map(|record| record.status))
    }
}

fn ensure_open(id: &LibraryItemId, status: Option<SuggestionStatus>) -> Result<(), Error> {
    match status {
        Some(status) if status.is_terminal() => Err(Error::SuggestionClosed {
            id: id.clone(),
            status,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use test_case::test_case;

    use crate::{
        domain::{
            CampingStyle, Catalog, Config, ItemSource, LibraryItemId, SuggestionStatus,
            TripDetails,
        },
        engine::{
            Error, NotFound, PackingEngine,
            tests::{add_trip, engine, january_backpacking, library_id},
        },
        storage::{MemoryStore, Store, StoreError},
    };

    fn initialized() -> (PackingEngine<MemoryStore>, crate::domain::TripId) {
        let engine = engine();
        let trip = add_trip(&engine, january_backpacking());
        engine.initialize_list(trip).unwrap();
        (engine, trip)
    }

    #[test]
    fn suggestions_are_ordered_and_capped() {
        let mut config = Config::default();
        config.set_max_suggestions(3);
        let engine = PackingEngine::new(MemoryStore::new(), Arc::new(Catalog::builtin()), config);
        let trip = add_trip(&engine, january_backpacking());

        let suggestions = engine.compute_suggestions(trip).unwrap();

        assert_eq!(suggestions.len(), 3);
        for pair in suggestions.windows(2) {
            assert!(
                pair[0].priority > pair[1].priority
                    || (pair[0].priority == pair[1].priority && pair[0].name < pair[1].name)
            );
        }
    }

    #[test]
    fn suggestions_do_not_write() {
        let (engine, trip) = initialized();
        let before = engine.store().items(trip).unwrap();

        engine.compute_suggestions(trip).unwrap();

        assert_eq!(engine.store().items(trip).unwrap(), before);
        assert!(engine.store().suggestion_records(trip).unwrap().is_empty());
    }

    #[test_case("Hand warmers", "Freezing temperatures expected"; "temperature wins")]
    #[test_case("Insulated mug", "Freezing temperatures expected"; "temperature before season")]
    #[test_case("Camp shoes", "Recommended for this trip"; "agnostic item")]
    fn suggestion_reasons(name: &str, reason: &str) {
        let (engine, trip) = initialized();
        let suggestion = engine
            .compute_suggestions(trip)
            .unwrap()
            .into_iter()
            .find(|s| s.name == name)
            .unwrap();
        assert_eq!(suggestion.reason, reason);
    }

    #[test]
    fn accepting_adds_item_and_record() {
        let (engine, trip) = initialized();
        let id = library_id(&engine, "Hand warmers");

        let item = engine
            .accept_suggestion(trip, &id, "Freezing temperatures expected")
            .unwrap();

        assert_eq!(item.source, ItemSource::Suggested);
        assert_eq!(item.qty, 4);
        assert_eq!(
            item.added_reason.as_deref(),
            Some("Freezing temperatures expected")
        );
        assert!(engine.store().items(trip).unwrap().contains(&item));
        let records = engine.store().suggestion_records(trip).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, SuggestionStatus::Added);
        assert!(
            !engine
                .compute_suggestions(trip)
                .unwrap()
                .iter()
                .any(|s| s.library_item_id == id)
        );
    }

    #[test]
    fn accepted_item_stays_excluded_after_deletion() {
        let (engine, trip) = initialized();
        let id = library_id(&engine, "Hand warmers");
        let item = engine.accept_suggestion(trip, &id, "reason").unwrap();

        engine.delete_item(trip, item.id).unwrap();

        assert!(
            !engine
                .compute_suggestions(trip)
                .unwrap()
                .iter()
                .any(|s| s.library_item_id == id)
        );
        assert!(matches!(
            engine.accept_suggestion(trip, &id, "again"),
            Err(Error::SuggestionClosed {
                status: SuggestionStatus::Added,
                ..
            })
        ));
    }

    #[test]
    fn acceptance_is_atomic() {
        let (engine, trip) = initialized();
        let id = library_id(&engine, "Hand warmers");
        let before = engine.store().items(trip).unwrap();

        engine.store().fail_next_commit_after(1);
        let result = engine.accept_suggestion(trip, &id, "reason");

        assert!(matches!(
            result,
            Err(Error::Store(StoreError::Injected(1)))
        ));
        assert_eq!(engine.store().items(trip).unwrap(), before);
        assert!(engine.store().suggestion_records(trip).unwrap().is_empty());

        engine.accept_suggestion(trip, &id, "reason").unwrap();
    }

    #[test]
    fn accepting_an_item_already_on_the_list_is_rejected() {
        let (engine, trip) = initialized();
        let id = library_id(&engine, "Tent");

        assert!(matches!(
            engine.accept_suggestion(trip, &id, "reason"),
            Err(Error::AlreadyOnList(x)) if x == id
        ));
        assert!(engine.store().suggestion_records(trip).unwrap().is_empty());
    }

    #[test]
    fn unknown_library_item_is_not_found() {
        let (engine, trip) = initialized();
        let id = LibraryItemId::new("lib-missing");

        assert!(matches!(
            engine.accept_suggestion(trip, &id, "reason"),
            Err(Error::NotFound(NotFound::LibraryItem(_)))
        ));
        assert!(matches!(
            engine.dismiss_suggestion(trip, &id),
            Err(Error::NotFound(NotFound::LibraryItem(_)))
        ));
    }

    #[test]
    fn premium_items_need_opt_in_to_be_accepted() {
        let (engine, trip) = initialized();
        let gps = library_id(&engine, "GPS device");

        assert!(matches!(
            engine.accept_suggestion(trip, &gps, "reason"),
            Err(Error::NotFound(NotFound::LibraryItem(_)))
        ));
        assert!(matches!(
            engine.dismiss_suggestion(trip, &gps),
            Err(Error::NotFound(NotFound::LibraryItem(_)))
        ));
        assert!(engine.store().suggestion_records(trip).unwrap().is_empty());

        let mut config = Config::default();
        config.include_premium = true;
        let premium = PackingEngine::new(MemoryStore::new(), Arc::new(Catalog::builtin()), config);
        let trip = add_trip(&premium, january_backpacking());
        let item = premium.accept_suggestion(trip, &gps, "reason").unwrap();
        assert_eq!(item.name, "GPS device");
    }

    #[test]
    fn dismissal_is_idempotent_and_leaves_the_list_alone() {
        let (engine, trip) = initialized();
        let id = library_id(&engine, "Hand warmers");
        let before = engine.store().items(trip).unwrap();

        engine.dismiss_suggestion(trip, &id).unwrap();
        engine.dismiss_suggestion(trip, &id).unwrap();

        assert_eq!(engine.store().items(trip).unwrap(), before);
        let records = engine.store().suggestion_records(trip).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, SuggestionStatus::Dismissed);
    }

    #[test]
    fn terminal_states_do_not_cross() {
        let (engine, trip) = initialized();
        let dismissed = library_id(&engine, "Hand warmers");
        let accepted = library_id(&engine, "Insulated mug");

        engine.dismiss_suggestion(trip, &dismissed).unwrap();
        engine.accept_suggestion(trip, &accepted, "reason").unwrap();

        assert!(matches!(
            engine.accept_suggestion(trip, &dismissed, "reason"),
            Err(Error::SuggestionClosed {
                status: SuggestionStatus::Dismissed,
                ..
            })
        ));
        assert!(matches!(
            engine.dismiss_suggestion(trip, &accepted),
            Err(Error::SuggestionClosed {
                status: SuggestionStatus::Added,
                ..
            })
        ));
    }

    #[test]
    fn rv_trips_never_see_backpacking_gear() {
        let engine = engine();
        let trip = add_trip(
            &engine,
            TripDetails {
                start_date: NaiveDate::from_ymd_opt(2026, 1, 5),
                latitude: Some(50.0),
                camping_style: Some(CampingStyle::Rv),
                location_name: None,
            },
        );
        engine.initialize_list(trip).unwrap();

        let suggestions = engine.compute_suggestions(trip).unwrap();
        for name in ["Microspikes", "Gaiters", "Sit pad", "Emergency blanket"] {
            assert!(!suggestions.iter().any(|s| s.name == name), "{name}");
        }
    }
}
