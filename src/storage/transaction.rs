//! The persistence contract.
//!
//! Every mutation of a trip goes through [`Store::commit`] as a single
//! [`Transaction`]: a list of guards that must all hold, followed by a list of
//! writes that are applied together or not at all.

use std::io;

use crate::domain::{
    InitMarker, ItemId, LibraryItemId, SuggestionRecord, SuggestionStatus, Trip, TripId,
    TripPackingItem, WeatherSnapshot,
};

/// A condition checked against the stored state before any write is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    /// The trip's initialization marker equals the given value.
    MarkerIs(InitMarker),
    /// The list holds exactly the items with these ids, in any order.
    ItemsAre(Vec<ItemId>),
    /// An item with this id is on the list.
    ItemExists(ItemId),
    /// No item on the list was created from this library item.
    NoItemForLibrary(LibraryItemId),
    /// The suggestion record for the library item has this status, or is
    /// absent when `None`.
    SuggestionStatusIs(LibraryItemId, Option<SuggestionStatus>),
}

/// A single change to a trip's stored state.
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    /// Inserts an item, replacing any item with the same id.
    PutItem(TripPackingItem),
    /// Removes an item.
    DeleteItem(ItemId),
    /// Removes every item.
    ClearItems,
    /// Inserts a suggestion record, replacing the one for the same library
    /// item.
    PutSuggestion(SuggestionRecord),
    /// Removes every suggestion record.
    ClearSuggestions,
    /// Replaces the initialization marker.
    SetMarker(InitMarker),
    /// Replaces the display weather snapshot.
    SetWeather(WeatherSnapshot),
}

/// A set of guarded writes applied atomically to one trip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transaction {
    guards: Vec<Guard>,
    writes: Vec<Write>,
}

impl Transaction {
    /// An empty transaction.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a guard.
    #[must_use]
    pub fn guard(mut self, guard: Guard) -> Self {
        self.guards.push(guard);
        self
    }

    /// Adds a write.
    #[must_use]
    pub fn write(mut self, write: Write) -> Self {
        self.writes.push(write);
        self
    }

    /// Adds several writes, in order.
    #[must_use]
    pub fn writes(mut self, writes: impl IntoIterator<Item = Write>) -> Self {
        self.writes.extend(writes);
        self
    }

    /// The guards, in the order they are checked.
    #[must_use]
    pub fn guard_list(&self) -> &[Guard] {
        &self.guards
    }

    /// The writes, in the order they are applied.
    #[must_use]
    pub fn write_list(&self) -> &[Write] {
        &self.writes
    }
}

/// Errors raised by a [`Store`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The trip does not exist.
    #[error("trip {0} not found")]
    TripNotFound(TripId),
    /// A trip with the same id already exists.
    #[error("trip {0} already exists")]
    TripExists(TripId),
    /// A guard did not hold. Nothing was written.
    #[error("transaction rejected: guard {0:?} does not hold")]
    Conflict(Guard),
    /// A simulated failure part-way through a commit. Nothing was written.
    #[error("commit aborted after {0} writes")]
    Injected(usize),
    /// The underlying storage could not be accessed.
    #[error("failed to access trip storage: {0}")]
    Io(#[from] io::Error),
    /// A stored trip document could not be parsed or written.
    #[error("failed to parse trip document: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Durable storage for trips, their items, and suggestion records.
///
/// Implementations must apply each [`Transaction`] atomically: either every
/// guard holds and every write is persisted, or nothing changes.
pub trait Store {
    /// Stores a new trip.
    ///
    /// # Errors
    ///
    /// Returns an error if the trip already exists or cannot be written.
    fn create_trip(&self, trip: Trip) -> Result<(), StoreError>;

    /// Reads a trip.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TripNotFound`] if the trip does not exist.
    fn trip(&self, id: TripId) -> Result<Trip, StoreError>;

    /// Reads every trip.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    fn trips(&self) -> Result<Vec<Trip>, StoreError>;

    /// Reads the items on a trip's list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TripNotFound`] if the trip does not exist.
    fn items(&self, id: TripId) -> Result<Vec<TripPackingItem>, StoreError>;

    /// Reads the suggestion records of a trip.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TripNotFound`] if the trip does not exist.
    fn suggestion_records(&self, id: TripId) -> Result<Vec<SuggestionRecord>, StoreError>;

    /// Applies a transaction to a trip atomically.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if a guard does not hold, or another
    /// error if the write failed. In every error case the stored state is
    /// unchanged.
    fn commit(&self, id: TripId, transaction: Transaction) -> Result<(), StoreError>;
}

/// Everything stored for one trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    /// The trip itself.
    pub trip: Trip,
    /// The items on its list.
    pub items: Vec<TripPackingItem>,
    /// Its suggestion records.
    pub suggestions: Vec<SuggestionRecord>,
}

impl TripRecord {
    /// A record for a trip with an empty list.
    #[must_use]
    pub const fn new(trip: Trip) -> Self {
        Self {
            trip,
            items: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Checks every guard, returning the first that fails.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] with the failing guard.
    pub fn check(&self, guards: &[Guard]) -> Result<(), StoreError> {
        match guards.iter().find(|guard| !self.holds(guard)) {
            Some(guard) => Err(StoreError::Conflict(guard.clone())),
            None => Ok(()),
        }
    }

    fn holds(&self, guard: &Guard) -> bool {
        match guard {
            Guard::MarkerIs(marker) => self.trip.marker == *marker,
            Guard::ItemsAre(ids) => {
                self.items.len() == ids.len()
                    && self.items.iter().all(|item| ids.contains(&item.id))
            }
            Guard::ItemExists(id) => self.items.iter().any(|item| item.id == *id),
            Guard::NoItemForLibrary(library_id) => !self
                .items
                .iter()
                .any(|item| item.library_item_id.as_ref() == Some(library_id)),
            Guard::SuggestionStatusIs(library_id, status) => {
                self.suggestion(library_id).map(|record| record.status) == *status
            }
        }
    }

    /// The suggestion record for a library item, if any.
    #[must_use]
    pub fn suggestion(&self, library_id: &LibraryItemId) -> Option<&SuggestionRecord> {
        self.suggestions
            .iter()
            .find(|record| record.library_item_id == *library_id)
    }

    /// Applies one write in place.
    pub fn apply(&mut self, write: Write) {
        match write {
            Write::PutItem(item) => match self.items.iter_mut().find(|i| i.id == item.id) {
                Some(existing) => *existing = item,
                None => self.items.push(item),
            },
            Write::DeleteItem(id) => self.items.retain(|item| item.id != id),
            Write::ClearItems => self.items.clear(),
            Write::PutSuggestion(record) => match self
                .suggestions
                .iter_mut()
                .find(|r| r.library_item_id == record.library_item_id)
            {
                Some(existing) => *existing = record,
                None => self.suggestions.push(record),
            },
            Write::ClearSuggestions => self.suggestions.clear(),
            Write::SetMarker(marker) => self.trip.marker = marker,
            Write::SetWeather(snapshot) => self.trip.weather = Some(snapshot),
        }
    }

    /// Checks the guards and applies the writes to a copy of this record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if a guard does not hold.
    pub fn staged(&self, transaction: Transaction) -> Result<Self, StoreError> {
        self.check(&transaction.guards)?;
        let mut staged = self.clone();
        for write in transaction.writes {
            staged.apply(write);
        }
        Ok(staged)
    }
}
