//! An in-memory [`Store`].

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::{
    domain::{SuggestionRecord, Trip, TripId, TripPackingItem},
    storage::{Store, StoreError, Transaction, TripRecord},
};

/// Keeps every trip in memory behind a single lock.
///
/// Commits stage the writes on a copy of the trip and swap it in only once
/// every write has been applied.
#[derive(Debug, Default)]
pub struct MemoryStore {
    trips: Mutex<HashMap<TripId, TripRecord>>,
    fail_after: Mutex<Option<usize>>,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next commit fail after applying `writes` of its writes.
    ///
    /// The failure is reported as [`StoreError::Injected`] and the staged
    /// writes are discarded.
    pub fn fail_next_commit_after(&self, writes: usize) {
        *self.fail_after.lock() = Some(writes);
    }

    fn read<T>(&self, id: TripId, f: impl FnOnce(&TripRecord) -> T) -> Result<T, StoreError> {
        self.trips
            .lock()
            .get(&id)
            .map(f)
            .ok_or(StoreError::TripNotFound(id))
    }
}

impl Store for MemoryStore {
    fn create_trip(&self, trip: Trip) -> Result<(), StoreError> {
        let mut trips = self.trips.lock();
        if trips.contains_key(&trip.id) {
            return Err(StoreError::TripExists(trip.id));
        }
        trips.insert(trip.id, TripRecord::new(trip));
        Ok(())
    }

    fn trip(&self, id: TripId) -> Result<Trip, StoreError> {
        self.read(id, |record| record.trip.clone())
    }

    fn trips(&self) -> Result<Vec<Trip>, StoreError> {
        let mut trips: Vec<_> = self
            .trips
            .lock()
            .values()
            .map(|record| record.trip.clone())
            .collect();
        trips.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(trips)
    }

    fn items(&self, id: TripId) -> Result<Vec<TripPackingItem>, StoreError> {
        self.read(id, |record| record.items.clone())
    }

    fn suggestion_records(&self, id: TripId) -> Result<Vec<SuggestionRecord>, StoreError> {
        self.read(id, |record| record.suggestions.clone())
    }

    fn commit(&self, id: TripId, transaction: Transaction) -> Result<(), StoreError> {
        let mut trips = self.trips.lock();
        let record = trips.get_mut(&id).ok_or(StoreError::TripNotFound(id))?;

        record.check(transaction.guard_list())?;
        let Some(fail_after) = self.fail_after.lock().take() else {
            *record = record.staged(transaction)?;
            return Ok(());
        };

        let mut staged = record.clone();
        for (applied, write) in transaction.write_list().iter().enumerate() {
            if applied == fail_after {
                tracing::debug!(trip = %id, applied, "injected commit failure");
                return Err(StoreError::Injected(applied));
            }
            staged.apply(write.clone());
        }
        *record = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{InitMarker, TripDetails},
        storage::{Guard, Write},
    };

    fn store_with_trip() -> (MemoryStore, TripId) {
        let store = MemoryStore::new();
        let trip = Trip::new("Lakes", TripDetails::default());
        let id = trip.id;
        store.create_trip(trip).unwrap();
        (store, id)
    }

    #[test]
    fn unknown_trip_is_not_found() {
        let store = MemoryStore::new();
        let id = TripId::new();
        assert!(matches!(store.trip(id), Err(StoreError::TripNotFound(x)) if x == id));
        assert!(matches!(
            store.commit(id, Transaction::new()),
            Err(StoreError::TripNotFound(_))
        ));
    }

    #[test]
    fn duplicate_trip_is_rejected() {
        let (store, id) = store_with_trip();
        let mut trip = store.trip(id).unwrap();
        trip.name = "Again".into();
        assert!(matches!(
            store.create_trip(trip),
            Err(StoreError::TripExists(_))
        ));
    }

    #[test]
    fn commit_applies_writes() {
        let (store, id) = store_with_trip();
        let item = TripPackingItem::custom("Rope".into(), "other".into(), 1);

        store
            .commit(
                id,
                Transaction::new()
                    .guard(Guard::MarkerIs(InitMarker::default()))
                    .writes([
                        Write::PutItem(item.clone()),
                        Write::SetMarker(InitMarker::initialized(3)),
                    ]),
            )
            .unwrap();

        assert_eq!(store.items(id).unwrap(), vec![item]);
        assert_eq!(store.trip(id).unwrap().marker, InitMarker::initialized(3));
    }

    #[test]
    fn injected_failure_discards_every_write() {
        let (store, id) = store_with_trip();
        let item = TripPackingItem::custom("Rope".into(), "other".into(), 1);

        store.fail_next_commit_after(1);
        let result = store.commit(
            id,
            Transaction::new().writes([
                Write::PutItem(item.clone()),
                Write::SetMarker(InitMarker::initialized(3)),
            ]),
        );

        assert!(matches!(result, Err(StoreError::Injected(1))));
        assert!(store.items(id).unwrap().is_empty());
        assert_eq!(store.trip(id).unwrap().marker, InitMarker::default());

        // The injection only affects a single commit.
        store
            .commit(id, Transaction::new().write(Write::PutItem(item)))
            .unwrap();
        assert_eq!(store.items(id).unwrap().len(), 1);
    }

    #[test]
    fn rejected_commit_keeps_injected_failure_armed() {
        let (store, id) = store_with_trip();
        let item = TripPackingItem::custom("Rope".into(), "other".into(), 1);

        store.fail_next_commit_after(0);
        let rejected = store.commit(
            id,
            Transaction::new()
                .guard(Guard::MarkerIs(InitMarker::initialized(1)))
                .write(Write::PutItem(item.clone())),
        );
        assert!(matches!(rejected, Err(StoreError::Conflict(_))));

        let result = store.commit(id, Transaction::new().write(Write::PutItem(item)));
        assert!(matches!(result, Err(StoreError::Injected(0))));
        assert!(store.items(id).unwrap().is_empty());
    }

    #[test]
    fn trips_are_sorted_by_name() {
        let store = MemoryStore::new();
        store
            .create_trip(Trip::new("Zion", TripDetails::default()))
            .unwrap();
        store
            .create_trip(Trip::new("Acadia", TripDetails::default()))
            .unwrap();

        let names: Vec<_> = store.trips().unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, ["Acadia", "Zion"]);
    }
}
