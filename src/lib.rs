//! Context-aware trip packing lists
//!
//! A trip's start date, latitude, and camping style are turned into a
//! versioned checklist of gear drawn from a catalog. Further catalog items
//! matching the trip are offered as suggestions that can be accepted or
//! dismissed.

pub mod domain;
pub use domain::{Catalog, Config, NewItem, Trip, TripContext, TripDetails, TripId};

/// Building and maintaining packing lists.
pub mod engine;
pub use engine::{InitOutcome, PackingEngine, Suggestion};

/// Persistence of trips, their lists, and suggestion decisions.
pub mod storage;
pub use storage::{Directory, MemoryStore, Store};
