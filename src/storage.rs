/// A filesystem backed store of trips.
pub mod directory;
mod memory;
mod transaction;

pub use directory::Directory;
pub use memory::MemoryStore;
pub use transaction::{Guard, Store, StoreError, Transaction, TripRecord, Write};
