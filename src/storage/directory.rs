//! A filesystem backed store of trips
//!
//! Each trip is kept in its own YAML document under `<root>/trips`, holding
//! the trip, its packing list, and its suggestion records. Commits rewrite the
//! whole document through a temporary file that is renamed into place, so a
//! reader never observes a half-applied transaction.

use std::{
    ffi::OsStr,
    fs::File,
    io::{self, BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::{
    domain::{Catalog, CatalogError, Config, SuggestionRecord, Trip, TripId, TripPackingItem},
    storage::{Store, StoreError, Transaction, TripRecord},
};

/// A filesystem backed store of trips.
#[derive(Debug)]
pub struct Directory {
    /// The root of the directory trips are stored in.
    root: PathBuf,
    /// Serialises commits made through this handle.
    lock: Mutex<()>,
}

impl Directory {
    /// Opens a directory at the given path, creating the trip folder if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the trip folder cannot be created.
    pub fn open(root: PathBuf) -> Result<Self, StoreError> {
        std::fs::create_dir_all(root.join("trips"))?;
        Ok(Self {
            root,
            lock: Mutex::new(()),
        })
    }

    /// The root of the directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads `config.toml` from the root, falling back to the defaults.
    #[must_use]
    pub fn load_config(&self) -> Config {
        let path = self.root.join("config.toml");
        Config::load(&path).unwrap_or_else(|e| {
            tracing::debug!("Failed to load config: {e}");
            Config::default()
        })
    }

    /// Loads the catalog named in the configuration, or the built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if a custom catalog is configured but cannot be
    /// loaded.
    pub fn load_catalog(&self, config: &Config) -> Result<Catalog, CatalogError> {
        match &config.catalog {
            Some(path) => {
                let path = self.root.join(path);
                tracing::debug!("Loading catalog from {}", path.display());
                Catalog::load(&path)
            }
            None => Ok(Catalog::builtin()),
        }
    }

    fn trip_path(&self, id: TripId) -> PathBuf {
        self.root.join("trips").join(format!("{id}.yaml"))
    }

    fn load_record(&self, id: TripId) -> Result<TripRecord, StoreError> {
        let file = File::open(self.trip_path(id)).map_err(|io_error| match io_error.kind() {
            io::ErrorKind::NotFound => StoreError::TripNotFound(id),
            _ => StoreError::Io(io_error),
        })?;
        read_document(file)
    }

    fn save_record(&self, record: &TripRecord) -> Result<(), StoreError> {
        let path = self.trip_path(record.trip.id);
        let folder = path.parent().unwrap_or(&self.root);

        let mut file = NamedTempFile::new_in(folder)?;
        {
            let mut writer = BufWriter::new(file.as_file_mut());
            serde_yaml::to_writer(&mut writer, &TripDocument::from(record.clone()))?;
            writer.flush()?;
        }
        file.as_file().sync_all()?;
        file.persist(&path).map_err(|e| e.error)?;

        tracing::trace!("Saved trip document {}", path.display());
        Ok(())
    }
}

impl Store for Directory {
    fn create_trip(&self, trip: Trip) -> Result<(), StoreError> {
        let _lock = self.lock.lock();
        if self.trip_path(trip.id).exists() {
            return Err(StoreError::TripExists(trip.id));
        }
        self.save_record(&TripRecord::new(trip))
    }

    fn trip(&self, id: TripId) -> Result<Trip, StoreError> {
        self.load_record(id).map(|record| record.trip)
    }

    fn trips(&self) -> Result<Vec<Trip>, StoreError> {
        let mut trips = Vec::new();
        for entry in WalkDir::new(self.root.join("trips"))
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.path().extension() == Some(OsStr::new("yaml")))
        {
            match File::open(entry.path())
                .map_err(StoreError::from)
                .and_then(read_document)
            {
                Ok(record) => trips.push(record.trip),
                Err(e) => {
                    tracing::warn!("Skipping unreadable trip {}: {e}", entry.path().display());
                }
            }
        }
        trips.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(trips)
    }

    fn items(&self, id: TripId) -> Result<Vec<TripPackingItem>, StoreError> {
        self.load_record(id).map(|record| record.items)
    }

    fn suggestion_records(&self, id: TripId) -> Result<Vec<SuggestionRecord>, StoreError> {
        self.load_record(id).map(|record| record.suggestions)
    }

    fn commit(&self, id: TripId, transaction: Transaction) -> Result<(), StoreError> {
        let _lock = self.lock.lock();
        let record = self.load_record(id)?;
        let staged = record.staged(transaction)?;
        self.save_record(&staged)
    }
}

fn read_document(file: File) -> Result<TripRecord, StoreError> {
    let document: TripDocument = serde_yaml::from_reader(BufReader::new(file))?;
    Ok(document.into())
}

/// The serialized versions of a trip document.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum TripDocument {
    #[serde(rename = "1")]
    V1 {
        trip: Trip,
        #[serde(default)]
        items: Vec<TripPackingItem>,
        #[serde(default)]
        suggestions: Vec<SuggestionRecord>,
    },
}

impl From<TripDocument> for TripRecord {
    fn from(document: TripDocument) -> Self {
        match document {
            TripDocument::V1 {
                trip,
                items,
                suggestions,
            } => Self {
                trip,
                items,
                suggestions,
            },
        }
    }
}

impl From<TripRecord> for TripDocument {
    fn from(record: TripRecord) -> Self {
        Self::V1 {
            trip: record.trip,
            items: record.items,
            suggestions: record.suggestions,
        }
    }
}
