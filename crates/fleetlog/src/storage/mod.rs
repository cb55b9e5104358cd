//! Storage layer for fleetlog.
//!
//! Every collection is persisted as one JSON array under a fixed key. The
//! [`RecordStore`] trait exposes only whole-value reads and writes; the typed
//! [`load`] and [`save`] helpers on top of it are shared by every backend.
//!
//! Mutations are read-whole, modify in memory, write-whole. There is no
//! locking, so two processes writing the same store can lose each other's
//! changes.

mod memory;
pub mod migrations;
pub mod schema;
mod sqlite;

use std::fmt;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::record::{CollectionKey, Driver, Record, Vehicle, VehicleExit};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A key-value backend holding the serialized collections.
pub trait RecordStore: fmt::Debug {
    /// Read the raw serialized value for `key`, or `None` if never written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn load_raw(&self, key: CollectionKey) -> Result<Option<String>>;

    /// Overwrite the raw serialized value for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn save_raw(&self, key: CollectionKey, value: &str) -> Result<()>;

    /// Human readable location of the store (a path, or `:memory:`).
    fn location(&self) -> String;
}

/// A collection read from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded<T> {
    /// The decoded records, in stored order.
    pub records: Vec<T>,
    /// Set when the stored value could not be decoded and was treated as empty.
    pub warning: Option<String>,
}

impl<T> Loaded<T> {
    fn clean(records: Vec<T>) -> Self {
        Self {
            records,
            warning: None,
        }
    }
}

impl<T: Record> Loaded<T> {
    /// The records, for a caller that is about to write the collection back.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnreadableCollection`] when the stored value failed to
    /// decode, since saving over it would lose the original data.
    pub fn into_writable(self) -> Result<Vec<T>> {
        match self.warning {
            None => Ok(self.records),
            Some(_) => Err(Error::UnreadableCollection {
                collection: T::COLLECTION.as_str(),
            }),
        }
    }
}

/// Load the collection for record type `T`.
///
/// A missing collection loads as empty. A collection that fails to decode
/// also loads as empty, with [`Loaded::warning`] describing the problem;
/// [`Loaded::into_writable`] refuses to hand such a collection to a writer.
///
/// # Errors
///
/// Returns an error only if the backend itself fails.
pub fn load<T: Record>(store: &dyn RecordStore) -> Result<Loaded<T>> {
    let key = T::COLLECTION;
    let Some(raw) = store.load_raw(key)? else {
        debug!("Collection {} is empty", key);
        return Ok(Loaded::clean(Vec::new()));
    };

    match serde_json::from_str::<Vec<T>>(&raw) {
        Ok(records) => {
            debug!("Loaded {} records from {}", records.len(), key);
            Ok(Loaded::clean(records))
        }
        Err(e) => {
            warn!("Collection {} is unreadable, treating it as empty: {}", key, e);
            Ok(Loaded {
                records: Vec::new(),
                warning: Some(format!(
                    "stored {key} data is unreadable ({e}); showing it as empty"
                )),
            })
        }
    }
}

/// Serialize `records` and overwrite the collection for `T`.
///
/// # Errors
///
/// Returns an error if serialization or the backend write fails.
pub fn save<T: Record>(store: &dyn RecordStore, records: &[T]) -> Result<()> {
    let raw = serde_json::to_string(records)?;
    store.save_raw(T::COLLECTION, &raw)?;
    debug!("Saved {} records to {}", records.len(), T::COLLECTION);
    Ok(())
}

/// Record counts across all collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    /// Where the store lives.
    pub location: String,
    /// Number of vehicles.
    pub vehicles: usize,
    /// Number of drivers.
    pub drivers: usize,
    /// Number of exits.
    pub exits: usize,
    /// Exits with no recorded return.
    pub exits_in_progress: usize,
    /// Warnings from collections that failed to decode.
    pub warnings: Vec<String>,
}

/// Gather statistics for the dashboard.
///
/// # Errors
///
/// Returns an error if the backend fails.
pub fn stats(store: &dyn RecordStore) -> Result<StoreStats> {
    let vehicles = load::<Vehicle>(store)?;
    let drivers = load::<Driver>(store)?;
    let exits = load::<VehicleExit>(store)?;

    let warnings = [vehicles.warning, drivers.warning, exits.warning]
        .into_iter()
        .flatten()
        .collect();

    Ok(StoreStats {
        location: store.location(),
        vehicles: vehicles.records.len(),
        drivers: drivers.records.len(),
        exits_in_progress: exits
            .records
            .iter()
            .filter(|exit| exit.is_in_progress())
            .count(),
        exits: exits.records.len(),
        warnings,
    })
}
