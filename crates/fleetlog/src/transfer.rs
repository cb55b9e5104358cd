//! Raw JSON interchange for whole collections.
//!
//! The format is the one the browser application kept in local storage: a
//! JSON array of flat records. Imports are decoded against the target record
//! type before anything is written, so a bad file never replaces good data.

use tracing::info;

use crate::error::{Error, Result};
use crate::record::{CollectionKey, Driver, Record, RecordId, Vehicle, VehicleExit};
use crate::storage::{self, RecordStore};

/// Serialize a collection as pretty-printed JSON.
///
/// A collection that was never written exports as `[]`.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn export_collection(store: &dyn RecordStore, key: CollectionKey) -> Result<String> {
    match key {
        CollectionKey::Vehicles => export::<Vehicle>(store),
        CollectionKey::Drivers => export::<Driver>(store),
        CollectionKey::Exits => export::<VehicleExit>(store),
    }
}

/// Replace a collection with the records in `json`.
///
/// Returns the number of records imported.
///
/// # Errors
///
/// Returns [`Error::Json`] if `json` is not an array of the collection's
/// record type, [`Error::InvalidField`] if two records share an identifier,
/// or a storage error.
pub fn import_collection(store: &dyn RecordStore, key: CollectionKey, json: &str) -> Result<usize> {
    match key {
        CollectionKey::Vehicles => import::<Vehicle>(store, json),
        CollectionKey::Drivers => import::<Driver>(store, json),
        CollectionKey::Exits => import::<VehicleExit>(store, json),
    }
}

fn export<T: Record>(store: &dyn RecordStore) -> Result<String> {
    let loaded = storage::load::<T>(store)?;
    Ok(serde_json::to_string_pretty(&loaded.records)?)
}

fn import<T: Record>(store: &dyn RecordStore, json: &str) -> Result<usize> {
    let records: Vec<T> = serde_json::from_str(json)?;

    let mut seen: Vec<RecordId> = records.iter().map(Record::id).collect();
    seen.sort_unstable();
    if let Some(pair) = seen.windows(2).find(|pair| pair[0] == pair[1]) {
        return Err(Error::invalid_field(
            "id",
            format!("identifier {} appears more than once", pair[0]),
        ));
    }

    storage::save(store, &records)?;
    info!("Imported {} records into {}", records.len(), T::COLLECTION);
    Ok(records.len())
}
