//! List views and confirmed deletion.
//!
//! Deletion is two-step: [`request_delete`] looks the record up and returns a
//! [`PendingDeletion`], which changes nothing until it is confirmed.
//! Deleting a vehicle or driver leaves exits that reference it untouched.

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::{Record, RecordId};
use crate::storage::{self, Loaded, RecordStore};

/// Load every record of type `T` in stored order.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn list<T: Record>(store: &dyn RecordStore) -> Result<Loaded<T>> {
    storage::load::<T>(store)
}

/// Find the record to delete and hold it until the user decides.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if no record has the identifier.
pub fn request_delete<T: Record>(
    store: &dyn RecordStore,
    id: RecordId,
) -> Result<PendingDeletion<T>> {
    let target = storage::load::<T>(store)?
        .records
        .into_iter()
        .find(|record| record.id() == id)
        .ok_or_else(|| not_found::<T>(id))?;
    debug!("Deletion of {} {} awaiting confirmation", T::COLLECTION, id);
    Ok(PendingDeletion { target })
}

/// A deletion that has been requested but not yet confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a pending deletion does nothing until confirmed"]
pub struct PendingDeletion<T> {
    target: T,
}

impl<T: Record> PendingDeletion<T> {
    /// The record that would be removed.
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Remove the record and persist the reduced collection.
    ///
    /// Returns the removed record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the record disappeared since the request,
    /// or a storage error.
    pub fn confirm(self, store: &dyn RecordStore) -> Result<T> {
        let id = self.target.id();
        let mut records = storage::load::<T>(store)?.into_writable()?;
        let before = records.len();
        records.retain(|record| record.id() != id);
        if records.len() == before {
            return Err(not_found::<T>(id));
        }

        storage::save(store, &records)?;
        info!("Deleted {} record {}", T::COLLECTION, id);
        Ok(self.target)
    }

    /// Abandon the deletion. The store is not touched.
    pub fn cancel(self) -> T {
        debug!("Deletion of {} {} cancelled", T::COLLECTION, self.target.id());
        self.target
    }
}

fn not_found<T: Record>(id: RecordId) -> Error {
    Error::NotFound {
        collection: T::COLLECTION.as_str(),
        id: id.get(),
    }
}
