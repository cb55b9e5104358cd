//! In-memory implementation of the `RecordStore` trait.
//!
//! Used by tests. Same semantics as the `SQLite` store, nothing persisted.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::Result;
use crate::record::CollectionKey;

use super::RecordStore;

/// In-memory store. All data is lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<CollectionKey, String>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn load_raw(&self, key: CollectionKey) -> Result<Option<String>> {
        Ok(self.values.borrow().get(&key).cloned())
    }

    fn save_raw(&self, key: CollectionKey, value: &str) -> Result<()> {
        self.values.borrow_mut().insert(key, value.to_string());
        Ok(())
    }

    fn location(&self) -> String {
        ":memory:".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(store.load_raw(CollectionKey::Exits).unwrap(), None);
    }

    #[test]
    fn test_overwrite() {
        let store = MemoryStore::new();
        store.save_raw(CollectionKey::Exits, "[1]").unwrap();
        store.save_raw(CollectionKey::Exits, "[2]").unwrap();
        assert_eq!(
            store.load_raw(CollectionKey::Exits).unwrap(),
            Some("[2]".to_string())
        );
    }
}
