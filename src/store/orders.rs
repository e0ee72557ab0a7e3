//! InMemoryOrderStore - HashMap-backed order records.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{OrderStore, Record, StoreError};

/// In-memory order store. Clones share the same map.
#[derive(Clone)]
pub struct InMemoryOrderStore<O> {
    records: Arc<RwLock<HashMap<String, O>>>,
}

impl<O> Default for InMemoryOrderStore<O> {
    fn default() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<O: Record> InMemoryOrderStore<O> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(records: impl IntoIterator<Item = O>) -> Self {
        let map = records
            .into_iter()
            .map(|r| (r.id().to_string(), r))
            .collect();
        Self {
            records: Arc::new(RwLock::new(map)),
        }
    }

    /// All records, in no particular order.
    pub fn all(&self) -> Result<Vec<O>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::LockPoisoned("order list"))?;
        Ok(records.values().cloned().collect())
    }
}

impl<O: Record> OrderStore<O> for InMemoryOrderStore<O> {
    fn get(&self, id: &str) -> Result<Option<O>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::LockPoisoned("order get"))?;
        Ok(records.get(id).cloned())
    }

    fn insert(&self, record: O) -> Result<(), StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::LockPoisoned("order insert"))?;

        if records.contains_key(record.id()) {
            return Err(StoreError::Duplicate {
                collection: O::COLLECTION,
                id: record.id().to_string(),
            });
        }

        records.insert(record.id().to_string(), record);
        Ok(())
    }

    fn update(&self, id: &str, apply: &mut dyn FnMut(&mut O)) -> Result<Option<O>, StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::LockPoisoned("order update"))?;

        Ok(records.get_mut(id).map(|record| {
            apply(record);
            record.clone()
        }))
    }

    fn len(&self) -> Result<usize, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::LockPoisoned("order count"))?;
        Ok(records.len())
    }
}
