//! In-memory record store with snapshot rollback
//!
//! `MemoryStore` keeps records as attribute maps keyed by id. It is also a
//! [`UnitOfWork`]: `begin` snapshots the whole store, `rollback` restores the
//! snapshot, `commit` drops it. Writes are visible immediately to readers of
//! the same store, as they would be on a single database connection.
//!

use crate::unit_of_work::UnitOfWork;
use formwork_core::error::{FormError, Result};
use formwork_core::value::Attributes;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use tracing::trace;

#[derive(Debug, Default)]
struct StoreState {
    records: BTreeMap<String, Attributes>,
    snapshot: Option<BTreeMap<String, Attributes>>,
    next_id: u64,
}

/// Thread-safe in-memory record store
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a fresh record id
    pub fn allocate_id(&self) -> String {
        let mut state = self.state.lock();
        state.next_id += 1;
        state.next_id.to_string()
    }

    /// Insert or replace the record at `id`
    pub fn put(&self, id: impl Into<String>, attributes: Attributes) {
        let id = id.into();
        trace!(%id, "store put");
        self.state.lock().records.insert(id, attributes);
    }

    /// Read the record at `id`
    pub fn get(&self, id: &str) -> Option<Attributes> {
        self.state.lock().records.get(id).cloned()
    }

    /// Remove the record at `id`, returning it if present
    pub fn delete(&self, id: &str) -> Option<Attributes> {
        self.state.lock().records.remove(id)
    }

    /// Ids of every stored record
    pub fn ids(&self) -> Vec<String> {
        self.state.lock().records.keys().cloned().collect()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.state.lock().records.len()
    }

    /// True if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.state.lock().records.is_empty()
    }

    /// True while a transaction is open
    pub fn in_transaction(&self) -> bool {
        self.state.lock().snapshot.is_some()
    }
}

impl UnitOfWork for MemoryStore {
    fn begin(&self) -> Result<()> {
        let mut state = self.state.lock();
        if state.snapshot.is_some() {
            return Err(FormError::Transaction(
                "MemoryStore already has an open transaction".to_string(),
            ));
        }
        state.snapshot = Some(state.records.clone());
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        let mut state = self.state.lock();
        match state.snapshot.take() {
            Some(_) => Ok(()),
            None => Err(FormError::Transaction(
                "MemoryStore commit without open transaction".to_string(),
            )),
        }
    }

    fn rollback(&self) -> Result<()> {
        let mut state = self.state.lock();
        match state.snapshot.take() {
            Some(snapshot) => {
                state.records = snapshot;
                Ok(())
            }
            None => Err(FormError::Transaction(
                "MemoryStore rollback without open transaction".to_string(),
            )),
        }
    }
}
