use log::debug;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::Result;
use crate::model::StateSnapshot;
use crate::store::PersistentStore;

/// Holds the live snapshot and the store it is persisted to.
///
/// Snapshots are immutable once published. A mutation builds a new snapshot
/// from the current one, persists it and only then swaps it in, all while
/// holding the write lock, so racing mutations are applied one after the other
/// and a failed persist leaves the live snapshot untouched.
#[derive(Debug)]
pub struct StateContainer {
    current: Mutex<Arc<StateSnapshot>>,
    store: PersistentStore,
}

impl StateContainer {
    /// Initialize from whatever the store currently holds
    pub fn load(store: PersistentStore) -> Self {
        let snapshot = store.load();
        Self {
            current: Mutex::new(Arc::new(snapshot)),
            store,
        }
    }

    /// The currently published snapshot
    pub fn snapshot(&self) -> Arc<StateSnapshot> {
        Arc::clone(&self.current.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Apply `f` to the current snapshot.
    ///
    /// `f` returns the replacement snapshot together with the call's result,
    /// or `None` as the replacement to leave state (and storage) untouched.
    pub fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&StateSnapshot) -> Result<(Option<StateSnapshot>, T)>,
    {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        let (next, output) = f(&current)?;
        if let Some(next) = next {
            self.store.save(&next)?;
            *current = Arc::new(next);
            debug!("Published new snapshot to '{}'", self.store.key());
        }
        Ok(output)
    }

    /// Persist the current snapshot as-is and hand it back
    pub fn flush(&self) -> Result<Arc<StateSnapshot>> {
        let current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        self.store.save(&current)?;
        Ok(Arc::clone(&current))
    }

    pub fn store(&self) -> &PersistentStore {
        &self.store
    }
}
