pub mod codec;
mod storage;

pub use storage::{FileStorage, MemoryStorage, RecordStorage};

use log::{debug, warn};

use crate::error::{CooksyError, Result};
use crate::model::StateSnapshot;

/// Default key the snapshot record is stored under
pub const DEFAULT_STORAGE_KEY: &str = "cooksy-local-state";

/// Suffix of the key a corrupt record is copied to
pub const CORRUPT_SUFFIX: &str = ".corrupt";

/// Reads and writes the whole backend state as one JSON record
pub struct PersistentStore {
    storage: Box<dyn RecordStorage>,
    key: String,
    backup_corrupt: bool,
}

impl PersistentStore {
    /// Fails with `Validation` for an empty key or one ending in
    /// [`CORRUPT_SUFFIX`], which would alias another store's backup record.
    pub fn new(storage: Box<dyn RecordStorage>, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(CooksyError::Validation("Storage key required".to_string()));
        }
        if key.ends_with(CORRUPT_SUFFIX) {
            return Err(CooksyError::Validation(format!(
                "Storage key '{}' must not end with '{}'",
                key, CORRUPT_SUFFIX
            )));
        }
        Ok(Self {
            storage,
            key,
            backup_corrupt: false,
        })
    }

    /// Copy undecodable records to `<key>.corrupt` before they can be overwritten
    pub fn with_corrupt_backup(mut self, enabled: bool) -> Self {
        self.backup_corrupt = enabled;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage_name(&self) -> &str {
        self.storage.storage_name()
    }

    /// Load the stored snapshot.
    ///
    /// Never fails: a missing record, a storage read error or a record that
    /// does not decode all yield the empty snapshot. Decode failures are
    /// logged as warnings.
    pub fn load(&self) -> StateSnapshot {
        let raw = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No record under '{}', starting empty", self.key);
                return StateSnapshot::default();
            }
            Err(e) => {
                warn!("Failed to read record '{}': {}", self.key, e);
                return StateSnapshot::default();
            }
        };

        match codec::decode(&raw) {
            Ok(snapshot) => {
                debug!(
                    "Loaded '{}': {} ingredients, {} recipes, {} history entries",
                    self.key,
                    snapshot.ingredients.len(),
                    snapshot.recipes.len(),
                    snapshot.history.len()
                );
                snapshot
            }
            Err(e) => {
                warn!("Discarding corrupt record '{}': {}", self.key, e);
                if self.backup_corrupt {
                    self.backup(&raw);
                }
                StateSnapshot::default()
            }
        }
    }

    /// Overwrite the stored record with `snapshot`
    pub fn save(&self, snapshot: &StateSnapshot) -> Result<()> {
        let encoded = codec::encode(snapshot)?;
        self.storage.set_item(&self.key, &encoded)?;
        debug!("Saved '{}' ({} bytes)", self.key, encoded.len());
        Ok(())
    }

    /// Remove the stored record entirely
    pub fn clear(&self) -> Result<()> {
        self.storage.remove_item(&self.key)?;
        Ok(())
    }

    /// Raw record previously set aside by a corrupt load, if any
    pub fn corrupt_backup(&self) -> Result<Option<String>> {
        Ok(self.storage.get_item(&self.backup_key())?)
    }

    fn backup_key(&self) -> String {
        format!("{}{}", self.key, CORRUPT_SUFFIX)
    }

    fn backup(&self, raw: &str) {
        let backup_key = self.backup_key();
        match self.storage.set_item(&backup_key, raw) {
            Ok(()) => warn!("Corrupt record copied to '{}'", backup_key),
            Err(e) => warn!("Failed to back up corrupt record to '{}': {}", backup_key, e),
        }
    }
}

impl std::fmt::Debug for PersistentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentStore")
            .field("storage", &self.storage.storage_name())
            .field("key", &self.key)
            .field("backup_corrupt", &self.backup_corrupt)
            .finish()
    }
}
