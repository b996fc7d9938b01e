use log::debug;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Key/value medium holding serialized records
pub trait RecordStorage: Send + Sync {
    /// Get the storage name (e.g., "file", "memory")
    fn storage_name(&self) -> &str;

    fn get_item(&self, key: &str) -> io::Result<Option<String>>;

    /// Overwrite the record under `key` in one step
    fn set_item(&self, key: &str, value: &str) -> io::Result<()>;

    fn remove_item(&self, key: &str) -> io::Result<()>;
}

/// One `<key>.json` file per record inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding `key`. Keys are percent-encoded, so distinct keys never
    /// share a file and none can escape the directory.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", urlencoding::encode(key)))
    }
}

impl RecordStorage for FileStorage {
    fn storage_name(&self) -> &str {
        "file"
    }

    fn get_item(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        // Write beside the target and rename so readers never see a partial record
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// In-process storage. Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_items<T>(&self, f: impl FnOnce(&mut HashMap<String, String>) -> T) -> T {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut items)
    }
}

impl RecordStorage for MemoryStorage {
    fn storage_name(&self) -> &str {
        "memory"
    }

    fn get_item(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.with_items(|items| items.get(key).cloned()))
    }

    fn set_item(&self, key: &str, value: &str) -> io::Result<()> {
        self.with_items(|items| items.insert(key.to_string(), value.to_string()));
        Ok(())
    }

    fn remove_item(&self, key: &str) -> io::Result<()> {
        self.with_items(|items| items.remove(key));
        Ok(())
    }
}
