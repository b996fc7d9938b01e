pub mod advisor;
pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod state;
pub mod store;

pub use advisor::{image_data_url, AdvisorFactory, CannedAdvisor, KitchenAdvisor};
pub use backend::{CooksyBackend, MockBackend, MockBackendBuilder};
pub use client::{Mutation, QueryClient, QueryKey};
pub use config::{CooksyConfig, StorageBackend, StorageConfig};
pub use error::{CooksyError, Result};
pub use model::{HistoryEntry, Ingredient, Recipe, StateSnapshot, Timestamp};
pub use store::{FileStorage, MemoryStorage, PersistentStore, RecordStorage};

/// Open a backend from `cooksy.toml` and `COOKSY__*` environment variables
pub fn open_backend() -> Result<MockBackend> {
    let config = CooksyConfig::load()?;
    MockBackend::from_config(&config)
}
