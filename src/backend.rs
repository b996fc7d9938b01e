use async_trait::async_trait;
use log::{debug, info};
use std::path::PathBuf;
use std::sync::Arc;

use crate::advisor::{AdvisorFactory, KitchenAdvisor};
use crate::config::{CooksyConfig, StorageBackend};
use crate::error::{CooksyError, Result};
use crate::model::{HistoryEntry, Ingredient, Recipe, StateSnapshot};
use crate::state::StateContainer;
use crate::store::{
    FileStorage, MemoryStorage, PersistentStore, RecordStorage, DEFAULT_STORAGE_KEY,
};

/// Uniform async surface the front end talks to.
///
/// Every operation returns [`Result`] even where it cannot fail today, so a
/// networked implementation can replace [`MockBackend`] without touching
/// call sites.
#[async_trait]
pub trait CooksyBackend: Send + Sync {
    /// Record one ingredient. Fails with `Validation` if `name` is blank.
    async fn add_ingredient(&self, name: &str, source: &str) -> Result<Ingredient>;

    /// Record every non-blank name; blank names are skipped, not rejected
    async fn add_multiple_ingredients(
        &self,
        names: &[String],
        source: &str,
    ) -> Result<Vec<Ingredient>>;

    async fn get_all_ingredients(&self) -> Result<Vec<Ingredient>>;

    /// Insert, or replace in place the recipe with the same id
    async fn save_recipe(&self, recipe: Recipe) -> Result<Recipe>;

    async fn get_all_recipes(&self) -> Result<Vec<Recipe>>;

    /// Flip `saved`. Fails with `NotFound` for an unknown id.
    async fn toggle_favorite(&self, recipe_id: &str) -> Result<Recipe>;

    async fn get_favorite_recipes(&self) -> Result<Vec<Recipe>>;

    /// Suggest recipes without saving them
    async fn analyze_ingredients(&self, ingredients: &[String]) -> Result<Vec<Recipe>>;

    async fn photo_to_ingredients(&self, image: &str) -> Result<Vec<String>>;

    async fn storage_tips(&self, ingredients: &[String]) -> Result<Vec<String>>;

    async fn safety_check(&self, ingredients: &[String]) -> Result<Vec<String>>;

    /// Prepend a history entry holding its own copy of `ingredients`
    async fn add_history_entry(&self, ingredients: Vec<Ingredient>) -> Result<HistoryEntry>;

    /// Most recent first
    async fn get_history(&self) -> Result<Vec<HistoryEntry>>;
}

/// Local backend: state lives in one persisted record, suggestions come from
/// a [`KitchenAdvisor`]
pub struct MockBackend {
    state: StateContainer,
    advisor: Box<dyn KitchenAdvisor>,
}

impl MockBackend {
    /// Open a backend over `store`, loading whatever it holds
    pub fn new(store: PersistentStore, advisor: Box<dyn KitchenAdvisor>) -> Self {
        info!(
            "Opening backend on {} storage, key '{}'",
            store.storage_name(),
            store.key()
        );
        Self {
            state: StateContainer::load(store),
            advisor,
        }
    }

    pub fn builder() -> MockBackendBuilder {
        MockBackendBuilder::default()
    }

    /// Open a backend as described by `config`
    pub fn from_config(config: &CooksyConfig) -> Result<Self> {
        MockBackendBuilder::default().config(config).build()
    }

    /// Current snapshot, shared and immutable
    pub fn snapshot(&self) -> Arc<StateSnapshot> {
        self.state.snapshot()
    }

    /// Out-of-band reset: drop every collection and remove the stored record
    pub fn reset(&self) -> Result<()> {
        self.state.update(|_| Ok((Some(StateSnapshot::default()), ())))?;
        self.state.store().clear()?;
        info!("Backend state reset");
        Ok(())
    }

    /// Persist the final snapshot and shut the backend down
    pub fn close(self) -> Result<StateSnapshot> {
        let snapshot = self.state.flush()?;
        info!("Closed backend, key '{}'", self.state.store().key());
        Ok(Arc::unwrap_or_clone(snapshot))
    }
}

impl std::fmt::Debug for MockBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockBackend")
            .field("state", &self.state)
            .field("advisor", &self.advisor.advisor_name())
            .finish()
    }
}

#[async_trait]
impl CooksyBackend for MockBackend {
    async fn add_ingredient(&self, name: &str, source: &str) -> Result<Ingredient> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CooksyError::Validation(
                "Ingredient name required".to_string(),
            ));
        }

        let ingredient = Ingredient::new(trimmed, source);
        self.state.update(|current| {
            let mut ingredients = current.ingredients.clone();
            ingredients.push(ingredient.clone());
            let next = StateSnapshot {
                ingredients,
                recipes: current.recipes.clone(),
                history: current.history.clone(),
            };
            Ok((Some(next), ()))
        })?;
        debug!("Added ingredient '{}' ({})", ingredient.name, ingredient.source);
        Ok(ingredient)
    }

    async fn add_multiple_ingredients(
        &self,
        names: &[String],
        source: &str,
    ) -> Result<Vec<Ingredient>> {
        let added: Vec<Ingredient> = names
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(|name| Ingredient::new(name, source))
            .collect();
        if added.is_empty() {
            return Ok(added);
        }

        self.state.update(|current| {
            let mut ingredients = current.ingredients.clone();
            ingredients.extend(added.iter().cloned());
            let next = StateSnapshot {
                ingredients,
                recipes: current.recipes.clone(),
                history: current.history.clone(),
            };
            Ok((Some(next), ()))
        })?;
        debug!("Added {} ingredients from {}", added.len(), source);
        Ok(added)
    }

    async fn get_all_ingredients(&self) -> Result<Vec<Ingredient>> {
        Ok(self.state.snapshot().ingredients.clone())
    }

    async fn save_recipe(&self, recipe: Recipe) -> Result<Recipe> {
        self.state.update(|current| {
            let mut recipes = current.recipes.clone();
            match recipes.iter().position(|r| r.id == recipe.id) {
                Some(index) => recipes[index] = recipe.clone(),
                None => recipes.push(recipe.clone()),
            }
            let next = StateSnapshot {
                ingredients: current.ingredients.clone(),
                recipes,
                history: current.history.clone(),
            };
            Ok((Some(next), ()))
        })?;
        debug!("Saved recipe {}", recipe.id);
        Ok(recipe)
    }

    async fn get_all_recipes(&self) -> Result<Vec<Recipe>> {
        Ok(self.state.snapshot().recipes.clone())
    }

    async fn toggle_favorite(&self, recipe_id: &str) -> Result<Recipe> {
        let updated = self.state.update(|current| {
            let recipe = current
                .find_recipe(recipe_id)
                .ok_or_else(|| CooksyError::NotFound(format!("Recipe {}", recipe_id)))?;
            let updated = Recipe {
                saved: !recipe.saved,
                ..recipe.clone()
            };
            let recipes = current
                .recipes
                .iter()
                .map(|r| {
                    if r.id == recipe_id {
                        updated.clone()
                    } else {
                        r.clone()
                    }
                })
                .collect();
            let next = StateSnapshot {
                ingredients: current.ingredients.clone(),
                recipes,
                history: current.history.clone(),
            };
            Ok((Some(next), updated))
        })?;
        debug!("Recipe {} saved={}", updated.id, updated.saved);
        Ok(updated)
    }

    async fn get_favorite_recipes(&self) -> Result<Vec<Recipe>> {
        Ok(self
            .state
            .snapshot()
            .recipes
            .iter()
            .filter(|r| r.saved)
            .cloned()
            .collect())
    }

    async fn analyze_ingredients(&self, ingredients: &[String]) -> Result<Vec<Recipe>> {
        self.advisor.analyze(ingredients).await
    }

    async fn photo_to_ingredients(&self, image: &str) -> Result<Vec<String>> {
        self.advisor.detect_ingredients(image).await
    }

    async fn storage_tips(&self, ingredients: &[String]) -> Result<Vec<String>> {
        self.advisor.storage_tips(ingredients).await
    }

    async fn safety_check(&self, ingredients: &[String]) -> Result<Vec<String>> {
        self.advisor.safety_check(ingredients).await
    }

    async fn add_history_entry(&self, ingredients: Vec<Ingredient>) -> Result<HistoryEntry> {
        let entry = HistoryEntry::new(ingredients);
        self.state.update(|current| {
            let mut history = Vec::with_capacity(current.history.len() + 1);
            history.push(entry.clone());
            history.extend(current.history.iter().cloned());
            let next = StateSnapshot {
                ingredients: current.ingredients.clone(),
                recipes: current.recipes.clone(),
                history,
            };
            Ok((Some(next), ()))
        })?;
        debug!(
            "Recorded history entry {} with {} ingredients",
            entry.id,
            entry.ingredient_list.len()
        );
        Ok(entry)
    }

    async fn get_history(&self) -> Result<Vec<HistoryEntry>> {
        Ok(self.state.snapshot().history.clone())
    }
}

/// Represents where the backend keeps its record
#[derive(Debug, Clone)]
enum StorageTarget {
    /// Directory of record files
    File(PathBuf),
    /// Private or shared in-process storage
    Memory(MemoryStorage),
}

/// Builder for configuring and opening a [`MockBackend`]
#[derive(Debug, Default)]
pub struct MockBackendBuilder {
    target: Option<StorageTarget>,
    key: Option<String>,
    backup_corrupt: bool,
    advisor: Option<String>,
}

impl MockBackendBuilder {
    /// Keep the record in `<dir>/<key>.json`
    ///
    /// # Example
    /// ```
    /// use cooksy::MockBackend;
    ///
    /// let builder = MockBackend::builder().file(".cooksy");
    /// ```
    pub fn file(mut self, dir: impl Into<PathBuf>) -> Self {
        self.target = Some(StorageTarget::File(dir.into()));
        self
    }

    /// Keep the record in a fresh, private in-memory storage
    pub fn memory(mut self) -> Self {
        self.target = Some(StorageTarget::Memory(MemoryStorage::new()));
        self
    }

    /// Keep the record in an existing in-memory storage, shared with its clones
    ///
    /// # Example
    /// ```
    /// use cooksy::{MemoryStorage, MockBackend};
    ///
    /// let storage = MemoryStorage::new();
    /// let builder = MockBackend::builder().memory_storage(storage.clone());
    /// ```
    pub fn memory_storage(mut self, storage: MemoryStorage) -> Self {
        self.target = Some(StorageTarget::Memory(storage));
        self
    }

    /// Set the key the record is stored under
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Copy undecodable records to `<key>.corrupt` on load
    pub fn backup_corrupt(mut self, enabled: bool) -> Self {
        self.backup_corrupt = enabled;
        self
    }

    /// Select the advisor by name (see [`AdvisorFactory::available_advisors`])
    pub fn advisor(mut self, name: impl Into<String>) -> Self {
        self.advisor = Some(name.into());
        self
    }

    /// Apply every setting from `config`
    pub fn config(self, config: &CooksyConfig) -> Self {
        let storage = &config.storage;
        let builder = match storage.backend {
            StorageBackend::File => self.file(storage.path.clone()),
            StorageBackend::Memory => self.memory(),
        };
        builder
            .storage_key(storage.key.clone())
            .backup_corrupt(storage.backup_corrupt)
            .advisor(config.advisor.clone())
    }

    /// Build the store, load it and open the backend
    ///
    /// # Errors
    /// Returns `CooksyError::UnknownAdvisor` if the advisor name is not known,
    /// or `CooksyError::Validation` if the storage key is not usable.
    /// Storage problems never fail here; an unreadable record opens empty.
    ///
    /// # Example
    /// ```
    /// # use cooksy::MockBackend;
    /// let backend = MockBackend::builder().memory().build().unwrap();
    /// assert!(backend.snapshot().is_empty());
    /// ```
    pub fn build(self) -> Result<MockBackend> {
        let advisor = AdvisorFactory::create(self.advisor.as_deref().unwrap_or("canned"))?;

        let storage: Box<dyn RecordStorage> = match self.target {
            Some(StorageTarget::File(dir)) => Box::new(FileStorage::new(dir)),
            Some(StorageTarget::Memory(storage)) => Box::new(storage),
            None => Box::new(MemoryStorage::new()),
        };
        let key = self
            .key
            .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());
        let store = PersistentStore::new(storage, key)?.with_corrupt_backup(self.backup_corrupt);

        Ok(MockBackend::new(store, advisor))
    }
}
