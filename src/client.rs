//! Cached reads over a [`CooksyBackend`].
//!
//! Every read is cached under a [`QueryKey`] and served from the cache until
//! a [`Mutation`] that affects it succeeds. A failed mutation invalidates
//! nothing. A read whose key was invalidated while it was in flight returns
//! its result but does not cache it.

use log::debug;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::backend::CooksyBackend;
use crate::error::Result;
use crate::model::{HistoryEntry, Ingredient, Recipe};

/// Named read caches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Ingredients,
    Recipes,
    Favorites,
    History,
    /// Last set produced by [`QueryClient::analyze_and_save`]
    GeneratedRecipes,
}

impl QueryKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKey::Ingredients => "ingredients",
            QueryKey::Recipes => "recipes",
            QueryKey::Favorites => "favorites",
            QueryKey::History => "history",
            QueryKey::GeneratedRecipes => "generated-recipes",
        }
    }
}

/// Write operations, by what they invalidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    AddIngredient,
    AddMultipleIngredients,
    SaveRecipe,
    ToggleFavorite,
    AnalyzeIngredients,
    PhotoToIngredients,
    StorageTips,
    SafetyCheck,
    AddHistoryEntry,
}

impl Mutation {
    pub fn invalidates(&self) -> &'static [QueryKey] {
        match self {
            Mutation::AddIngredient | Mutation::AddMultipleIngredients => {
                &[QueryKey::Ingredients]
            }
            Mutation::SaveRecipe | Mutation::ToggleFavorite | Mutation::AnalyzeIngredients => {
                &[QueryKey::Recipes, QueryKey::Favorites]
            }
            Mutation::AddHistoryEntry => &[QueryKey::History],
            Mutation::PhotoToIngredients | Mutation::StorageTips | Mutation::SafetyCheck => &[],
        }
    }
}

#[derive(Debug, Clone)]
enum CachedQuery {
    Ingredients(Vec<Ingredient>),
    Recipes(Vec<Recipe>),
    History(Vec<HistoryEntry>),
}

#[derive(Debug, Default)]
struct QueryCache {
    entries: HashMap<QueryKey, CachedQuery>,
    /// Bumped on every invalidation of a key
    generations: HashMap<QueryKey, u64>,
}

impl QueryCache {
    fn generation(&self, key: QueryKey) -> u64 {
        self.generations.get(&key).copied().unwrap_or(0)
    }
}

/// Front-end side of the backend: cached reads, invalidating writes
pub struct QueryClient<B> {
    backend: B,
    cache: Mutex<QueryCache>,
}

impl<B: CooksyBackend> QueryClient<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            cache: Mutex::new(QueryCache::default()),
        }
    }

    /// Direct access to the backend, bypassing the cache
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    pub fn is_cached(&self, key: QueryKey) -> bool {
        self.with_cache(|cache| cache.entries.contains_key(&key))
    }

    pub fn invalidate(&self, keys: &[QueryKey]) {
        self.with_cache(|cache| {
            for key in keys {
                *cache.generations.entry(*key).or_insert(0) += 1;
                if cache.entries.remove(key).is_some() {
                    debug!("Invalidated '{}'", key.as_str());
                }
            }
        });
    }

    fn with_cache<T>(&self, f: impl FnOnce(&mut QueryCache) -> T) -> T {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cache)
    }

    /// Cached value for `key`, or the generation a fresh fetch must still
    /// match when it completes
    fn lookup(&self, key: QueryKey) -> std::result::Result<CachedQuery, u64> {
        self.with_cache(|cache| match cache.entries.get(&key) {
            Some(value) => Ok(value.clone()),
            None => Err(cache.generation(key)),
        })
    }

    /// Cache a fetched value unless `key` was invalidated since `generation`
    fn put_if_current(&self, key: QueryKey, generation: u64, value: CachedQuery) {
        self.with_cache(|cache| {
            if cache.generation(key) == generation {
                cache.entries.insert(key, value);
            } else {
                debug!("Dropped stale read of '{}'", key.as_str());
            }
        });
    }

    fn put(&self, key: QueryKey, value: CachedQuery) {
        self.with_cache(|cache| cache.entries.insert(key, value));
    }

    pub async fn ingredients(&self) -> Result<Vec<Ingredient>> {
        let generation = match self.lookup(QueryKey::Ingredients) {
            Ok(CachedQuery::Ingredients(ingredients)) => return Ok(ingredients),
            Ok(_) => 0,
            Err(generation) => generation,
        };
        let ingredients = self.backend.get_all_ingredients().await?;
        self.put_if_current(
            QueryKey::Ingredients,
            generation,
            CachedQuery::Ingredients(ingredients.clone()),
        );
        Ok(ingredients)
    }

    pub async fn recipes(&self) -> Result<Vec<Recipe>> {
        let generation = match self.lookup(QueryKey::Recipes) {
            Ok(CachedQuery::Recipes(recipes)) => return Ok(recipes),
            Ok(_) => 0,
            Err(generation) => generation,
        };
        let recipes = self.backend.get_all_recipes().await?;
        self.put_if_current(
            QueryKey::Recipes,
            generation,
            CachedQuery::Recipes(recipes.clone()),
        );
        Ok(recipes)
    }

    pub async fn favorites(&self) -> Result<Vec<Recipe>> {
        let generation = match self.lookup(QueryKey::Favorites) {
            Ok(CachedQuery::Recipes(recipes)) => return Ok(recipes),
            Ok(_) => 0,
            Err(generation) => generation,
        };
        let recipes = self.backend.get_favorite_recipes().await?;
        self.put_if_current(
            QueryKey::Favorites,
            generation,
            CachedQuery::Recipes(recipes.clone()),
        );
        Ok(recipes)
    }

    pub async fn history(&self) -> Result<Vec<HistoryEntry>> {
        let generation = match self.lookup(QueryKey::History) {
            Ok(CachedQuery::History(history)) => return Ok(history),
            Ok(_) => 0,
            Err(generation) => generation,
        };
        let history = self.backend.get_history().await?;
        self.put_if_current(
            QueryKey::History,
            generation,
            CachedQuery::History(history.clone()),
        );
        Ok(history)
    }

    /// Recipes from the last successful [`analyze_and_save`](Self::analyze_and_save),
    /// empty if there was none
    pub fn generated_recipes(&self) -> Vec<Recipe> {
        match self.lookup(QueryKey::GeneratedRecipes) {
            Ok(CachedQuery::Recipes(recipes)) => recipes,
            _ => Vec::new(),
        }
    }

    pub async fn add_ingredient(&self, name: &str, source: &str) -> Result<Ingredient> {
        let ingredient = self.backend.add_ingredient(name, source).await?;
        self.invalidate(Mutation::AddIngredient.invalidates());
        Ok(ingredient)
    }

    pub async fn add_multiple_ingredients(
        &self,
        names: &[String],
        source: &str,
    ) -> Result<Vec<Ingredient>> {
        let added = self.backend.add_multiple_ingredients(names, source).await?;
        self.invalidate(Mutation::AddMultipleIngredients.invalidates());
        Ok(added)
    }

    pub async fn save_recipe(&self, recipe: Recipe) -> Result<Recipe> {
        let saved = self.backend.save_recipe(recipe).await?;
        self.invalidate(Mutation::SaveRecipe.invalidates());
        Ok(saved)
    }

    pub async fn toggle_favorite(&self, recipe_id: &str) -> Result<Recipe> {
        let updated = self.backend.toggle_favorite(recipe_id).await?;
        self.invalidate(Mutation::ToggleFavorite.invalidates());
        Ok(updated)
    }

    /// Generate suggestions, save every one of them and remember the set
    /// under [`QueryKey::GeneratedRecipes`]
    pub async fn analyze_and_save(&self, ingredients: &[String]) -> Result<Vec<Recipe>> {
        let recipes = self.backend.analyze_ingredients(ingredients).await?;
        for recipe in &recipes {
            self.backend.save_recipe(recipe.clone()).await?;
        }
        self.invalidate(Mutation::AnalyzeIngredients.invalidates());
        self.put(
            QueryKey::GeneratedRecipes,
            CachedQuery::Recipes(recipes.clone()),
        );
        debug!("Generated and saved {} recipes", recipes.len());
        Ok(recipes)
    }

    pub async fn photo_to_ingredients(&self, image: &str) -> Result<Vec<String>> {
        self.backend.photo_to_ingredients(image).await
    }

    pub async fn storage_tips(&self, ingredients: &[String]) -> Result<Vec<String>> {
        self.backend.storage_tips(ingredients).await
    }

    pub async fn safety_check(&self, ingredients: &[String]) -> Result<Vec<String>> {
        self.backend.safety_check(ingredients).await
    }

    pub async fn add_history_entry(&self, ingredients: Vec<Ingredient>) -> Result<HistoryEntry> {
        let entry = self.backend.add_history_entry(ingredients).await?;
        self.invalidate(Mutation::AddHistoryEntry.invalidates());
        Ok(entry)
    }
}
