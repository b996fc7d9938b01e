use async_trait::async_trait;
use cooksy::{
    CooksyBackend, HistoryEntry, Ingredient, MockBackend, QueryClient, QueryKey, Recipe, Result,
};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// Backend whose ingredient read pauses after fetching until released
struct GatedBackend {
    inner: MockBackend,
    reached: Mutex<Option<oneshot::Sender<()>>>,
    release: Mutex<Option<oneshot::Receiver<()>>>,
}

#[async_trait]
impl CooksyBackend for GatedBackend {
    async fn add_ingredient(&self, name: &str, source: &str) -> Result<Ingredient> {
        self.inner.add_ingredient(name, source).await
    }

    async fn add_multiple_ingredients(
        &self,
        names: &[String],
        source: &str,
    ) -> Result<Vec<Ingredient>> {
        self.inner.add_multiple_ingredients(names, source).await
    }

    async fn get_all_ingredients(&self) -> Result<Vec<Ingredient>> {
        let ingredients = self.inner.get_all_ingredients().await?;
        let reached = self.reached.lock().unwrap().take();
        let release = self.release.lock().unwrap().take();
        if let (Some(reached), Some(release)) = (reached, release) {
            reached.send(()).unwrap();
            release.await.unwrap();
        }
        Ok(ingredients)
    }

    async fn save_recipe(&self, recipe: Recipe) -> Result<Recipe> {
        self.inner.save_recipe(recipe).await
    }

    async fn get_all_recipes(&self) -> Result<Vec<Recipe>> {
        self.inner.get_all_recipes().await
    }

    async fn toggle_favorite(&self, recipe_id: &str) -> Result<Recipe> {
        self.inner.toggle_favorite(recipe_id).await
    }

    async fn get_favorite_recipes(&self) -> Result<Vec<Recipe>> {
        self.inner.get_favorite_recipes().await
    }

    async fn analyze_ingredients(&self, ingredients: &[String]) -> Result<Vec<Recipe>> {
        self.inner.analyze_ingredients(ingredients).await
    }

    async fn photo_to_ingredients(&self, image: &str) -> Result<Vec<String>> {
        self.inner.photo_to_ingredients(image).await
    }

    async fn storage_tips(&self, ingredients: &[String]) -> Result<Vec<String>> {
        self.inner.storage_tips(ingredients).await
    }

    async fn safety_check(&self, ingredients: &[String]) -> Result<Vec<String>> {
        self.inner.safety_check(ingredients).await
    }

    async fn add_history_entry(&self, ingredients: Vec<Ingredient>) -> Result<HistoryEntry> {
        self.inner.add_history_entry(ingredients).await
    }

    async fn get_history(&self) -> Result<Vec<HistoryEntry>> {
        self.inner.get_history().await
    }
}

fn client() -> QueryClient<MockBackend> {
    QueryClient::new(MockBackend::builder().memory().build().unwrap())
}

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_reads_are_served_from_cache_until_invalidated() {
    let client = client();
    assert!(client.ingredients().await.unwrap().is_empty());
    assert!(client.is_cached(QueryKey::Ingredients));

    // Writing behind the client's back leaves the cached read stale
    client.backend().add_ingredient("Egg", "manual").await.unwrap();
    assert!(client.ingredients().await.unwrap().is_empty());

    client.invalidate(&[QueryKey::Ingredients]);
    assert_eq!(client.ingredients().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_add_ingredient_invalidates_ingredients_only() {
    let client = client();
    client.ingredients().await.unwrap();
    client.history().await.unwrap();

    client.add_ingredient("Rice", "manual").await.unwrap();
    assert!(!client.is_cached(QueryKey::Ingredients));
    assert!(client.is_cached(QueryKey::History));

    client.add_multiple_ingredients(&names(&["Peas"]), "manual").await.unwrap();
    assert_eq!(client.ingredients().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_failed_mutation_invalidates_nothing() {
    let client = client();
    client.ingredients().await.unwrap();
    client.recipes().await.unwrap();
    client.favorites().await.unwrap();

    assert!(client.add_ingredient("   ", "manual").await.is_err());
    assert!(client.toggle_favorite("missing").await.is_err());

    assert!(client.is_cached(QueryKey::Ingredients));
    assert!(client.is_cached(QueryKey::Recipes));
    assert!(client.is_cached(QueryKey::Favorites));
}

#[tokio::test]
async fn test_analyze_and_save_persists_generated_recipes() {
    let client = client();
    assert!(client.recipes().await.unwrap().is_empty());
    assert!(client.generated_recipes().is_empty());

    let generated = client
        .analyze_and_save(&names(&["Tomato", "Cheese"]))
        .await
        .unwrap();

    assert_eq!(generated.len(), 4);
    assert_eq!(client.generated_recipes(), generated);
    assert_eq!(client.recipes().await.unwrap(), generated);
}

#[tokio::test]
async fn test_toggle_favorite_refreshes_recipes_and_favorites() {
    let client = client();
    let generated = client.analyze_and_save(&names(&["Egg"])).await.unwrap();
    assert!(client.favorites().await.unwrap().is_empty());
    client.recipes().await.unwrap();

    let toggled = client.toggle_favorite(&generated[2].id).await.unwrap();
    assert!(toggled.saved);
    assert!(!client.is_cached(QueryKey::Recipes));
    assert!(!client.is_cached(QueryKey::Favorites));

    assert_eq!(client.favorites().await.unwrap(), vec![toggled.clone()]);
    let recipes = client.recipes().await.unwrap();
    assert!(recipes[2].saved);
    assert_eq!(recipes.iter().filter(|r| r.saved).count(), 1);
}

#[tokio::test]
async fn test_advice_calls_leave_caches_alone() {
    let client = client();
    client.ingredients().await.unwrap();

    let detected = client.photo_to_ingredients("data:image/png;base64,").await.unwrap();
    client.storage_tips(&detected).await.unwrap();
    client.safety_check(&detected).await.unwrap();

    assert!(client.is_cached(QueryKey::Ingredients));
}

#[tokio::test]
async fn test_history_invalidation() {
    let client = client();
    assert!(client.history().await.unwrap().is_empty());

    client.add_ingredient("Corn", "manual").await.unwrap();
    let ingredients = client.ingredients().await.unwrap();
    client.add_history_entry(ingredients).await.unwrap();

    assert!(!client.is_cached(QueryKey::History));
    assert_eq!(client.history().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_read_in_flight_during_invalidation_is_not_cached() {
    let (reached_tx, reached_rx) = oneshot::channel();
    let (release_tx, release_rx) = oneshot::channel();
    let client = Arc::new(QueryClient::new(GatedBackend {
        inner: MockBackend::builder().memory().build().unwrap(),
        reached: Mutex::new(Some(reached_tx)),
        release: Mutex::new(Some(release_rx)),
    }));

    let reader = tokio::spawn({
        let client = Arc::clone(&client);
        async move { client.ingredients().await }
    });

    // The read has fetched the empty list and is parked
    reached_rx.await.unwrap();
    client.add_ingredient("Egg", "manual").await.unwrap();
    release_tx.send(()).unwrap();

    let stale = reader.await.unwrap().unwrap();
    assert!(stale.is_empty());
    assert!(!client.is_cached(QueryKey::Ingredients));

    let fresh = client.ingredients().await.unwrap();
    assert_eq!(fresh.len(), 1);
    assert_eq!(fresh[0].name, "Egg");
    assert!(client.is_cached(QueryKey::Ingredients));
}
