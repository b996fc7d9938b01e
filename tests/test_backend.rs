use cooksy::{CooksyBackend, MemoryStorage, MockBackend, Recipe};

fn backend() -> MockBackend {
    MockBackend::builder().memory().build().unwrap()
}

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn recipe(id: &str, title: &str) -> Recipe {
    Recipe {
        id: id.to_string(),
        title: title.to_string(),
        ingredients_used: names(&["Rice"]),
        missing_ingredients: vec![],
        steps: names(&["Boil."]),
        prep_time: 15,
        difficulty: "Easy".to_string(),
        saved: false,
    }
}

#[tokio::test]
async fn test_add_ingredient_trims_and_appends() {
    let backend = backend();
    for (i, raw) in ["Tomato", "  Basil  ", "\tGreen beans\n"].iter().enumerate() {
        let before = backend.get_all_ingredients().await.unwrap();
        let added = backend.add_ingredient(raw, "manual").await.unwrap();
        let after = backend.get_all_ingredients().await.unwrap();

        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(after.len(), i + 1);
        assert_eq!(added.name, raw.trim());
        assert_eq!(after.last(), Some(&added));
    }
}

#[tokio::test]
async fn test_add_ingredient_rejects_blank_name() {
    let backend = backend();
    for blank in ["", "   ", "\n\t"] {
        let err = backend.add_ingredient(blank, "manual").await.unwrap_err();
        assert!(err.is_validation());
    }
    assert!(backend.get_all_ingredients().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_add_multiple_ingredients_empty_inputs() {
    let backend = backend();
    backend.add_ingredient("Egg", "manual").await.unwrap();

    let none = backend.add_multiple_ingredients(&[], "manual").await.unwrap();
    assert!(none.is_empty());

    let blanks = backend
        .add_multiple_ingredients(&names(&["  ", ""]), "manual")
        .await
        .unwrap();
    assert!(blanks.is_empty());

    let all = backend.get_all_ingredients().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Egg");
}

#[tokio::test]
async fn test_add_multiple_ingredients_filters_and_keeps_order() {
    let backend = backend();
    let added = backend
        .add_multiple_ingredients(&names(&[" Milk", "", "Oats ", "  "]), "photo")
        .await
        .unwrap();

    let added_names: Vec<&str> = added.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(added_names, vec!["Milk", "Oats"]);
    assert!(added.iter().all(|i| i.source == "photo"));
    assert_ne!(added[0].id, added[1].id);
    assert_eq!(backend.get_all_ingredients().await.unwrap(), added);
}

#[tokio::test]
async fn test_save_recipe_inserts_then_replaces_in_place() {
    let backend = backend();
    backend.save_recipe(recipe("r1", "Soup")).await.unwrap();
    backend.save_recipe(recipe("r2", "Stew")).await.unwrap();

    let renamed = backend.save_recipe(recipe("r1", "Better soup")).await.unwrap();
    assert_eq!(renamed.title, "Better soup");

    let recipes = backend.get_all_recipes().await.unwrap();
    let titles: Vec<&str> = recipes.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Better soup", "Stew"]);
}

#[tokio::test]
async fn test_toggle_favorite_is_its_own_inverse() {
    let backend = backend();
    backend.save_recipe(recipe("r1", "Soup")).await.unwrap();
    let before = backend.snapshot();

    let first = backend.toggle_favorite("r1").await.unwrap();
    assert!(first.saved);
    assert_eq!(backend.get_favorite_recipes().await.unwrap(), vec![first]);

    let second = backend.toggle_favorite("r1").await.unwrap();
    assert!(!second.saved);
    assert!(backend.get_favorite_recipes().await.unwrap().is_empty());

    assert_eq!(*backend.snapshot(), *before);
}

#[tokio::test]
async fn test_toggle_favorite_unknown_id() {
    let storage = MemoryStorage::new();
    let backend = MockBackend::builder()
        .memory_storage(storage.clone())
        .build()
        .unwrap();
    backend.save_recipe(recipe("r1", "Soup")).await.unwrap();
    let before = backend.snapshot();
    let stored_before = cooksy::RecordStorage::get_item(&storage, "cooksy-local-state").unwrap();

    let err = backend.toggle_favorite("nonexistent-id").await.unwrap_err();
    assert!(err.is_not_found());
    assert!(!err.is_validation());

    assert_eq!(*backend.snapshot(), *before);
    let stored_after = cooksy::RecordStorage::get_item(&storage, "cooksy-local-state").unwrap();
    assert_eq!(stored_before, stored_after);
}

#[tokio::test]
async fn test_favorites_are_a_subsequence() {
    let backend = backend();
    for (id, title) in [("a", "A"), ("b", "B"), ("c", "C")] {
        backend.save_recipe(recipe(id, title)).await.unwrap();
    }
    backend.toggle_favorite("c").await.unwrap();
    backend.toggle_favorite("a").await.unwrap();

    let ids: Vec<String> = backend
        .get_favorite_recipes()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, names(&["a", "c"]));
}

#[tokio::test]
async fn test_analyze_ingredients_is_not_persisted() {
    let backend = backend();
    let recipes = backend
        .analyze_ingredients(&names(&["egg", "flour"]))
        .await
        .unwrap();

    assert_eq!(recipes.len(), 4);
    assert_eq!(recipes[0].missing_ingredients, names(&["Olive Oil"]));
    assert_eq!(recipes[3].difficulty, "Medium");
    assert_eq!(recipes[3].prep_time, 35);
    assert!(recipes.iter().all(|r| r.ingredients_used == names(&["egg", "flour"])));
    assert!(backend.get_all_recipes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_canned_advice() {
    let backend = backend();
    assert_eq!(
        backend.photo_to_ingredients("anything").await.unwrap(),
        names(&["Tomato", "Cheese", "Bread"])
    );
    assert_eq!(
        backend.storage_tips(&names(&["Milk"])).await.unwrap(),
        names(&["Store Milk in a cool, dry place and use within a week."])
    );
    let safety = backend.safety_check(&names(&["Pork", "Beans"])).await.unwrap();
    assert_eq!(safety.len(), 2);
    assert!(safety[1].contains("Pork"));
}

#[tokio::test]
async fn test_history_is_most_recent_first_and_copied() {
    let backend = backend();
    let egg = backend.add_ingredient("Egg", "manual").await.unwrap();
    let first = backend.add_history_entry(vec![egg.clone()]).await.unwrap();

    let milk = backend.add_ingredient("Milk", "manual").await.unwrap();
    let second = backend
        .add_history_entry(backend.get_all_ingredients().await.unwrap())
        .await
        .unwrap();

    let history = backend.get_history().await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, second.id);
    assert_eq!(history[1].id, first.id);
    assert_eq!(history[0].ingredient_list, vec![egg.clone(), milk]);

    // Later ingredient additions do not leak into captured entries
    backend.add_ingredient("Kale", "manual").await.unwrap();
    let history = backend.get_history().await.unwrap();
    assert_eq!(history[1].ingredient_list, vec![egg]);
    assert_eq!(history[0].ingredient_list.len(), 2);
}

#[tokio::test]
async fn test_empty_history_entry_is_allowed() {
    let backend = backend();
    let entry = backend.add_history_entry(vec![]).await.unwrap();
    assert!(entry.ingredient_list.is_empty());
    assert!(entry.id.starts_with("history-"));
    assert_eq!(backend.get_history().await.unwrap().len(), 1);
}
