//! A short pantry session against an in-memory backend
//!
//! Shows the query client flow a front end would follow: add what is in the
//! fridge, ask for suggestions, favorite one and record the pantry in history.

use cooksy::{MockBackend, QueryClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let client = QueryClient::new(MockBackend::builder().memory().build()?);

    println!("=== Pantry ===");
    let names = vec!["Tomato".to_string(), "Cheese".to_string(), "  ".to_string()];
    for ingredient in client.add_multiple_ingredients(&names, "manual").await? {
        println!("{} ({})", ingredient.name, ingredient.id);
    }

    println!("\n=== Suggestions ===");
    let pantry: Vec<String> = client
        .ingredients()
        .await?
        .into_iter()
        .map(|i| i.name)
        .collect();
    let recipes = client.analyze_and_save(&pantry).await?;
    for recipe in &recipes {
        println!(
            "{}: {} min, {}, missing {}",
            recipe.title,
            recipe.prep_time,
            recipe.difficulty,
            recipe.missing_ingredients.join(", ")
        );
    }

    println!("\n=== Favorites ===");
    client.toggle_favorite(&recipes[0].id).await?;
    for recipe in client.favorites().await? {
        println!("{}", recipe.title);
    }

    println!("\n=== Advice ===");
    for tip in client.storage_tips(&pantry).await? {
        println!("- {}", tip);
    }
    for tip in client.safety_check(&pantry).await? {
        println!("- {}", tip);
    }

    let ingredients = client.ingredients().await?;
    let entry = client.add_history_entry(ingredients).await?;
    println!("\nRecorded history entry {}", entry.id);

    Ok(())
}
