use clap::{Parser, Subcommand};
use log::debug;
use std::path::{Path, PathBuf};

use cooksy::{
    image_data_url, CooksyConfig, Ingredient, MockBackend, QueryClient, Recipe, StorageBackend,
};

#[derive(Parser)]
#[command(name = "cooksy")]
#[command(about = "Track what is in the pantry and turn it into meals before it goes off")]
struct Cli {
    /// Configuration file (defaults to ./cooksy.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Keep state in memory for this run only
    #[arg(long, global = true)]
    memory: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add one ingredient
    Add {
        name: String,
        #[arg(long, default_value = "manual")]
        source: String,
    },
    /// Add several ingredients at once
    AddMany {
        names: Vec<String>,
        #[arg(long, default_value = "manual")]
        source: String,
    },
    /// List ingredients
    Ingredients,
    /// List saved recipes
    Recipes,
    /// Suggest recipes and save them (uses current ingredients when none given)
    Analyze { names: Vec<String> },
    /// Toggle a recipe's favorite flag
    Favorite { recipe_id: String },
    /// List favorite recipes
    Favorites,
    /// Detect ingredients in a photo and add them
    Photo { file: PathBuf },
    /// Storage advice (uses current ingredients when none given)
    Tips { names: Vec<String> },
    /// Food safety advice (uses current ingredients when none given)
    Safety { names: Vec<String> },
    /// Record the current ingredient list in history
    Snapshot,
    /// Show history, most recent first
    History,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CooksyConfig::load_from(path)?,
        None => CooksyConfig::load()?,
    };
    if cli.memory {
        config.storage.backend = StorageBackend::Memory;
    }
    debug!("{:#?}", config);

    let client = QueryClient::new(MockBackend::from_config(&config)?);

    match cli.command {
        Commands::Add { name, source } => {
            let ingredient = client.add_ingredient(&name, &source).await?;
            print_ingredients(&[ingredient]);
        }
        Commands::AddMany { names, source } => {
            let added = client.add_multiple_ingredients(&names, &source).await?;
            if added.is_empty() {
                println!("Nothing to add.");
            } else {
                print_ingredients(&added);
            }
        }
        Commands::Ingredients => {
            let ingredients = client.ingredients().await?;
            if ingredients.is_empty() {
                println!("No ingredients yet.");
            } else {
                print_ingredients(&ingredients);
            }
        }
        Commands::Recipes => print_recipes(&client.recipes().await?),
        Commands::Analyze { names } => {
            let names = names_or_pantry(&client, names).await?;
            let recipes = client.analyze_and_save(&names).await?;
            print_recipes(&recipes);
        }
        Commands::Favorite { recipe_id } => {
            let recipe = client.toggle_favorite(&recipe_id).await?;
            let state = if recipe.saved { "added to" } else { "removed from" };
            println!("{} {} favorites.", recipe.title, state);
        }
        Commands::Favorites => print_recipes(&client.favorites().await?),
        Commands::Photo { file } => {
            let bytes = tokio::fs::read(&file).await?;
            let image = image_data_url(&bytes, extension(&file));
            let names = client.photo_to_ingredients(&image).await?;
            let added = client.add_multiple_ingredients(&names, "photo").await?;
            print_ingredients(&added);
        }
        Commands::Tips { names } => {
            let names = names_or_pantry(&client, names).await?;
            for tip in client.storage_tips(&names).await? {
                println!("- {}", tip);
            }
        }
        Commands::Safety { names } => {
            let names = names_or_pantry(&client, names).await?;
            for tip in client.safety_check(&names).await? {
                println!("- {}", tip);
            }
        }
        Commands::Snapshot => {
            let ingredients = client.ingredients().await?;
            let entry = client.add_history_entry(ingredients).await?;
            println!(
                "Recorded {} ingredients as {}",
                entry.ingredient_list.len(),
                entry.id
            );
        }
        Commands::History => {
            let history = client.history().await?;
            if history.is_empty() {
                println!("No history yet.");
            }
            for entry in history {
                let when = entry
                    .timestamp
                    .to_datetime()
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "unknown time".to_string());
                let names: Vec<&str> = entry
                    .ingredient_list
                    .iter()
                    .map(|i| i.name.as_str())
                    .collect();
                println!("{}  {}", when, names.join(", "));
            }
        }
    }

    client.into_backend().close()?;
    Ok(())
}

async fn names_or_pantry(
    client: &QueryClient<MockBackend>,
    names: Vec<String>,
) -> cooksy::Result<Vec<String>> {
    if !names.is_empty() {
        return Ok(names);
    }
    let ingredients = client.ingredients().await?;
    Ok(ingredients.into_iter().map(|i| i.name).collect())
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

fn print_ingredients(ingredients: &[Ingredient]) {
    for ingredient in ingredients {
        println!(
            "{}  {} ({})",
            ingredient.id, ingredient.name, ingredient.source
        );
    }
}

fn print_recipes(recipes: &[Recipe]) {
    if recipes.is_empty() {
        println!("No recipes.");
        return;
    }
    for recipe in recipes {
        let star = if recipe.saved { "*" } else { " " };
        println!(
            "{} {}  {} ({} min, {})",
            star, recipe.id, recipe.title, recipe.prep_time, recipe.difficulty
        );
        if !recipe.missing_ingredients.is_empty() {
            println!("    missing: {}", recipe.missing_ingredients.join(", "));
        }
    }
}
