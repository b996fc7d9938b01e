use async_trait::async_trait;
use log::debug;

use super::KitchenAdvisor;
use crate::error::Result;
use crate::model::{new_id, Recipe};

/// Staples a generated recipe may report as missing
pub const PANTRY_STAPLES: [&str; 6] = ["Olive Oil", "Garlic", "Onion", "Basil", "Pasta", "Bread"];

/// Instruction template shared by every generated recipe
pub const RECIPE_STEPS: [&str; 3] = [
    "Prep your ingredients and preheat the pan.",
    "Cook aromatics until fragrant.",
    "Combine everything and adjust seasoning to taste.",
];

/// What every photo "contains"
pub const DETECTED_INGREDIENTS: [&str; 3] = ["Tomato", "Cheese", "Bread"];

const GENERATED_RECIPES: usize = 4;
const GENERIC_STORAGE_TIP: &str = "Keep ingredients dry and sealed.";
const GENERIC_SAFETY_TIP: &str = "Check expiration dates before cooking.";
const PRODUCE_SAFETY_TIP: &str = "Wash fresh produce before use.";

/// Deterministic placeholder advisor. Output depends only on its input
/// (apart from generated recipe ids).
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedAdvisor;

impl CannedAdvisor {
    pub fn new() -> Self {
        Self
    }

    fn recipe_at(index: usize, ingredients: &[String]) -> Recipe {
        let missing_count = (index % 3 + 1).max(1);
        let end = (index + missing_count).min(PANTRY_STAPLES.len());
        let start = index.min(end);

        Recipe {
            id: new_id("recipe"),
            title: format!("Chef's Choice {}", index + 1),
            ingredients_used: ingredients.to_vec(),
            missing_ingredients: PANTRY_STAPLES[start..end]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            steps: RECIPE_STEPS.iter().map(|s| s.to_string()).collect(),
            prep_time: 20 + index as u32 * 5,
            difficulty: (if index < 2 { "Easy" } else { "Medium" }).to_string(),
            saved: false,
        }
    }
}

#[async_trait]
impl KitchenAdvisor for CannedAdvisor {
    fn advisor_name(&self) -> &str {
        "canned"
    }

    async fn analyze(&self, ingredients: &[String]) -> Result<Vec<Recipe>> {
        debug!("Generating canned recipes for {} ingredients", ingredients.len());
        Ok((0..GENERATED_RECIPES)
            .map(|index| Self::recipe_at(index, ingredients))
            .collect())
    }

    async fn detect_ingredients(&self, _image: &str) -> Result<Vec<String>> {
        Ok(DETECTED_INGREDIENTS.iter().map(|s| s.to_string()).collect())
    }

    async fn storage_tips(&self, ingredients: &[String]) -> Result<Vec<String>> {
        if ingredients.is_empty() {
            return Ok(vec![GENERIC_STORAGE_TIP.to_string()]);
        }
        Ok(ingredients
            .iter()
            .map(|item| format!("Store {} in a cool, dry place and use within a week.", item))
            .collect())
    }

    async fn safety_check(&self, ingredients: &[String]) -> Result<Vec<String>> {
        match ingredients.first() {
            None => Ok(vec![GENERIC_SAFETY_TIP.to_string()]),
            Some(first) => Ok(vec![
                PRODUCE_SAFETY_TIP.to_string(),
                format!("Cook {} thoroughly to avoid safety issues.", first),
            ]),
        }
    }
}
