mod canned;
mod factory;

pub use canned::{CannedAdvisor, DETECTED_INGREDIENTS, PANTRY_STAPLES, RECIPE_STEPS};
pub use factory::AdvisorFactory;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::Result;
use crate::model::Recipe;

/// Unified trait for everything that stands in for a model: recipe
/// suggestions, photo detection and food handling advice
#[async_trait]
pub trait KitchenAdvisor: Send + Sync {
    /// Get the advisor name (e.g., "canned")
    fn advisor_name(&self) -> &str;

    /// Suggest recipes for the given ingredient names. Nothing is persisted.
    async fn analyze(&self, ingredients: &[String]) -> Result<Vec<Recipe>>;

    /// Detect ingredient names in an encoded image
    async fn detect_ingredients(&self, image: &str) -> Result<Vec<String>>;

    async fn storage_tips(&self, ingredients: &[String]) -> Result<Vec<String>>;

    async fn safety_check(&self, ingredients: &[String]) -> Result<Vec<String>>;
}

/// Encode raw image bytes as a `data:` URL, the form advisors receive images in
pub fn image_data_url(bytes: &[u8], extension: Option<&str>) -> String {
    let mime = match extension.map(|e| e.to_ascii_lowercase()).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    };
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}
