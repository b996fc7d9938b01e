use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::codec::{lenient_minutes, wire_millis};

/// Nanoseconds per wire millisecond
pub const NANOS_PER_MILLI: i128 = 1_000_000;

/// High-resolution point in time, in nanoseconds since the Unix epoch.
///
/// Derived from millisecond wall-clock time, so the sub-millisecond part of a
/// freshly created timestamp is always zero. On the wire it is stored as
/// integer milliseconds (see [`wire_millis`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i128);

impl Timestamp {
    pub fn now() -> Self {
        Self::from_millis(Utc::now().timestamp_millis())
    }

    pub fn from_millis(millis: i64) -> Self {
        Timestamp(i128::from(millis) * NANOS_PER_MILLI)
    }

    pub fn from_nanos(nanos: i128) -> Self {
        Timestamp(nanos)
    }

    pub fn as_nanos(&self) -> i128 {
        self.0
    }

    /// Truncates to whole milliseconds, saturating at the bounds of `i64`.
    pub fn as_millis(&self) -> i64 {
        let millis = self.0 / NANOS_PER_MILLI;
        millis.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.as_millis())
    }
}

/// Generate a collection-unique id such as `ingredient-<uuid>`
pub fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    #[serde(default, with = "wire_millis")]
    pub date_added: Timestamp,
    pub source: String,
}

impl Ingredient {
    /// Create an ingredient stamped with the current time.
    /// `name` is expected to be trimmed and non-empty already.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: new_id("ingredient"),
            name: name.into(),
            date_added: Timestamp::now(),
            source: source.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub ingredients_used: Vec<String>,
    #[serde(default)]
    pub missing_ingredients: Vec<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    /// Minutes
    #[serde(default, deserialize_with = "lenient_minutes")]
    pub prep_time: u32,
    pub difficulty: String,
    #[serde(default)]
    pub saved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    /// Owned copy of the ingredient list at capture time
    #[serde(default)]
    pub ingredient_list: Vec<Ingredient>,
    #[serde(default, with = "wire_millis")]
    pub timestamp: Timestamp,
}

impl HistoryEntry {
    pub fn new(ingredient_list: Vec<Ingredient>) -> Self {
        Self {
            id: new_id("history"),
            ingredient_list,
            timestamp: Timestamp::now(),
        }
    }
}

/// Full value of the backend state at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    /// Most recent first
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl StateSnapshot {
    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty() && self.recipes.is_empty() && self.history.is_empty()
    }

    pub fn find_recipe(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }
}
