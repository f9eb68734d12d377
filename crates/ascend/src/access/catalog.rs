//! Content catalog: the drip-scheduled items members can access.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::tier::SubscriptionTier;

/// A single piece of catalog content (video, lesson, workshop).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Week at which this item becomes schedule-eligible (1-based).
    #[serde(rename = "weekNumber")]
    pub week_number: i64,
    /// Minimum subscription tier needed to view the item.
    #[serde(rename = "requiredTier")]
    pub required_tier: SubscriptionTier,
}

/// The full content catalog, loaded once at startup.
///
/// Items are immutable catalog data in this deployment; the loader is the
/// only coupling to their source.
#[derive(Debug, Clone, Default)]
pub struct ContentCatalog {
    items: Vec<ContentItem>,
}

impl ContentCatalog {
    /// Loads and validates a catalog from a JSON file.
    ///
    /// # Arguments
    /// * `path` - Path to a JSON array of content items
    ///
    /// # Returns
    /// * `Ok(ContentCatalog)` - Validated catalog
    /// * `Err` - If the file can't be read/parsed or an item is invalid
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path.as_ref())?;
        let items: Vec<ContentItem> = serde_json::from_str(&content)?;
        Self::from_items(items)
    }

    /// Builds a catalog from already-deserialized items, validating each.
    pub fn from_items(items: Vec<ContentItem>) -> Result<Self, Box<dyn std::error::Error>> {
        for item in &items {
            if item.week_number < 1 {
                return Err(format!(
                    "catalog item '{}' has week number {}, expected >= 1",
                    item.id, item.week_number
                )
                .into());
            }
        }
        Ok(Self { items })
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
