//! Arsenal: the user's owned tools, paints and materials.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tags::deserialize_tags;

/// Category used for paints; bulk imports land here.
pub const PAINT_CATEGORY: &str = "paint";

/// A paint or tool the user owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArsenalItem {
    /// Unique id.
    pub id: Uuid,
    /// Owner.
    pub user_id: String,
    /// Free-form grouping such as "brush" or "paint"
    pub category: String,
    /// Display name.
    pub name: String,
    /// Normalized tags.
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
    /// Whether the item is on hand right now.
    pub available: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl ArsenalItem {
    /// New available item with no tags.
    pub fn new(
        user_id: impl Into<String>,
        category: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            category: category.into(),
            name: name.into(),
            tags: Vec::new(),
            available: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Mark as not on hand.
    pub const fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Check required fields.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name is required".to_string());
        }
        if self.category.trim().is_empty() {
            return Err("Category is required".to_string());
        }
        Ok(())
    }
}

/// One row of a bulk paint import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaintRow {
    /// Paint colour; becomes the item name.
    pub color: String,
    /// Maker, stored as a tag.
    #[serde(default)]
    pub brand: Option<String>,
    /// Paint medium, stored as a tag.
    #[serde(default)]
    pub medium: Option<String>,
    /// Defaults to available.
    #[serde(default)]
    pub available: Option<bool>,
}

impl PaintRow {
    /// Build the arsenal item for this row, or `None` if the colour is blank.
    pub fn into_item(self, user_id: &str) -> Option<ArsenalItem> {
        let name = self.color.trim();
        if name.is_empty() {
            return None;
        }
        let tags = [self.brand.as_deref(), self.medium.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();

        let mut item = ArsenalItem::new(user_id, PAINT_CATEGORY, name).with_tags(tags);
        item.available = self.available.unwrap_or(true);
        Some(item)
    }
}
