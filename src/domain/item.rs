use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::catalog::{LibraryItem, LibraryItemId};

/// Unique identifier of an item on a trip's packing list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for ItemId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How an item came to be on the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemSource {
    /// Base item for the camping style.
    Base,
    /// Matched the trip context.
    Suggested,
    /// Added by hand.
    User,
}

/// An entry on a trip's packing list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPackingItem {
    /// Unique identifier.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Category the item is grouped under.
    pub category_id: String,
    /// Number of units to pack.
    pub qty: u32,
    /// Whether the item has been packed.
    pub packed: bool,
    /// How the item came to be on the list.
    pub source: ItemSource,
    /// The catalog entry this item was created from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_item_id: Option<LibraryItemId>,
    /// Why the item was added, for context-matched items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_reason: Option<String>,
    /// When the item was created.
    pub created_at: DateTime<Utc>,
    /// When the item was last modified.
    pub updated_at: DateTime<Utc>,
}

impl TripPackingItem {
    /// Creates an unpacked item from a catalog entry.
    #[must_use]
    pub fn from_library(
        item: &LibraryItem,
        source: ItemSource,
        added_reason: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ItemId::new(),
            name: item.name.clone(),
            category_id: item.category_id.clone(),
            qty: item.default_qty,
            packed: false,
            source,
            library_item_id: Some(item.id.clone()),
            added_reason,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates an unpacked item authored by the user.
    #[must_use]
    pub fn custom(name: String, category_id: String, qty: u32) -> Self {
        let now = Utc::now();
        Self {
            id: ItemId::new(),
            name,
            category_id,
            qty,
            packed: false,
            source: ItemSource::User,
            library_item_id: None,
            added_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Marks the item as modified now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A user-authored item waiting to be added to a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    /// Display name. Surrounding whitespace is trimmed.
    pub name: String,
    /// Category id or label. Unknown values fall back to `other`.
    pub category: Option<String>,
    /// Number of units. Must be at least one.
    pub qty: u32,
}

impl NewItem {
    /// A single unit of an uncategorised item.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: None,
            qty: 1,
        }
    }

    /// Sets the category.
    #[must_use]
    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the quantity.
    #[must_use]
    pub const fn with_qty(mut self, qty: u32) -> Self {
        self.qty = qty;
        self
    }
}

/// The decision recorded for a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SuggestionStatus {
    /// Offered, no decision yet.
    New,
    /// Accepted onto the list.
    Added,
    /// Rejected by the user.
    Dismissed,
}

impl SuggestionStatus {
    /// Whether no further transition is allowed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Added | Self::Dismissed)
    }
}

impl fmt::Display for SuggestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::New => "new",
            Self::Added => "added",
            Self::Dismissed => "dismissed",
        };
        f.write_str(s)
    }
}

/// Persisted decision for one catalog item on one trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRecord {
    /// The suggested catalog item.
    pub library_item_id: LibraryItemId,
    /// The decision.
    pub status: SuggestionStatus,
    /// When the decision was made.
    pub updated_at: DateTime<Utc>,
}

impl SuggestionRecord {
    /// Creates a record with the given status, stamped now.
    #[must_use]
    pub fn new(library_item_id: LibraryItemId, status: SuggestionStatus) -> Self {
        Self {
            library_item_id,
            status,
            updated_at: Utc::now(),
        }
    }
}
