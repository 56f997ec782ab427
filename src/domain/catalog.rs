//! The library of gear a packing list is built from.
//!
//! A [`Catalog`] is constructed once, validated, and then shared read-only.
//! Each [`LibraryItem`] carries [`Tags`] describing the conditions it is
//! useful in.

use std::{
    collections::{BTreeSet, HashMap, HashSet},
    fmt,
    fs::File,
    io::{self, BufReader},
    path::Path,
};

use borsh::BorshSerialize;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::domain::context::{
    CampingStyle, Facet, Precipitation, Season, TemperatureBand, TripContext, Wind,
};

mod builtin;

/// Id of the category that absorbs items with unknown categories.
pub const FALLBACK_CATEGORY: &str = "other";

const ANY: &str = "any";

/// The values of one facet an item is tagged with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacetSet<T> {
    /// Wildcard, matches every value.
    Any,
    /// Matches only the listed values.
    Only(BTreeSet<T>),
}

impl<T> Default for FacetSet<T> {
    fn default() -> Self {
        Self::Any
    }
}

impl<T: Facet> FacetSet<T> {
    /// A set restricted to the given values.
    pub fn only(values: impl IntoIterator<Item = T>) -> Self {
        Self::Only(values.into_iter().collect())
    }

    /// Whether the set lets `value` through. The wildcard lets everything
    /// through.
    #[must_use]
    pub fn allows(&self, value: T) -> bool {
        match self {
            Self::Any => true,
            Self::Only(values) => values.contains(&value),
        }
    }

    /// Whether the set explicitly names `value`.
    #[must_use]
    pub fn hits(&self, value: T) -> bool {
        match self {
            Self::Any => false,
            Self::Only(values) => values.contains(&value),
        }
    }

    /// Whether this is the wildcard.
    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    fn is_empty(&self) -> bool {
        matches!(self, Self::Only(values) if values.is_empty())
    }
}

impl<T: Facet> Serialize for FacetSet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Any => serializer.collect_seq([ANY]),
            Self::Only(values) => serializer.collect_seq(values.iter().map(|v| v.as_str())),
        }
    }
}

impl<'de, T: Facet> Deserialize<'de> for FacetSet<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Vec::<String>::deserialize(deserializer)?;
        if raw.iter().any(|value| value == ANY) {
            return Ok(Self::Any);
        }
        raw.iter()
            .map(|value| value.parse::<T>())
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Self::Only)
            .map_err(serde::de::Error::custom)
    }
}

/// The matching facets of a library item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tags {
    /// Seasons the item is useful in.
    #[serde(default)]
    pub seasons: FacetSet<Season>,
    /// Temperature ranges the item is useful in.
    #[serde(default)]
    pub temperature_bands: FacetSet<TemperatureBand>,
    /// Wind conditions the item is useful in.
    #[serde(default)]
    pub wind: FacetSet<Wind>,
    /// Precipitation the item is useful in.
    #[serde(default)]
    pub precipitation: FacetSet<Precipitation>,
    /// Camping styles the item is eligible for.
    #[serde(default)]
    pub camping_styles: FacetSet<CampingStyle>,
}

impl Tags {
    /// Whether all four weather facets are wildcards.
    #[must_use]
    pub const fn is_weather_agnostic(&self) -> bool {
        self.seasons.is_any()
            && self.temperature_bands.is_any()
            && self.wind.is_any()
            && self.precipitation.is_any()
    }

    /// Which weather facets explicitly name the context's values.
    #[must_use]
    pub fn hits(&self, context: &TripContext) -> FacetHits {
        FacetHits {
            season: self.seasons.hits(context.season),
            temperature: self.temperature_bands.hits(context.temperature_band),
            wind: self.wind.hits(context.wind()),
            precipitation: self.precipitation.hits(context.precipitation),
        }
    }

    fn empty_facet(&self) -> Option<&'static str> {
        [
            ("seasons", self.seasons.is_empty()),
            ("temperatureBands", self.temperature_bands.is_empty()),
            ("wind", self.wind.is_empty()),
            ("precipitation", self.precipitation.is_empty()),
            ("campingStyles", self.camping_styles.is_empty()),
        ]
        .into_iter()
        .find_map(|(name, empty)| empty.then_some(name))
    }

    /// A tag naming the absence of a condition. Calm, dry weather is the
    /// default and never calls for gear on its own.
    fn neutral_tag(&self) -> Option<(&'static str, &'static str)> {
        if self.wind.hits(Wind::Calm) {
            return Some(("wind", Wind::Calm.as_str()));
        }
        if self.precipitation.hits(Precipitation::None) {
            return Some(("precipitation", Precipitation::None.as_str()));
        }
        None
    }
}

/// The weather facets of an item that name a context's values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FacetHits {
    /// The season matched.
    pub season: bool,
    /// The temperature band matched.
    pub temperature: bool,
    /// The wind condition matched.
    pub wind: bool,
    /// The precipitation matched.
    pub precipitation: bool,
}

impl FacetHits {
    /// Whether any facet matched.
    #[must_use]
    pub const fn any(self) -> bool {
        self.season || self.temperature || self.wind || self.precipitation
    }
}

/// Display grouping for items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Stable key.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Position when listing categories, ascending.
    pub sort_order: i32,
    /// Icon key for the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Category {
    fn new(id: &str, label: &str, sort_order: i32, icon: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            sort_order,
            icon: Some(icon.to_string()),
        }
    }
}

/// Stable identifier of a library item.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LibraryItemId(String);

impl LibraryItemId {
    /// Wraps an existing identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derives the identifier of an item from its category and name.
    ///
    /// The same inputs always produce the same id, across builds and
    /// processes.
    ///
    /// # Panics
    ///
    /// Panics if borsh serialization fails (which should never happen for this
    /// data structure).
    #[must_use]
    pub fn derive(category_id: &str, name: &str) -> Self {
        #[derive(BorshSerialize)]
        struct IdData<'a> {
            category_id: &'a str,
            name: &'a str,
        }

        let encoded =
            borsh::to_vec(&IdData { category_id, name }).expect("this should never fail");
        let hash = format!("{:x}", Sha256::digest(encoded));

        Self(format!("lib-{}", &hash[..16]))
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LibraryItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LibraryItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A piece of gear the catalog can put on a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryItem {
    /// Stable identifier.
    pub id: LibraryItemId,
    /// Display name.
    pub name: String,
    /// Category the item is grouped under.
    pub category_id: String,
    /// Number of units added by default.
    pub default_qty: u32,
    /// Importance from 1 to 5, 5 being essential.
    pub priority: u8,
    /// Extra guidance for the user.
    pub notes: Option<String>,
    /// Matching facets.
    pub tags: Tags,
    /// Whether the item goes on every trip of a matching style.
    pub base: bool,
    /// Whether the item is restricted to premium users.
    pub premium: bool,
}

/// The source form of a [`LibraryItem`], before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDefinition {
    /// Explicit identifier. Derived from category and name when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<LibraryItemId>,
    /// Display name.
    pub name: String,
    /// Category id.
    pub category: String,
    /// Number of units added by default.
    #[serde(default = "default_qty")]
    pub default_qty: u32,
    /// Importance from 1 to 5.
    #[serde(default = "default_priority")]
    pub priority: u8,
    /// Extra guidance for the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Matching facets.
    #[serde(default)]
    pub tags: Tags,
    /// Whether the item goes on every trip of a matching style.
    #[serde(default)]
    pub base: bool,
    /// Whether the item is restricted to premium users.
    #[serde(default)]
    pub premium: bool,
}

const fn default_qty() -> u32 {
    1
}

const fn default_priority() -> u8 {
    3
}

impl ItemDefinition {
    /// Starts a definition with default quantity and priority and wildcard
    /// tags.
    #[must_use]
    pub fn new(name: &str, category: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            category: category.to_string(),
            default_qty: default_qty(),
            priority: default_priority(),
            notes: None,
            tags: Tags::default(),
            base: false,
            premium: false,
        }
    }

    /// Sets the default quantity.
    #[must_use]
    pub const fn qty(mut self, qty: u32) -> Self {
        self.default_qty = qty;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the notes.
    #[must_use]
    pub fn notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }

    /// Marks the item as a base item.
    #[must_use]
    pub const fn base(mut self) -> Self {
        self.base = true;
        self
    }

    /// Marks the item as premium-only.
    #[must_use]
    pub const fn premium(mut self) -> Self {
        self.premium = true;
        self
    }

    /// Restricts the seasons.
    #[must_use]
    pub fn seasons(mut self, values: impl IntoIterator<Item = Season>) -> Self {
        self.tags.seasons = FacetSet::only(values);
        self
    }

    /// Restricts the temperature bands.
    #[must_use]
    pub fn temps(mut self, values: impl IntoIterator<Item = TemperatureBand>) -> Self {
        self.tags.temperature_bands = FacetSet::only(values);
        self
    }

    /// Tags the item for windy conditions.
    #[must_use]
    pub fn windy(mut self) -> Self {
        self.tags.wind = FacetSet::only([Wind::Windy]);
        self
    }

    /// Restricts the precipitation.
    #[must_use]
    pub fn precip(mut self, values: impl IntoIterator<Item = Precipitation>) -> Self {
        self.tags.precipitation = FacetSet::only(values);
        self
    }

    /// Restricts the camping styles.
    #[must_use]
    pub fn styles(mut self, values: impl IntoIterator<Item = CampingStyle>) -> Self {
        self.tags.camping_styles = FacetSet::only(values);
        self
    }

    fn build(self) -> LibraryItem {
        let id = self
            .id
            .unwrap_or_else(|| LibraryItemId::derive(&self.category, &self.name));
        LibraryItem {
            id,
            name: self.name,
            category_id: self.category,
            default_qty: self.default_qty,
            priority: self.priority,
            notes: self.notes,
            tags: self.tags,
            base: self.base,
            premium: self.premium,
        }
    }
}

/// Errors detected while building a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Two categories share an id.
    #[error("duplicate category '{0}'")]
    DuplicateCategory(String),
    /// The fallback category is not defined.
    #[error("catalog must define the 'other' category")]
    MissingFallbackCategory,
    /// Two items share an id.
    #[error("duplicate library item '{0}'")]
    DuplicateItem(LibraryItemId),
    /// An item references a category that does not exist.
    #[error("item '{item}' references unknown category '{category}'")]
    UnknownCategory {
        /// Name of the item.
        item: String,
        /// The missing category id.
        category: String,
    },
    /// An item has a default quantity of zero.
    #[error("item '{0}' must have a default quantity of at least 1")]
    InvalidQuantity(String),
    /// An item's priority is outside 1-5.
    #[error("item '{item}' has priority {priority}, expected 1-5")]
    InvalidPriority {
        /// Name of the item.
        item: String,
        /// The rejected priority.
        priority: u8,
    },
    /// An item restricts a facet to no values at all.
    #[error("item '{item}' has an empty {facet} facet")]
    EmptyFacet {
        /// Name of the item.
        item: String,
        /// Name of the facet.
        facet: &'static str,
    },
    /// An item is tagged with the calm or dry default, which never matches.
    #[error("item '{item}' cannot be tagged with {facet} '{value}'")]
    NeutralTag {
        /// Name of the item.
        item: String,
        /// Name of the facet.
        facet: &'static str,
        /// The rejected value.
        value: &'static str,
    },
    /// The catalog file could not be read.
    #[error("failed to read catalog: {0}")]
    Io(#[from] io::Error),
    /// The catalog file could not be parsed.
    #[error("failed to parse catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// An immutable, versioned library of categories and items.
#[derive(Debug, Clone)]
pub struct Catalog {
    version: u32,
    categories: Vec<Category>,
    items: Vec<LibraryItem>,
    item_index: HashMap<LibraryItemId, usize>,
}

impl Catalog {
    /// Validates and assembles a catalog.
    ///
    /// Categories are ordered by `sort_order`; items keep their given order.
    ///
    /// # Errors
    ///
    /// Returns an error if ids are duplicated, the fallback category is
    /// missing, or an item is malformed.
    pub fn new(
        version: u32,
        mut categories: Vec<Category>,
        definitions: Vec<ItemDefinition>,
    ) -> Result<Self, CatalogError> {
        let mut category_ids = HashSet::with_capacity(categories.len());
        for category in &categories {
            if !category_ids.insert(category.id.as_str()) {
                return Err(CatalogError::DuplicateCategory(category.id.clone()));
            }
        }
        if !category_ids.contains(FALLBACK_CATEGORY) {
            return Err(CatalogError::MissingFallbackCategory);
        }

        let mut items = Vec::with_capacity(definitions.len());
        let mut item_index = HashMap::with_capacity(definitions.len());
        for item in definitions.into_iter().map(ItemDefinition::build) {
            validate_item(&item, &category_ids)?;
            if item_index.insert(item.id.clone(), items.len()).is_some() {
                return Err(CatalogError::DuplicateItem(item.id));
            }
            items.push(item);
        }

        categories.sort_by_key(|category| category.sort_order);

        Ok(Self {
            version,
            categories,
            items,
            item_index,
        })
    }

    /// The catalog that ships with the crate.
    ///
    /// # Panics
    ///
    /// Panics if the built-in definitions are invalid, which the test suite
    /// rules out.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(
            builtin::VERSION,
            builtin::categories(),
            builtin::items(),
        )
        .expect("built-in catalog must be valid")
    }

    /// Loads a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// catalog it describes is invalid.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let reader = BufReader::new(File::open(path)?);
        let CatalogFile::V1 {
            version,
            categories,
            items,
        } = serde_yaml::from_reader(reader)?;
        Self::new(version, categories, items)
    }

    /// The version initialization markers are compared against.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// All categories, in display order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// All items, in catalog order.
    #[must_use]
    pub fn items(&self) -> &[LibraryItem] {
        &self.items
    }

    /// Looks up an item by id.
    #[must_use]
    pub fn item(&self, id: &LibraryItemId) -> Option<&LibraryItem> {
        self.item_index.get(id).map(|&index| &self.items[index])
    }

    /// Looks up a category by id.
    #[must_use]
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Resolves a category id or label to a known category id.
    ///
    /// Matching is case-insensitive. Unknown or missing input resolves to
    /// [`FALLBACK_CATEGORY`].
    #[must_use]
    pub fn normalize_category(&self, input: Option<&str>) -> &str {
        let Some(input) = input.map(str::trim).filter(|s| !s.is_empty()) else {
            return FALLBACK_CATEGORY;
        };

        self.categories
            .iter()
            .find(|category| {
                category.id.eq_ignore_ascii_case(input)
                    || category.label.to_lowercase() == input.to_lowercase()
            })
            .map_or(FALLBACK_CATEGORY, |category| category.id.as_str())
    }
}

fn validate_item(item: &LibraryItem, categories: &HashSet<&str>) -> Result<(), CatalogError> {
    if !categories.contains(item.category_id.as_str()) {
        return Err(CatalogError::UnknownCategory {
            item: item.name.clone(),
            category: item.category_id.clone(),
        });
    }
    if item.default_qty == 0 {
        return Err(CatalogError::InvalidQuantity(item.name.clone()));
    }
    if !(1..=5).contains(&item.priority) {
        return Err(CatalogError::InvalidPriority {
            item: item.name.clone(),
            priority: item.priority,
        });
    }
    if let Some(facet) = item.tags.empty_facet() {
        return Err(CatalogError::EmptyFacet {
            item: item.name.clone(),
            facet,
        });
    }
    if let Some((facet, value)) = item.tags.neutral_tag() {
        return Err(CatalogError::NeutralTag {
            item: item.name.clone(),
            facet,
            value,
        });
    }
    Ok(())
}

/// The serialized versions of a catalog file.
#[derive(Debug, Deserialize)]
#[serde(tag = "_version")]
enum CatalogFile {
    #[serde(rename = "1")]
    V1 {
        version: u32,
        categories: Vec<Category>,
        items: Vec<ItemDefinition>,
    },
}
