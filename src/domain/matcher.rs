//! Selection of catalog items for a trip context.
//!
//! Camping style is a hard eligibility filter. The weather facets (season,
//! temperature band, wind, precipitation) are independent triggers: an item
//! matches when any one of them names the context's value. Items with no
//! weather restriction at all match every context of their style.

use std::collections::HashSet;

use crate::domain::{
    catalog::{Catalog, LibraryItem},
    context::{CampingStyle, TripContext},
};

/// Selects library items from a catalog.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
    catalog: &'a Catalog,
    include_premium: bool,
}

impl<'a> Matcher<'a> {
    /// A matcher over the given catalog that skips premium items.
    #[must_use]
    pub const fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            include_premium: false,
        }
    }

    /// Sets whether premium-only items are eligible.
    #[must_use]
    pub const fn include_premium(mut self, include: bool) -> Self {
        self.include_premium = include;
        self
    }

    /// Whether the item may be offered at all, regardless of context.
    #[must_use]
    pub const fn admits(&self, item: &LibraryItem) -> bool {
        self.include_premium || !item.premium
    }

    fn eligible(&self, style: CampingStyle) -> impl Iterator<Item = &'a LibraryItem> + use<'a> {
        let matcher = *self;
        self.catalog
            .items()
            .iter()
            .filter(move |item| matcher.admits(item) && item.tags.camping_styles.allows(style))
    }

    /// Every base item allowed for the camping style.
    #[must_use]
    pub fn select_base_items(&self, style: CampingStyle) -> Vec<&'a LibraryItem> {
        self.eligible(style).filter(|item| item.base).collect()
    }

    /// Every non-base item allowed for the context's camping style whose
    /// weather facets match the context.
    #[must_use]
    pub fn select_contextual_items(&self, context: &TripContext) -> Vec<&'a LibraryItem> {
        self.eligible(context.camping_style)
            .filter(|item| !item.base && matches_weather(item, context))
            .collect()
    }
}

/// Whether an item's weather facets match the context.
///
/// Any explicit hit is enough. An item without any weather restriction
/// matches unconditionally.
#[must_use]
pub fn matches_weather(item: &LibraryItem, context: &TripContext) -> bool {
    item.tags.is_weather_agnostic() || item.tags.hits(context).any()
}

/// Drops items whose name was already seen, keeping the first occurrence.
///
/// Names are compared exactly.
#[must_use]
pub fn dedup_by_name<'a>(items: impl IntoIterator<Item = &'a LibraryItem>) -> Vec<&'a LibraryItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.name.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::NaiveDate;
    use test_case::test_case;

    use super::*;
    use crate::domain::{
        catalog::{Category, ItemDefinition, FALLBACK_CATEGORY},
        context::{Facet, Precipitation, Season, TemperatureBand},
        trip::TripDetails,
    };

    fn context(style: CampingStyle) -> TripContext {
        TripContext {
            season: Season::Shoulder,
            temperature_band: TemperatureBand::Mild,
            windy: false,
            precipitation: Precipitation::None,
            camping_style: style,
            location_name: None,
        }
    }

    fn catalog(items: Vec<ItemDefinition>) -> Catalog {
        let other = Category {
            id: FALLBACK_CATEGORY.to_string(),
            label: "Other".to_string(),
            sort_order: 0,
            icon: None,
        };
        Catalog::new(1, vec![other], items).unwrap()
    }

    fn names(items: &[&LibraryItem]) -> Vec<String> {
        items.iter().map(|item| item.name.clone()).collect()
    }

    #[test]
    fn base_items_respect_style() {
        let catalog = catalog(vec![
            ItemDefinition::new("Tent", "other").base(),
            ItemDefinition::new("Chairs", "other")
                .styles([CampingStyle::CarCamping])
                .base(),
            ItemDefinition::new("Filter", "other")
                .styles([CampingStyle::Backpacking])
                .base(),
            ItemDefinition::new("Parka", "other").seasons([Season::Winter]),
        ]);
        let matcher = Matcher::new(&catalog);

        assert_eq!(
            names(&matcher.select_base_items(CampingStyle::Backpacking)),
            ["Tent", "Filter"]
        );
        assert_eq!(
            names(&matcher.select_base_items(CampingStyle::CarCamping)),
            ["Tent", "Chairs"]
        );
    }

    #[test]
    fn weather_facets_are_or_matched() {
        let catalog = catalog(vec![
            ItemDefinition::new("Spikes", "other")
                .temps([TemperatureBand::BelowFreezing])
                .precip([Precipitation::Snow]),
        ]);
        let matcher = Matcher::new(&catalog);

        let mut ctx = context(CampingStyle::CarCamping);
        assert!(matcher.select_contextual_items(&ctx).is_empty());

        ctx.precipitation = Precipitation::Snow;
        assert_eq!(names(&matcher.select_contextual_items(&ctx)), ["Spikes"]);

        ctx.precipitation = Precipitation::None;
        ctx.temperature_band = TemperatureBand::BelowFreezing;
        assert_eq!(names(&matcher.select_contextual_items(&ctx)), ["Spikes"]);
    }

    #[test]
    fn wind_only_triggers_when_windy() {
        let catalog = catalog(vec![ItemDefinition::new("Guylines", "other").windy()]);
        let matcher = Matcher::new(&catalog);

        let mut ctx = context(CampingStyle::Hammock);
        assert!(matcher.select_contextual_items(&ctx).is_empty());

        ctx.windy = true;
        assert_eq!(names(&matcher.select_contextual_items(&ctx)), ["Guylines"]);
    }

    #[test]
    fn weather_agnostic_items_always_match_their_style() {
        let catalog = catalog(vec![
            ItemDefinition::new("Sit pad", "other").styles([CampingStyle::Backpacking]),
        ]);
        let matcher = Matcher::new(&catalog);

        assert_eq!(
            names(&matcher.select_contextual_items(&context(CampingStyle::Backpacking))),
            ["Sit pad"]
        );
        assert!(
            matcher
                .select_contextual_items(&context(CampingStyle::Rv))
                .is_empty()
        );
    }

    #[test]
    fn base_items_are_not_contextual() {
        let catalog = catalog(vec![ItemDefinition::new("Tent", "other").base()]);
        let matcher = Matcher::new(&catalog);
        assert!(
            matcher
                .select_contextual_items(&context(CampingStyle::CarCamping))
                .is_empty()
        );
    }

    #[test]
    fn premium_items_require_opt_in() {
        let catalog = catalog(vec![ItemDefinition::new("GPS", "other").premium()]);
        let ctx = context(CampingStyle::Backpacking);

        assert!(Matcher::new(&catalog).select_contextual_items(&ctx).is_empty());
        assert_eq!(
            names(
                &Matcher::new(&catalog)
                    .include_premium(true)
                    .select_contextual_items(&ctx)
            ),
            ["GPS"]
        );
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let catalog = catalog(vec![
            ItemDefinition::new("Rope", "other").priority(2).base(),
            ItemDefinition {
                id: Some("rope-two".into()),
                ..ItemDefinition::new("Rope", "other").priority(5)
            },
            ItemDefinition::new("rope", "other"),
        ]);

        let deduped = dedup_by_name(catalog.items());

        assert_eq!(names(&deduped), ["Rope", "rope"]);
        assert_eq!(deduped[0].priority, 2);
    }

    #[test_case(CampingStyle::CarCamping; "car camping")]
    #[test_case(CampingStyle::Backpacking; "backpacking")]
    #[test_case(CampingStyle::Hammock; "hammock")]
    #[test_case(CampingStyle::Rv; "rv")]
    fn builtin_selection_has_unique_names_and_respects_style(style: CampingStyle) {
        let catalog = Catalog::builtin();
        let matcher = Matcher::new(&catalog).include_premium(true);
        let today = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();

        for latitude in [-45.0, 0.0, 30.0, 45.0, 60.0] {
            let details = TripDetails {
                start_date: Some(today),
                latitude: Some(latitude),
                camping_style: Some(style),
                location_name: None,
            };
            let ctx = TripContext::resolve(&details, None, today, CampingStyle::CarCamping);

            let base = matcher.select_base_items(style);
            let contextual = matcher.select_contextual_items(&ctx);
            let combined = dedup_by_name(base.iter().chain(contextual.iter()).copied());

            let unique: HashSet<_> = combined.iter().map(|item| &item.name).collect();
            assert_eq!(unique.len(), combined.len());

            for item in combined {
                assert!(item.tags.camping_styles.allows(style), "{}", item.name);
            }
        }
    }

    #[test]
    fn backpacking_only_items_never_reach_car_camping() {
        let catalog = Catalog::builtin();
        let matcher = Matcher::new(&catalog).include_premium(true);
        let backpacking_only: Vec<_> = catalog
            .items()
            .iter()
            .filter(|item| {
                CampingStyle::ALL
                    .iter()
                    .all(|&s| item.tags.camping_styles.allows(s) == (s == CampingStyle::Backpacking))
            })
            .map(|item| item.name.as_str())
            .collect();
        assert!(!backpacking_only.is_empty());

        let mut ctx = context(CampingStyle::CarCamping);
        ctx.precipitation = Precipitation::Snow;
        ctx.windy = true;
        let selected: Vec<_> = matcher
            .select_base_items(CampingStyle::CarCamping)
            .into_iter()
            .chain(matcher.select_contextual_items(&ctx))
            .map(|item| item.name.as_str())
            .collect();

        for name in backpacking_only {
            assert!(!selected.contains(&name), "{name}");
        }
    }
}
