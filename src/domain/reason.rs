//! Human-readable explanations for context-matched items.
//!
//! These are display heuristics. The reason shown for a suggestion is picked
//! by a fixed precedence over the facets that hit, and may name a different
//! facet than the one that caused the match.

use crate::domain::{
    catalog::LibraryItem,
    context::{Precipitation, Season, TemperatureBand, TripContext},
};

/// Shown when no specific facet names the context.
pub const GENERIC_REASON: &str = "Recommended for this trip";

const MAX_INITIAL_REASONS: usize = 2;

/// The reason attached to an item added during initialization.
///
/// Lists up to two matching facets, season and temperature first, then wind
/// and precipitation. For example `"Winter, Freezing temps"`.
#[must_use]
pub fn initial_reason(item: &LibraryItem, context: &TripContext) -> String {
    let hits = item.tags.hits(context);

    let labels: Vec<&str> = [
        hits.season.then(|| season_label(context.season)),
        hits.temperature
            .then(|| temperature_label(context.temperature_band)),
        hits.wind.then_some("Windy"),
        hits.precipitation
            .then(|| precipitation_label(context.precipitation)),
    ]
    .into_iter()
    .flatten()
    .take(MAX_INITIAL_REASONS)
    .collect();

    if labels.is_empty() {
        GENERIC_REASON.to_string()
    } else {
        labels.join(", ")
    }
}

/// The single reason attached to a suggestion.
///
/// Temperature takes precedence over season, then precipitation, then wind.
#[must_use]
pub fn suggestion_reason(item: &LibraryItem, context: &TripContext) -> String {
    let hits = item.tags.hits(context);

    let reason = if hits.temperature {
        match context.temperature_band {
            TemperatureBand::BelowFreezing => "Freezing temperatures expected",
            TemperatureBand::Cold => "Cold temperatures expected",
            TemperatureBand::Mild => "Mild temperatures expected",
            TemperatureBand::Hot => "Hot weather expected",
        }
    } else if hits.season {
        match context.season {
            Season::Winter => "Useful for winter trips",
            Season::Summer => "Useful for summer trips",
            Season::Shoulder => "Useful for shoulder-season trips",
        }
    } else if hits.precipitation {
        match context.precipitation {
            Precipitation::Snow => "Snow expected",
            Precipitation::Rain | Precipitation::None => "Rain expected",
        }
    } else if hits.wind {
        "Windy conditions expected"
    } else {
        GENERIC_REASON
    };

    reason.to_string()
}

const fn season_label(season: Season) -> &'static str {
    match season {
        Season::Winter => "Winter",
        Season::Summer => "Summer",
        Season::Shoulder => "Shoulder season",
    }
}

const fn temperature_label(band: TemperatureBand) -> &'static str {
    match band {
        TemperatureBand::BelowFreezing => "Freezing temps",
        TemperatureBand::Cold => "Cold temps",
        TemperatureBand::Mild => "Mild temps",
        TemperatureBand::Hot => "Hot temps",
    }
}

const fn precipitation_label(precipitation: Precipitation) -> &'static str {
    match precipitation {
        Precipitation::Snow => "Snow",
        Precipitation::Rain | Precipitation::None => "Rain",
    }
}
