//! Trip context derivation.
//!
//! A [`TripContext`] is the set of facet values a trip presents to the
//! matcher. It is recomputed from the trip's details on every call and never
//! stored as authoritative state.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{trip::TripDetails, weather::Observation};

/// Error returned when a facet value cannot be parsed.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown {facet} value '{value}'")]
pub struct UnknownFacetValue {
    facet: &'static str,
    value: String,
}

/// A closed set of values that can tag a library item.
pub trait Facet: 'static + Copy + Ord + fmt::Display + FromStr<Err = UnknownFacetValue> {
    /// Every value of the facet, in display order.
    const ALL: &'static [Self];

    /// The serialized name of the value.
    fn as_str(self) -> &'static str;
}

macro_rules! impl_facet {
    ($ty:ident, $facet:literal, [$($variant:ident => $name:literal),+ $(,)?]) => {
        impl Facet for $ty {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownFacetValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Self::$variant),)+
                    _ => Err(UnknownFacetValue {
                        facet: $facet,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

/// Coarse season of the trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Season {
    /// Mid-winter months.
    Winter,
    /// Mid-summer months.
    Summer,
    /// Spring and autumn.
    Shoulder,
}

impl_facet!(Season, "season", [
    Winter => "winter",
    Summer => "summer",
    Shoulder => "shoulder",
]);

/// Expected temperature range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TemperatureBand {
    /// Night temperatures below 0°C.
    BelowFreezing,
    /// Cold but above freezing.
    Cold,
    /// Comfortable temperatures.
    Mild,
    /// Hot weather.
    Hot,
}

impl_facet!(TemperatureBand, "temperature band", [
    BelowFreezing => "belowFreezing",
    Cold => "cold",
    Mild => "mild",
    Hot => "hot",
]);

/// Wind conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Wind {
    /// No notable wind.
    Calm,
    /// Strong wind expected.
    Windy,
}

impl_facet!(Wind, "wind", [
    Calm => "calm",
    Windy => "windy",
]);

impl From<bool> for Wind {
    fn from(windy: bool) -> Self {
        if windy { Self::Windy } else { Self::Calm }
    }
}

/// Expected precipitation.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Precipitation {
    /// Dry conditions, or no information.
    #[default]
    None,
    /// Rain expected.
    Rain,
    /// Snow expected.
    Snow,
}

impl_facet!(Precipitation, "precipitation", [
    None => "none",
    Rain => "rain",
    Snow => "snow",
]);

/// How the party camps.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum CampingStyle {
    /// Driving up to the site.
    #[default]
    CarCamping,
    /// Carrying everything on foot.
    Backpacking,
    /// Sleeping in a hammock.
    Hammock,
    /// Recreational vehicle.
    Rv,
}

impl_facet!(CampingStyle, "camping style", [
    CarCamping => "carCamping",
    Backpacking => "backpacking",
    Hammock => "hammock",
    Rv => "rv",
]);

/// The facet values a trip presents to the matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripContext {
    /// Season at the start of the trip.
    pub season: Season,
    /// Expected temperature range.
    pub temperature_band: TemperatureBand,
    /// Whether strong wind is expected.
    pub windy: bool,
    /// Expected precipitation.
    pub precipitation: Precipitation,
    /// How the party camps.
    pub camping_style: CampingStyle,
    /// Free-form label for the destination.
    pub location_name: Option<String>,
}

impl TripContext {
    /// Derives the context for a trip.
    ///
    /// `today` stands in for a missing start date and `default_style` for a
    /// missing camping style. Weather defaults to calm and dry unless an
    /// observation is supplied.
    #[must_use]
    pub fn resolve(
        details: &TripDetails,
        observation: Option<&Observation>,
        today: NaiveDate,
        default_style: CampingStyle,
    ) -> Self {
        let date = details.start_date.unwrap_or(today);
        let latitude = details.latitude.and_then(normalize_latitude);

        let season = season_for(date.month(), latitude);
        let mut temperature_band = temperature_band_for(season, latitude);
        let mut windy = false;
        let mut precipitation = Precipitation::None;

        if let Some(observation) = observation {
            windy = observation.windy;
            precipitation = observation.precipitation;
            if let Some(band) = observation.temperature_band {
                temperature_band = band;
            }
        }

        Self {
            season,
            temperature_band,
            windy,
            precipitation,
            camping_style: details.camping_style.unwrap_or(default_style),
            location_name: details.location_name.clone(),
        }
    }

    /// The wind facet value of this context.
    #[must_use]
    pub fn wind(&self) -> Wind {
        Wind::from(self.windy)
    }
}

fn normalize_latitude(latitude: f64) -> Option<f64> {
    if latitude.is_finite() && (-90.0..=90.0).contains(&latitude) {
        Some(latitude)
    } else {
        tracing::debug!(latitude, "ignoring out-of-range latitude");
        None
    }
}

/// Maps a month (1-12) to a season, flipping for the southern hemisphere.
fn season_for(month: u32, latitude: Option<f64>) -> Season {
    let northern = match month {
        12 | 1 | 2 => Season::Winter,
        6..=8 => Season::Summer,
        _ => Season::Shoulder,
    };

    match (northern, latitude) {
        (Season::Winter, Some(lat)) if lat < 0.0 => Season::Summer,
        (Season::Summer, Some(lat)) if lat < 0.0 => Season::Winter,
        (season, _) => season,
    }
}

fn temperature_band_for(season: Season, latitude: Option<f64>) -> TemperatureBand {
    let Some(lat) = latitude.map(f64::abs) else {
        return match season {
            Season::Winter => TemperatureBand::Cold,
            Season::Summer => TemperatureBand::Hot,
            Season::Shoulder => TemperatureBand::Mild,
        };
    };

    match season {
        Season::Winter if lat >= 40.0 => TemperatureBand::BelowFreezing,
        Season::Winter if lat >= 25.0 => TemperatureBand::Cold,
        Season::Winter => TemperatureBand::Mild,
        Season::Summer if lat >= 55.0 => TemperatureBand::Mild,
        Season::Summer => TemperatureBand::Hot,
        Season::Shoulder if lat >= 45.0 => TemperatureBand::Cold,
        Season::Shoulder if lat < 20.0 => TemperatureBand::Hot,
        Season::Shoulder => TemperatureBand::Mild,
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn details(start: Option<NaiveDate>, latitude: Option<f64>) -> TripDetails {
        TripDetails {
            start_date: start,
            latitude,
            camping_style: None,
            location_name: None,
        }
    }

    #[test_case(1, None, Season::Winter; "january north")]
    #[test_case(7, None, Season::Summer; "july north")]
    #[test_case(4, None, Season::Shoulder; "april")]
    #[test_case(10, Some(-33.0), Season::Shoulder; "october south")]
    #[test_case(1, Some(-33.0), Season::Summer; "january south")]
    #[test_case(7, Some(-45.0), Season::Winter; "july south")]
    #[test_case(12, Some(60.0), Season::Winter; "december north")]
    fn season_from_month(month: u32, latitude: Option<f64>, expected: Season) {
        assert_eq!(season_for(month, latitude), expected);
    }

    #[test_case(Season::Winter, Some(45.0), TemperatureBand::BelowFreezing; "winter high latitude")]
    #[test_case(Season::Winter, Some(30.0), TemperatureBand::Cold; "winter mid latitude")]
    #[test_case(Season::Winter, Some(10.0), TemperatureBand::Mild; "winter tropics")]
    #[test_case(Season::Winter, None, TemperatureBand::Cold; "winter unknown")]
    #[test_case(Season::Summer, Some(60.0), TemperatureBand::Mild; "summer subarctic")]
    #[test_case(Season::Summer, Some(35.0), TemperatureBand::Hot; "summer temperate")]
    #[test_case(Season::Shoulder, Some(50.0), TemperatureBand::Cold; "shoulder north")]
    #[test_case(Season::Shoulder, Some(10.0), TemperatureBand::Hot; "shoulder tropics")]
    #[test_case(Season::Shoulder, None, TemperatureBand::Mild; "shoulder unknown")]
    fn band_from_season(season: Season, latitude: Option<f64>, expected: TemperatureBand) {
        assert_eq!(temperature_band_for(season, latitude), expected);
    }

    #[test]
    fn january_at_45_north_backpacking() {
        let mut details = details(Some(date(2025, 1, 15)), Some(45.0));
        details.camping_style = Some(CampingStyle::Backpacking);

        let context =
            TripContext::resolve(&details, None, date(2024, 6, 1), CampingStyle::CarCamping);

        assert_eq!(context.season, Season::Winter);
        assert_eq!(context.temperature_band, TemperatureBand::BelowFreezing);
        assert_eq!(context.camping_style, CampingStyle::Backpacking);
        assert!(!context.windy);
        assert_eq!(context.precipitation, Precipitation::None);
    }

    #[test]
    fn missing_start_date_uses_today() {
        let context = TripContext::resolve(
            &details(None, Some(45.0)),
            None,
            date(2025, 7, 4),
            CampingStyle::CarCamping,
        );
        assert_eq!(context.season, Season::Summer);
    }

    #[test]
    fn missing_style_uses_default() {
        let context = TripContext::resolve(
            &details(None, None),
            None,
            date(2025, 7, 4),
            CampingStyle::Hammock,
        );
        assert_eq!(context.camping_style, CampingStyle::Hammock);
    }

    #[test]
    fn invalid_latitude_is_ignored() {
        let context = TripContext::resolve(
            &details(Some(date(2025, 1, 10)), Some(f64::NAN)),
            None,
            date(2025, 1, 10),
            CampingStyle::CarCamping,
        );
        assert_eq!(context.temperature_band, TemperatureBand::Cold);

        let context = TripContext::resolve(
            &details(Some(date(2025, 1, 10)), Some(123.0)),
            None,
            date(2025, 1, 10),
            CampingStyle::CarCamping,
        );
        assert_eq!(context.temperature_band, TemperatureBand::Cold);
    }

    #[test]
    fn observation_overrides_weather_defaults() {
        let observation = Observation {
            windy: true,
            precipitation: Precipitation::Snow,
            temperature_band: Some(TemperatureBand::Mild),
        };
        let context = TripContext::resolve(
            &details(Some(date(2025, 1, 10)), Some(45.0)),
            Some(&observation),
            date(2025, 1, 10),
            CampingStyle::CarCamping,
        );

        assert!(context.windy);
        assert_eq!(context.wind(), Wind::Windy);
        assert_eq!(context.precipitation, Precipitation::Snow);
        assert_eq!(context.temperature_band, TemperatureBand::Mild);
    }

    #[test]
    fn facet_values_parse_and_display() {
        for style in CampingStyle::ALL {
            assert_eq!(style.to_string().parse::<CampingStyle>().unwrap(), *style);
        }
        assert_eq!(
            "belowFreezing".parse::<TemperatureBand>().unwrap(),
            TemperatureBand::BelowFreezing
        );
        assert!("tundra".parse::<Season>().is_err());
    }
}
