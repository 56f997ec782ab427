use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    context::{CampingStyle, Precipitation},
    weather::Observation,
};

/// Globally unique identifier of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(Uuid);

impl TripId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    #[must_use]
    pub const fn uuid(self) -> Uuid {
        self.0
    }
}

impl Default for TripId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for TripId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for TripId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The trip attributes the context resolver reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDetails {
    /// First day of the trip. Today is assumed when missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Approximate latitude of the destination, in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// Explicit camping style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camping_style: Option<CampingStyle>,
    /// Free-form label for the destination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
}

/// Records which catalog version a trip's packing list was built from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitMarker {
    /// Whether the list has been populated.
    pub initialized: bool,
    /// Catalog version the list was populated from.
    pub version: u32,
}

impl InitMarker {
    /// Marker for a list populated from the given catalog version.
    #[must_use]
    pub const fn initialized(version: u32) -> Self {
        Self {
            initialized: true,
            version,
        }
    }

    /// Marker for a list that has never been populated.
    #[must_use]
    pub const fn reset() -> Self {
        Self {
            initialized: false,
            version: 0,
        }
    }

    /// Whether the marker matches the given catalog version.
    #[must_use]
    pub const fn is_current(self, version: u32) -> bool {
        self.initialized && self.version == version
    }
}

/// Weather conditions captured at initialization, kept for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    /// Whether strong wind was expected.
    pub windy: bool,
    /// Expected precipitation.
    pub precipitation: Precipitation,
    /// When the observation was taken.
    pub observed_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    /// Captures an observation at the current time.
    #[must_use]
    pub fn capture(observation: &Observation) -> Self {
        Self {
            windy: observation.windy,
            precipitation: observation.precipitation,
            observed_at: Utc::now(),
        }
    }
}

/// A trip whose packing list the engine manages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    /// Unique identifier.
    pub id: TripId,
    /// Display name.
    pub name: String,
    /// Inputs to the context resolver.
    #[serde(default)]
    pub details: TripDetails,
    /// Initialization marker.
    #[serde(default)]
    pub marker: InitMarker,
    /// Last observed weather, for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherSnapshot>,
}

impl Trip {
    /// Creates a trip that has not been initialized yet.
    #[must_use]
    pub fn new(name: impl Into<String>, details: TripDetails) -> Self {
        Self {
            id: TripId::new(),
            name: name.into(),
            details,
            marker: InitMarker::default(),
            weather: None,
        }
    }
}
