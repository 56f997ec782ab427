//! Optional weather enrichment.
//!
//! The engine works without any weather data. A [`WeatherSource`] may be
//! plugged in to replace the calm, dry defaults with an observation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    context::{Precipitation, TemperatureBand},
    trip::TripDetails,
};

/// Observed or forecast conditions for a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    /// Whether strong wind is expected.
    pub windy: bool,
    /// Expected precipitation.
    pub precipitation: Precipitation,
    /// Overrides the latitude-based temperature band when present.
    pub temperature_band: Option<TemperatureBand>,
}

/// Error reported by a weather source.
#[derive(Debug, thiserror::Error)]
#[error("weather lookup failed: {0}")]
pub struct WeatherError(pub String);

/// A collaborator able to observe the weather for a trip.
pub trait WeatherSource: Send + Sync {
    /// Returns the conditions for the trip starting on `date`.
    ///
    /// `Ok(None)` means no data is available for the trip.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup failed. The engine degrades to the
    /// default conditions in that case.
    fn observe(
        &self,
        details: &TripDetails,
        date: NaiveDate,
    ) -> Result<Option<Observation>, WeatherError>;
}

/// A weather source returning the same observation for every trip.
#[derive(Debug, Clone, Copy)]
pub struct FixedWeather(pub Observation);

impl WeatherSource for FixedWeather {
    fn observe(
        &self,
        _details: &TripDetails,
        _date: NaiveDate,
    ) -> Result<Option<Observation>, WeatherError> {
        Ok(Some(self.0))
    }
}
