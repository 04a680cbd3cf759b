use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

use crate::{classify::classify, error::ForecastError};

/// A validated latitude/longitude pair. Only [`Coordinates::new`] builds one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Fails with [`ForecastError::InvalidCoordinate`] when either value is
    /// out of range or not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ForecastError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(ForecastError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Weather category shown to the user, derived from a condition code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WeatherCondition {
    Clear,
    ClearNight,
    Cloudy,
    CloudyNight,
    PartlyCloudy,
    LightRain,
    ModerateRain,
    HeavyRain,
    Thunder,
    Snow,
    Sleet,
    Windy,
    Foggy,
}

impl WeatherCondition {
    /// Raw value, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::ClearNight => "clearNight",
            Self::Cloudy => "cloudy",
            Self::CloudyNight => "cloudyNight",
            Self::PartlyCloudy => "partlyCloudy",
            Self::LightRain => "lightRain",
            Self::ModerateRain => "moderateRain",
            Self::HeavyRain => "heavyRain",
            Self::Thunder => "thunder",
            Self::Snow => "snow",
            Self::Sleet => "sleet",
            Self::Windy => "windy",
            Self::Foggy => "foggy",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::ClearNight => "Clear Night",
            Self::Cloudy => "Cloudy",
            Self::CloudyNight => "Cloudy Night",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::LightRain => "Light Rain",
            Self::ModerateRain => "Moderate Rain",
            Self::HeavyRain => "Heavy Rain",
            Self::Thunder => "Thunder",
            Self::Snow => "Snow",
            Self::Sleet => "Sleet",
            Self::Windy => "Windy",
            Self::Foggy => "Foggy",
        }
    }

    pub const fn all() -> &'static [WeatherCondition] {
        &[
            Self::Clear,
            Self::ClearNight,
            Self::Cloudy,
            Self::CloudyNight,
            Self::PartlyCloudy,
            Self::LightRain,
            Self::ModerateRain,
            Self::HeavyRain,
            Self::Thunder,
            Self::Snow,
            Self::Sleet,
            Self::Windy,
            Self::Foggy,
        ]
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Comparison against raw strings ignores case.
impl PartialEq<str> for WeatherCondition {
    fn eq(&self, other: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(other)
    }
}

impl PartialEq<&str> for WeatherCondition {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown weather condition '{0}'")]
pub struct ParseConditionError(pub String);

impl FromStr for WeatherCondition {
    type Err = ParseConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|c| *c == s)
            .ok_or_else(|| ParseConditionError(s.to_string()))
    }
}

/// One decoded forecast. Immutable; `condition` always equals
/// `classify(icon, precipitation_intensity)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRecord {
    temperature: f64,
    summary: String,
    icon: String,
    precipitation_intensity: f64,
    wind_bearing: i32,
    wind_speed: f64,
    temperature_max: f64,
    temperature_min: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    observed_at: Option<DateTime<Utc>>,
    condition: WeatherCondition,
}

impl ForecastRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        temperature: f64,
        summary: String,
        icon: String,
        precipitation_intensity: f64,
        wind_bearing: i32,
        wind_speed: f64,
        temperature_max: f64,
        temperature_min: f64,
    ) -> Self {
        let condition = classify(&icon, precipitation_intensity);

        Self {
            temperature,
            summary,
            icon,
            precipitation_intensity,
            wind_bearing,
            wind_speed,
            temperature_max,
            temperature_min,
            observed_at: None,
            condition,
        }
    }

    pub fn with_observed_at(mut self, observed_at: Option<DateTime<Utc>>) -> Self {
        self.observed_at = observed_at;
        self
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn precipitation_intensity(&self) -> f64 {
        self.precipitation_intensity
    }

    pub fn wind_bearing(&self) -> i32 {
        self.wind_bearing
    }

    pub fn wind_speed(&self) -> f64 {
        self.wind_speed
    }

    /// Today's high.
    pub fn temperature_max(&self) -> f64 {
        self.temperature_max
    }

    /// Today's low.
    pub fn temperature_min(&self) -> f64 {
        self.temperature_min
    }

    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        self.observed_at
    }

    pub fn condition(&self) -> WeatherCondition {
        self.condition
    }
}
