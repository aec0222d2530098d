//! Weather snapshot/forecast model and OpenWeatherMap payload parsing.
//!
//! Fetching is an external concern; this module only turns already-fetched
//! JSON bytes into domain records. Missing optional fields degrade to empty
//! values (the layout maps an empty icon key to its fallback icon).

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

/// Current conditions at one point in time.
#[derive(Clone, Debug, PartialEq)]
pub struct WeatherSnapshot {
    /// Short condition code keying an icon (e.g. `"01d"`, `"10n"`).
    pub icon_key: String,
    /// Human-readable conditions text.
    pub conditions: String,
    /// Current temperature in the fetched unit system.
    pub current_temp: f32,
    /// Daily minimum temperature.
    pub min_temp: f32,
    /// Daily maximum temperature.
    pub max_temp: f32,
    /// Relative humidity percentage.
    pub humidity_pct: u8,
    /// Observation timestamp, UTC.
    pub observed: DateTime<Utc>,
}

/// One forecast timestep; same shape as the snapshot.
pub type ForecastEntry = WeatherSnapshot;

/// Current conditions plus the chronological forecast sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct WeatherReport {
    pub current: WeatherSnapshot,
    pub forecast: Vec<ForecastEntry>,
}

/// Weather payload parsing error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeatherError {
    message: String,
}

impl WeatherError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for WeatherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "weather parse error: {}", self.message)
    }
}

impl std::error::Error for WeatherError {}

#[derive(Debug, Default, Deserialize)]
struct ConditionPayload {
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Default, Deserialize)]
struct MainPayload {
    #[serde(default)]
    temp: f32,
    #[serde(default)]
    temp_min: f32,
    #[serde(default)]
    temp_max: f32,
    #[serde(default)]
    humidity: i64,
}

#[derive(Debug, Deserialize)]
struct CurrentPayload {
    #[serde(default)]
    weather: Vec<ConditionPayload>,
    #[serde(default)]
    main: MainPayload,
    #[serde(default)]
    dt: i64,
}

#[derive(Debug, Deserialize)]
struct ForecastPayload {
    #[serde(default)]
    list: Vec<CurrentPayload>,
}

impl CurrentPayload {
    fn into_snapshot(self) -> WeatherSnapshot {
        let condition = self.weather.into_iter().next().unwrap_or_default();
        if condition.icon.is_empty() {
            log::warn!("weather record without icon code; fallback icon will be used");
        }
        WeatherSnapshot {
            icon_key: condition.icon,
            conditions: condition.description,
            current_temp: self.main.temp,
            min_temp: self.main.temp_min,
            max_temp: self.main.temp_max,
            humidity_pct: self.main.humidity.clamp(0, 100) as u8,
            observed: DateTime::from_timestamp(self.dt, 0).unwrap_or(DateTime::UNIX_EPOCH),
        }
    }
}

/// Parse an OpenWeatherMap current-conditions payload.
pub fn parse_current(json_bytes: &[u8]) -> Result<WeatherSnapshot, WeatherError> {
    let payload: CurrentPayload = serde_json::from_slice(json_bytes)
        .map_err(|err| WeatherError::new(format!("current payload: {}", err)))?;
    Ok(payload.into_snapshot())
}

/// Parse an OpenWeatherMap forecast payload into chronological entries.
///
/// Source order is preserved; an empty `list` yields an empty vector.
pub fn parse_forecast(json_bytes: &[u8]) -> Result<Vec<ForecastEntry>, WeatherError> {
    let payload: ForecastPayload = serde_json::from_slice(json_bytes)
        .map_err(|err| WeatherError::new(format!("forecast payload: {}", err)))?;
    Ok(payload
        .list
        .into_iter()
        .map(CurrentPayload::into_snapshot)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENT_SAMPLE: &[u8] = br#"{
        "weather": [{"id": 500, "description": "light rain", "icon": "10d"}],
        "main": {"temp": 17.4, "temp_min": 12.1, "temp_max": 19.8, "humidity": 82},
        "dt": 1787896800
    }"#;

    const FORECAST_SAMPLE: &[u8] = br#"{
        "list": [
            {"weather": [{"description": "clear sky", "icon": "01d"}],
             "main": {"temp": 18.0, "temp_min": 11.0, "temp_max": 18.5, "humidity": 60},
             "dt": 1787907600},
            {"weather": [],
             "main": {"temp": 14.2, "temp_min": 10.0, "temp_max": 15.0, "humidity": 140},
             "dt": 1787918400}
        ]
    }"#;

    #[test]
    fn parses_current_conditions() {
        let snapshot = parse_current(CURRENT_SAMPLE).unwrap();
        assert_eq!(snapshot.icon_key, "10d");
        assert_eq!(snapshot.conditions, "light rain");
        assert_eq!(snapshot.humidity_pct, 82);
        assert_eq!(snapshot.observed.timestamp(), 1787896800);
    }

    #[test]
    fn forecast_preserves_order_and_degrades_missing_fields() {
        let forecast = parse_forecast(FORECAST_SAMPLE).unwrap();
        assert_eq!(forecast.len(), 2);
        assert_eq!(forecast[0].icon_key, "01d");
        assert!(forecast[0].observed < forecast[1].observed);
        // Second record has no condition block and an out-of-range humidity.
        assert_eq!(forecast[1].icon_key, "");
        assert_eq!(forecast[1].conditions, "");
        assert_eq!(forecast[1].humidity_pct, 100);
    }

    #[test]
    fn empty_forecast_list_is_not_an_error() {
        let forecast = parse_forecast(br#"{"list": []}"#).unwrap();
        assert!(forecast.is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_current(b"{not json").is_err());
        assert!(parse_forecast(b"{\"list\": 3}").is_err());
    }
}
