//! Mapping from the forecast endpoint's JSON body to a [`ForecastRecord`].
//!
//! Wire fields are all optional at the serde level so that a missing field
//! can be reported by its path instead of as a generic parse error.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{error::ForecastError, model::ForecastRecord};

#[derive(Debug, Deserialize)]
struct WireForecast {
    currently: Option<WireCurrently>,
    daily: Option<WireDaily>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCurrently {
    time: Option<i64>,
    temperature: Option<f64>,
    summary: Option<String>,
    icon: Option<String>,
    precip_intensity: Option<f64>,
    wind_bearing: Option<i32>,
    wind_speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WireDaily {
    data: Option<Vec<WireDay>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireDay {
    temperature_high: Option<f64>,
    temperature_low: Option<f64>,
}

/// Decode a forecast response body.
///
/// Fails with [`ForecastError::Decoding`] naming the first missing or
/// wrongly typed field, or with path `$` when the body is not JSON at all.
pub fn decode_forecast(body: &str) -> Result<ForecastRecord, ForecastError> {
    let wire = parse_wire(body)?;

    let currently = required(wire.currently, "currently")?;
    let temperature = required(currently.temperature, "currently.temperature")?;
    let summary = required(currently.summary, "currently.summary")?;
    let icon = required(currently.icon, "currently.icon")?;
    let precip_intensity = required(currently.precip_intensity, "currently.precipIntensity")?;
    let wind_bearing = required(currently.wind_bearing, "currently.windBearing")?;
    let wind_speed = required(currently.wind_speed, "currently.windSpeed")?;

    let daily = required(wire.daily, "daily")?;
    let days = required(daily.data, "daily.data")?;
    let today = days.into_iter().next().ok_or_else(|| ForecastError::Decoding {
        path: "daily.data".to_string(),
        reason: "sequence is empty".to_string(),
    })?;
    let temperature_max = required(today.temperature_high, "daily.data[0].temperatureHigh")?;
    let temperature_min = required(today.temperature_low, "daily.data[0].temperatureLow")?;

    let record = ForecastRecord::new(
        temperature,
        summary,
        icon,
        precip_intensity,
        wind_bearing,
        wind_speed,
        temperature_max,
        temperature_min,
    )
    .with_observed_at(currently.time.and_then(unix_to_utc));

    Ok(record)
}

fn parse_wire(body: &str) -> Result<WireForecast, ForecastError> {
    let de = &mut serde_json::Deserializer::from_str(body);
    let wire: WireForecast = serde_path_to_error::deserialize(&mut *de).map_err(|e| {
        let path = match e.path().to_string() {
            p if p.is_empty() || p == "." => "$".to_string(),
            p => p,
        };
        ForecastError::Decoding {
            path,
            reason: e.into_inner().to_string(),
        }
    })?;

    de.end().map_err(|e| ForecastError::Decoding {
        path: "$".to_string(),
        reason: e.to_string(),
    })?;

    Ok(wire)
}

fn required<T>(value: Option<T>, path: &str) -> Result<T, ForecastError> {
    value.ok_or_else(|| ForecastError::missing(path))
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{classify::classify, model::WeatherCondition};
    use serde_json::{Value, json};

    fn fixture() -> Value {
        json!({
            "latitude": 37.8267,
            "longitude": -122.4233,
            "timezone": "America/Los_Angeles",
            "currently": {
                "time": 1583452800,
                "summary": "Light Rain",
                "icon": "rain",
                "precipIntensity": 0.3,
                "precipProbability": 0.8,
                "temperature": 54.12,
                "apparentTemperature": 53.5,
                "humidity": 0.9,
                "windSpeed": 7.45,
                "windGust": 12.1,
                "windBearing": 215
            },
            "hourly": { "summary": "Rain throughout the day.", "data": [] },
            "daily": {
                "summary": "Rain on Friday.",
                "icon": "rain",
                "data": [
                    { "time": 1583395200, "temperatureHigh": 58.3, "temperatureLow": 47.9, "moonPhase": 0.4 },
                    { "time": 1583481600, "temperatureHigh": 61.0, "temperatureLow": 49.2 }
                ]
            }
        })
    }

    fn decode(value: &Value) -> Result<ForecastRecord, ForecastError> {
        decode_forecast(&value.to_string())
    }

    fn remove(value: &mut Value, pointer: &str) {
        let (parent, key) = pointer.rsplit_once('/').unwrap();
        value
            .pointer_mut(parent)
            .and_then(Value::as_object_mut)
            .unwrap()
            .remove(key);
    }

    #[test]
    fn decodes_well_formed_fixture() {
        let record = decode(&fixture()).expect("fixture should decode");

        assert_eq!(record.temperature(), 54.12);
        assert_eq!(record.summary(), "Light Rain");
        assert_eq!(record.icon(), "rain");
        assert_eq!(record.precipitation_intensity(), 0.3);
        assert_eq!(record.wind_bearing(), 215);
        assert_eq!(record.wind_speed(), 7.45);
        assert_eq!(record.temperature_max(), 58.3);
        assert_eq!(record.temperature_min(), 47.9);
        assert_eq!(record.observed_at().map(|t| t.timestamp()), Some(1583452800));
        assert_eq!(record.condition(), WeatherCondition::LightRain);
        assert_eq!(
            record.condition(),
            classify(record.icon(), record.precipitation_intensity())
        );
    }

    #[test]
    fn decoding_is_deterministic() {
        let a = decode(&fixture()).unwrap();
        let b = decode(&fixture()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn integer_numbers_are_accepted() {
        let mut value = fixture();
        value["currently"]["temperature"] = json!(54);
        value["currently"]["precipIntensity"] = json!(4);
        let record = decode(&value).unwrap();
        assert_eq!(record.temperature(), 54.0);
        assert_eq!(record.condition(), WeatherCondition::HeavyRain);
    }

    #[test]
    fn missing_time_is_not_an_error() {
        let mut value = fixture();
        remove(&mut value, "/currently/time");
        let record = decode(&value).unwrap();
        assert!(record.observed_at().is_none());
    }

    #[test]
    fn each_missing_required_field_is_reported_by_path() {
        let cases = [
            ("/currently", "currently"),
            ("/currently/temperature", "currently.temperature"),
            ("/currently/summary", "currently.summary"),
            ("/currently/icon", "currently.icon"),
            ("/currently/precipIntensity", "currently.precipIntensity"),
            ("/currently/windBearing", "currently.windBearing"),
            ("/currently/windSpeed", "currently.windSpeed"),
            ("/daily", "daily"),
            ("/daily/data", "daily.data"),
            ("/daily/data/0/temperatureHigh", "daily.data[0].temperatureHigh"),
            ("/daily/data/0/temperatureLow", "daily.data[0].temperatureLow"),
        ];

        for (pointer, path) in cases {
            let mut value = fixture();
            remove(&mut value, pointer);
            let err = decode(&value).unwrap_err();
            assert_eq!(err.decoding_path(), Some(path), "removing {pointer}");
        }
    }

    #[test]
    fn null_counts_as_missing() {
        let mut value = fixture();
        value["currently"]["summary"] = Value::Null;
        let err = decode(&value).unwrap_err();
        assert_eq!(err.decoding_path(), Some("currently.summary"));
    }

    #[test]
    fn empty_daily_data_is_rejected() {
        let mut value = fixture();
        value["daily"]["data"] = json!([]);
        let err = decode(&value).unwrap_err();
        match err {
            ForecastError::Decoding { path, reason } => {
                assert_eq!(path, "daily.data");
                assert!(reason.contains("empty"));
            }
            other => panic!("expected decoding error, got {other:?}"),
        }
    }

    #[test]
    fn wrong_type_is_reported_at_its_path() {
        let mut value = fixture();
        value["currently"]["windBearing"] = json!("south");
        let err = decode(&value).unwrap_err();
        assert_eq!(err.decoding_path(), Some("currently.windBearing"));

        let mut value = fixture();
        value["daily"]["data"][0]["temperatureHigh"] = json!("warm");
        let err = decode(&value).unwrap_err();
        assert_eq!(err.decoding_path(), Some("daily.data[0].temperatureHigh"));

        let mut value = fixture();
        value["currently"] = json!("sunny");
        let err = decode(&value).unwrap_err();
        assert_eq!(err.decoding_path(), Some("currently"));
    }

    #[test]
    fn garbage_fails_at_root() {
        let err = decode_forecast("<html>502 Bad Gateway</html>").unwrap_err();
        assert_eq!(err.decoding_path(), Some("$"));

        let err = decode_forecast(&format!("{} trailing", fixture())).unwrap_err();
        assert_eq!(err.decoding_path(), Some("$"));
    }
}
