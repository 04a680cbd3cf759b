use crate::model::WeatherCondition;

/// Rain at or above this intensity is at least moderate.
pub const MODERATE_RAIN_INTENSITY: f64 = 0.5;
/// Rain at or above this intensity is heavy.
pub const HEAVY_RAIN_INTENSITY: f64 = 4.0;

/// Map a condition code and precipitation intensity to a [`WeatherCondition`].
///
/// Codes are matched exactly. Anything unrecognised, including the empty
/// string, falls back to [`WeatherCondition::Clear`]. The intensity only
/// matters for `"rain"`; a NaN intensity there counts as heavy.
pub fn classify(icon: &str, precipitation_intensity: f64) -> WeatherCondition {
    match icon {
        "clear-day" => WeatherCondition::Clear,
        "clear-night" => WeatherCondition::ClearNight,
        "rain" => classify_rain(precipitation_intensity),
        "snow" => WeatherCondition::Snow,
        "sleet" => WeatherCondition::Sleet,
        "wind" => WeatherCondition::Windy,
        "fog" => WeatherCondition::Foggy,
        "cloudy" => WeatherCondition::Cloudy,
        "partly-cloudy-day" => WeatherCondition::PartlyCloudy,
        "partly-cloudy-night" => WeatherCondition::CloudyNight,
        _ => WeatherCondition::Clear,
    }
}

fn classify_rain(intensity: f64) -> WeatherCondition {
    if intensity < MODERATE_RAIN_INTENSITY {
        WeatherCondition::LightRain
    } else if intensity < HEAVY_RAIN_INTENSITY {
        WeatherCondition::ModerateRain
    } else {
        WeatherCondition::HeavyRain
    }
}
