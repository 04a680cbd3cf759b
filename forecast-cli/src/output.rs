use std::fmt;

use forecast_core::ForecastRecord;

const COMPASS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Nearest of the eight compass points for a bearing in degrees.
pub fn compass_point(bearing: i32) -> &'static str {
    let normalized = bearing.rem_euclid(360) as f64;
    let index = ((normalized / 45.0).round() as usize) % COMPASS.len();
    COMPASS[index]
}

/// Human-readable forecast for a place.
pub struct Report<'a> {
    label: &'a str,
    record: &'a ForecastRecord,
}

pub fn render<'a>(label: &'a str, record: &'a ForecastRecord) -> Report<'a> {
    Report { label, record }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.record;

        writeln!(f, "{}: {} ({})", self.label, record.condition().label(), record.summary())?;
        writeln!(
            f,
            "  Temperature:   {:.1}° (high {:.1}°, low {:.1}°)",
            record.temperature(),
            record.temperature_max(),
            record.temperature_min()
        )?;
        writeln!(f, "  Precipitation: {:.3}/h", record.precipitation_intensity())?;
        writeln!(
            f,
            "  Wind:          {:.1} from {}° ({})",
            record.wind_speed(),
            record.wind_bearing(),
            compass_point(record.wind_bearing())
        )?;
        if let Some(observed_at) = record.observed_at() {
            writeln!(f, "  Observed:      {}", observed_at.format("%Y-%m-%d %H:%M UTC"))?;
        }

        Ok(())
    }
}
