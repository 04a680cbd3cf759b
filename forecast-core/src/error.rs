use thiserror::Error;

/// Everything that can go wrong while producing a [`ForecastRecord`](crate::ForecastRecord).
///
/// Every variant is recoverable by the caller; none of them poison the client.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error(
        "invalid coordinate ({latitude}, {longitude}): latitude must be within [-90, 90] \
         and longitude within [-180, 180]"
    )]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// Transport failure or a non-success HTTP status.
    #[error("network error")]
    Network {
        #[from]
        source: reqwest::Error,
    },

    /// The response body did not carry a required field. `path` is dotted,
    /// e.g. `currently.windSpeed` or `daily.data[0].temperatureHigh`; `$`
    /// stands for the body as a whole.
    #[error("failed to decode forecast at `{path}`: {reason}")]
    Decoding { path: String, reason: String },

    #[error("could not resolve location '{query}': {reason}")]
    Resolution { query: String, reason: String },

    #[error("forecast request was cancelled")]
    Cancelled,
}

impl ForecastError {
    pub(crate) fn missing(path: impl Into<String>) -> Self {
        Self::Decoding {
            path: path.into(),
            reason: "required field is missing".to_string(),
        }
    }

    pub(crate) fn resolution(query: &str, reason: impl Into<String>) -> Self {
        Self::Resolution {
            query: query.to_string(),
            reason: reason.into(),
        }
    }

    /// The decoding path, if this is a decoding failure.
    pub fn decoding_path(&self) -> Option<&str> {
        match self {
            Self::Decoding { path, .. } => Some(path),
            _ => None,
        }
    }
}
