use futures::future::join_all;
use reqwest::Client;
use std::{fmt, sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::{
    decode::decode_forecast,
    error::ForecastError,
    geocode::{Geocoder, NominatimGeocoder},
    model::{Coordinates, ForecastRecord},
    retry::RetryPolicy,
};

pub const DEFAULT_BASE_URL: &str = "https://api.darksky.net/forecast";
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = concat!("forecast/", env!("CARGO_PKG_VERSION"));

/// Settings the client needs at construction. Read-only afterwards.
#[derive(Clone, PartialEq)]
pub struct ForecastConfig {
    pub api_key: String,
    pub base_url: String,
    /// `None` keeps the HTTP stack's default.
    pub timeout: Option<Duration>,
    pub retry: RetryPolicy,
    pub geocoder_url: String,
    pub user_agent: String,
}

impl ForecastConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            retry: RetryPolicy::none(),
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl fmt::Debug for ForecastConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForecastConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("geocoder_url", &self.geocoder_url)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Fetches and decodes forecasts. Cheap to clone; clones share the
/// connection pool and each call is independent of the others.
#[derive(Debug, Clone)]
pub struct ForecastClient {
    http: Client,
    config: Arc<ForecastConfig>,
    geocoder: Arc<dyn Geocoder>,
}

impl ForecastClient {
    /// Build a client that resolves place names through the configured
    /// Nominatim endpoint.
    pub fn new(config: ForecastConfig) -> Result<Self, ForecastError> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        let geocoder = Arc::new(NominatimGeocoder::new(config.geocoder_url.clone(), http.clone()));

        Ok(Self {
            http,
            config: Arc::new(config),
            geocoder,
        })
    }

    pub fn with_geocoder(mut self, geocoder: Arc<dyn Geocoder>) -> Self {
        self.geocoder = geocoder;
        self
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    fn forecast_url(&self, coords: Coordinates) -> String {
        format!(
            "{}/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.api_key,
            coords
        )
    }

    /// Fetch the forecast for a latitude/longitude pair.
    ///
    /// Out-of-range coordinates fail before any request is made.
    #[instrument(skip(self), fields(lat = %latitude, lon = %longitude))]
    pub async fn fetch(&self, latitude: f64, longitude: f64) -> Result<ForecastRecord, ForecastError> {
        let coords = Coordinates::new(latitude, longitude)?;
        self.fetch_coordinates(coords).await
    }

    pub async fn fetch_coordinates(&self, coords: Coordinates) -> Result<ForecastRecord, ForecastError> {
        let retry = &self.config.retry;
        let mut attempt = 0;

        loop {
            match self.request_once(coords).await {
                Err(err) if retry.should_retry(attempt, &err) => {
                    let delay = retry.delay_for_attempt(attempt);
                    warn!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = ?err,
                        "forecast request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn request_once(&self, coords: Coordinates) -> Result<ForecastRecord, ForecastError> {
        debug!(%coords, "requesting forecast");

        // reqwest errors embed the request URL; drop it so the key stays out of messages.
        let res = self
            .http
            .get(self.forecast_url(coords))
            .send()
            .await
            .map_err(reqwest::Error::without_url)?
            .error_for_status()
            .map_err(reqwest::Error::without_url)?;

        let body = res.text().await.map_err(reqwest::Error::without_url)?;
        let record = decode_forecast(&body)?;

        debug!(%coords, condition = %record.condition(), "forecast decoded");
        Ok(record)
    }

    /// Resolve `name` through the geocoder, then fetch. Nothing is requested
    /// from the forecast endpoint when resolution fails.
    #[instrument(skip(self))]
    pub async fn fetch_by_name(&self, name: &str) -> Result<ForecastRecord, ForecastError> {
        let coords = self.geocoder.resolve(name).await?;
        self.fetch_coordinates(coords).await
    }

    /// Like [`fetch`](Self::fetch), but resolves to
    /// [`ForecastError::Cancelled`] as soon as `token` is cancelled.
    pub async fn fetch_cancellable(
        &self,
        latitude: f64,
        longitude: f64,
        token: &CancellationToken,
    ) -> Result<ForecastRecord, ForecastError> {
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(ForecastError::Cancelled),
            result = self.fetch(latitude, longitude) => result,
        }
    }

    /// Fetch several locations concurrently. Results line up with `locations`;
    /// one failure does not affect the rest.
    pub async fn fetch_many(
        &self,
        locations: &[Coordinates],
    ) -> Vec<Result<ForecastRecord, ForecastError>> {
        join_all(locations.iter().map(|c| self.fetch_coordinates(*c))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> ForecastClient {
        let config = ForecastConfig {
            base_url: base_url.to_string(),
            ..ForecastConfig::new("SECRET")
        };
        ForecastClient::new(config).expect("client should build")
    }

    #[test]
    fn config_defaults() {
        let config = ForecastConfig::new("KEY");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, None);
        assert_eq!(config.retry.max_retries, 0);
        assert!(config.user_agent.starts_with("forecast/"));
    }

    #[test]
    fn url_is_base_key_and_coordinates() {
        let c = client("https://api.example.com/forecast");
        let url = c.forecast_url(Coordinates::new(37.8267, -122.4233).unwrap());
        assert_eq!(url, "https://api.example.com/forecast/SECRET/37.8267,-122.4233");
    }

    #[test]
    fn url_ignores_trailing_slash_on_base() {
        let c = client("https://api.example.com/forecast/");
        let url = c.forecast_url(Coordinates::new(1.5, 2.0).unwrap());
        assert_eq!(url, "https://api.example.com/forecast/SECRET/1.5,2");
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = ForecastConfig::new("SECRET");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("SECRET"));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains(DEFAULT_BASE_URL));

        let client = ForecastClient::new(config).unwrap();
        assert!(!format!("{client:?}").contains("SECRET"));
    }

    #[tokio::test]
    async fn invalid_coordinate_fails_before_request() {
        // Nothing listens here; reaching the network would be a Network error.
        let c = client("http://127.0.0.1:9");
        let err = c.fetch(91.0, 0.0).await.unwrap_err();
        assert!(matches!(err, ForecastError::InvalidCoordinate { .. }));
    }

    #[tokio::test]
    async fn cancelled_token_short_circuits() {
        let c = client("http://127.0.0.1:9");
        let token = CancellationToken::new();
        token.cancel();
        let err = c.fetch_cancellable(10.0, 10.0, &token).await.unwrap_err();
        assert!(matches!(err, ForecastError::Cancelled));
    }
}
