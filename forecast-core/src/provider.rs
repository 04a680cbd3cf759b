use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc, time::Duration};

use crate::{
    Config, ForecastClient, ForecastConfig, ForecastError, ForecastRecord,
    geocode::Geocoder,
};

/// What a caller needs from a forecast source.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<ForecastRecord, ForecastError>;

    async fn fetch_by_name(&self, name: &str) -> Result<ForecastRecord, ForecastError>;
}

#[async_trait]
impl ForecastProvider for ForecastClient {
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<ForecastRecord, ForecastError> {
        ForecastClient::fetch(self, latitude, longitude).await
    }

    async fn fetch_by_name(&self, name: &str) -> Result<ForecastRecord, ForecastError> {
        ForecastClient::fetch_by_name(self, name).await
    }
}

/// Build the client described by `config`.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn ForecastProvider>> {
    let client = ForecastClient::new(client_config(config)?)?;
    Ok(Box::new(client))
}

/// Same as [`provider_from_config`] with a caller-supplied geocoder.
pub fn provider_with_geocoder(
    config: &Config,
    geocoder: Arc<dyn Geocoder>,
) -> anyhow::Result<Box<dyn ForecastProvider>> {
    let client = ForecastClient::new(client_config(config)?)?.with_geocoder(geocoder);
    Ok(Box::new(client))
}

fn client_config(config: &Config) -> anyhow::Result<ForecastConfig> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured.\n\
             Hint: run `forecast configure` or set FORECAST_API_KEY."
        )
    })?;

    Ok(ForecastConfig {
        api_key: api_key.to_owned(),
        base_url: config.base_url.clone(),
        timeout: config.timeout_secs.map(Duration::from_secs),
        retry: config.retry.clone(),
        geocoder_url: config.geocoder.base_url.clone(),
        user_agent: config.geocoder.user_agent.clone(),
    })
}
