//! Forward geocoding: turn a place name into coordinates.
//! The default implementation talks to a Nominatim-compatible `/search` endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;
use tracing::debug;

use crate::{error::ForecastError, model::Coordinates};

#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Resolve `query` to coordinates, or fail with [`ForecastError::Resolution`].
    async fn resolve(&self, query: &str) -> Result<Coordinates, ForecastError>;
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    base_url: String,
    http: Client,
}

impl NominatimGeocoder {
    /// `http` should carry a descriptive user agent; Nominatim rejects anonymous clients.
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            base_url: base_url.into(),
            http,
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn resolve(&self, query: &str) -> Result<Coordinates, ForecastError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ForecastError::resolution(query, "place name is empty"));
        }

        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        debug!(query, "resolving place name");

        let res = self
            .http
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| ForecastError::resolution(query, e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(ForecastError::resolution(
                query,
                format!("geocoder responded with status {status}"),
            ));
        }

        let hits: Vec<SearchHit> = res
            .json()
            .await
            .map_err(|e| ForecastError::resolution(query, format!("unreadable response: {e}")))?;

        let hit = hits
            .into_iter()
            .next()
            .ok_or_else(|| ForecastError::resolution(query, "no matching place"))?;

        let latitude: f64 = hit
            .lat
            .parse()
            .map_err(|_| ForecastError::resolution(query, format!("bad latitude '{}'", hit.lat)))?;
        let longitude: f64 = hit
            .lon
            .parse()
            .map_err(|_| ForecastError::resolution(query, format!("bad longitude '{}'", hit.lon)))?;

        let coords = Coordinates::new(latitude, longitude)
            .map_err(|e| ForecastError::resolution(query, e.to_string()))?;

        debug!(
            query,
            place = hit.display_name.as_deref().unwrap_or(query),
            %coords,
            "resolved place name"
        );
        Ok(coords)
    }
}
