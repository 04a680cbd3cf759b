//! Core library for the `forecast` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The forecast client and its JSON decoding
//! - Classification of condition codes into weather categories
//! - Place-name resolution through a pluggable geocoder
//!
//! It is used by `forecast-cli`, but can also be reused by other binaries or services.

pub mod classify;
pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod geocode;
pub mod model;
pub mod provider;
pub mod retry;

pub use classify::classify;
pub use client::{ForecastClient, ForecastConfig};
pub use config::{Config, GeocoderConfig};
pub use decode::decode_forecast;
pub use error::ForecastError;
pub use geocode::{Geocoder, NominatimGeocoder};
pub use model::{Coordinates, ForecastRecord, WeatherCondition};
pub use provider::{ForecastProvider, provider_from_config};
pub use retry::RetryPolicy;
pub use tokio_util::sync::CancellationToken;
