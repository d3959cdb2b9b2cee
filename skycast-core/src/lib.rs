//! Core library for the `skycast` CLI.
//!
//! This crate defines:
//! - The provider-independent weather model and its unit helpers
//! - Provider clients (AccuWeather, Met Éireann) and their converters
//! - Configuration, the on-disk weather cache, and the cache-first repository
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod repository;
pub mod trend;
pub mod units;

pub use cache::WeatherCache;
pub use config::{Config, ProviderConfig};
pub use error::ConvertError;
pub use model::{Alert, Location, LocationQuery, Weather, WeatherCode};
pub use provider::{ProviderId, WeatherProvider};
pub use repository::{Origin, WeatherRepository, WeatherResult};
pub use trend::{HourlyTrendDisplay, TrendDisplayList};
pub use units::PrecipitationUnit;
