pub mod advisory;
pub mod aggregate;
pub mod cache;
pub mod city;
pub mod client;
pub mod service;

pub use advisory::{derive_advisory, WeatherAdvisory};
pub use aggregate::{aggregate_daily, ForecastDay, ForecastSet, MAX_FORECAST_DAYS};
pub use cache::ForecastCache;
pub use city::{cache_key, canonical_city};
pub use client::{ForecastFetch, ForecastPayload, ForecastSample, WeatherClient};
pub use service::WeatherService;
