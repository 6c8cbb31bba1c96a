//! trip-planner-rs: a type-safe pipeline for LLM-generated travel itineraries
//!
//! Two subsystems: a streaming generation pipeline that turns a validated
//! trip request into a schema-checked itinerary, and a resilient forecast
//! layer that fetches, aggregates and caches multi-day weather data.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use trip_planner_rs::{GenerationPipeline, PlannerConfig, TripRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PlannerConfig::from_env()?;
//!     let pipeline = GenerationPipeline::new(&config);
//!
//!     let request: TripRequest = serde_json::from_str(r#"{
//!         "destination": "Barcelona",
//!         "description": "A relaxed long weekend",
//!         "startDate": "2025/06/01",
//!         "endDate": "2025/06/03",
//!         "firstTimeVisiting": true,
//!         "plannedSpending": "1000 - 2500",
//!         "travelType": "couple",
//!         "interests": ["Food Exploration"]
//!     }"#)?;
//!
//!     let itinerary = pipeline.generate(&request, |token| print!("{token}")).await?;
//!     println!("\n{} days planned", itinerary.days.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod persistence;
pub mod schemas;
pub mod services;
pub mod types;
pub mod weather;

pub use config::PlannerConfig;
pub use error::{PlannerError, Result};
pub use persistence::{InMemoryStore, ItineraryStore};
pub use schemas::validate_itinerary;
pub use services::{build_prompt, GenerationPipeline, OpenAIClient, PromptPair};
pub use types::{Activity, CreateItinerary, Itinerary, ItineraryDay, TravelType, TripRequest};
pub use weather::{
    derive_advisory, ForecastCache, ForecastDay, ForecastSet, WeatherAdvisory, WeatherClient,
    WeatherService,
};

#[cfg(feature = "cli")]
pub mod cli;
