use crate::error::{PlannerError, Result};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Environment-backed configuration. Missing secrets are detected here,
/// before any network call is attempted.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub model: String,
    pub weather_api_key: String,
    pub weather_base_url: String,
}

impl PlannerConfig {
    pub fn from_env() -> Result<Self> {
        let openai_api_key = require_env("OPENAI_API_KEY")?;
        let weather_api_key = require_env("OPENWEATHER_API_KEY")?;

        let openai_base_url = std::env::var("OPENAI_API_BASE")
            .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string());
        let model =
            std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Ok(Self {
            openai_api_key,
            openai_base_url,
            model,
            weather_api_key,
            weather_base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(PlannerError::Config(format!(
            "{} environment variable must be set",
            name
        ))),
    }
}
