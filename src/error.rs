use thiserror::Error;

/// Main error type for the trip planner
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid trip request: {0}")]
    InvalidRequest(String),

    #[error("Model backend error: {0}")]
    Upstream(String),

    #[error("Completion stream failed: {0}")]
    StreamFailed(String),

    #[error("Completion is not valid JSON: {detail}")]
    MalformedCompletion { detail: String, raw: String },

    #[error("Itinerary validation failed: {0}")]
    InvalidItinerary(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Weather network error: {0}")]
    WeatherTransport(String),

    #[error("Weather request timed out after {0}s")]
    Timeout(u64),

    #[error("Weather API key is invalid or expired")]
    InvalidCredentials,

    #[error("No weather data found for city \"{0}\"")]
    CityNotFound(String),

    #[error("Weather API rate limit exceeded")]
    RateLimited,

    #[error("Weather provider error (HTTP {status}): {message}")]
    WeatherUpstream { status: u16, message: String },

    #[error("Weather payload is malformed: {0}")]
    MalformedForecast(String),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PlannerError>;

impl PlannerError {
    /// Check if this error is worth a manual retry by the caller
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PlannerError::StreamFailed(_)
                | PlannerError::MalformedCompletion { .. }
                | PlannerError::InvalidItinerary(_)
                | PlannerError::WeatherTransport(_)
                | PlannerError::Timeout(_)
                | PlannerError::RateLimited
        )
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            PlannerError::Config(_) => "CONFIG_ERROR",
            PlannerError::InvalidRequest(_) => "INVALID_REQUEST",
            PlannerError::Upstream(_) => "UPSTREAM_ERROR",
            PlannerError::StreamFailed(_) => "STREAM_FAILED",
            PlannerError::MalformedCompletion { .. } => "MALFORMED_COMPLETION",
            PlannerError::InvalidItinerary(_) => "INVALID_ITINERARY",
            PlannerError::Serialization(_) => "SERIALIZATION_ERROR",
            PlannerError::WeatherTransport(_) => "WEATHER_TRANSPORT_ERROR",
            PlannerError::Timeout(_) => "WEATHER_TIMEOUT",
            PlannerError::InvalidCredentials => "WEATHER_INVALID_CREDENTIALS",
            PlannerError::CityNotFound(_) => "WEATHER_CITY_NOT_FOUND",
            PlannerError::RateLimited => "WEATHER_RATE_LIMITED",
            PlannerError::WeatherUpstream { .. } => "WEATHER_UPSTREAM_ERROR",
            PlannerError::MalformedForecast(_) => "WEATHER_MALFORMED_PAYLOAD",
            PlannerError::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }

    /// Human-readable message for display. Technical detail is only included
    /// in diagnostic mode.
    pub fn user_message(&self, diagnostic: bool) -> String {
        let friendly = match self {
            PlannerError::Config(_) => "The service is not configured correctly.",
            PlannerError::InvalidRequest(_) => "Please check the trip details and try again.",
            PlannerError::Upstream(_) => "The itinerary service is unavailable right now.",
            PlannerError::StreamFailed(_) => {
                "The connection dropped while generating the itinerary."
            }
            PlannerError::MalformedCompletion { .. } | PlannerError::InvalidItinerary(_) => {
                "The generated itinerary was unusable. Please try again."
            }
            PlannerError::Serialization(_) => "An internal data error occurred.",
            PlannerError::WeatherTransport(_) => "Could not reach the weather service.",
            PlannerError::Timeout(_) => "The weather request timed out. Please retry later.",
            PlannerError::InvalidCredentials => "The weather API key is invalid.",
            PlannerError::CityNotFound(_) => {
                "No weather found for that city. Try its English name."
            }
            PlannerError::RateLimited => "Too many weather requests. Please retry later.",
            PlannerError::WeatherUpstream { .. } => "The weather provider returned an error.",
            PlannerError::MalformedForecast(_) => "The weather data was unreadable.",
            PlannerError::Persistence(_) => "Saving the itinerary failed.",
        };

        if diagnostic {
            format!("{} ({})", friendly, self)
        } else {
            friendly.to_string()
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "retryable": self.is_retryable()
            }
        })
    }
}
