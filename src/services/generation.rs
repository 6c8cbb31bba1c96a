use tracing::{debug, info};

use crate::config::PlannerConfig;
use crate::error::Result;
use crate::schemas::validate_itinerary;
use crate::services::openai_client::OpenAIClient;
use crate::services::prompt::build_prompt;
use crate::services::sanitize::{extract_json, sanitize_descriptions};
use crate::types::itinerary::Itinerary;
use crate::types::trip::TripRequest;

/// End-to-end itinerary generation: validate the request, build the prompt,
/// stream the completion, then parse, sanitize and validate the result.
#[derive(Debug, Clone)]
pub struct GenerationPipeline {
    client: OpenAIClient,
}

impl GenerationPipeline {
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            client: OpenAIClient::new(
                config.openai_api_key.clone(),
                config.openai_base_url.clone(),
                config.model.clone(),
            ),
        }
    }

    /// Generate a validated itinerary. `on_token` receives every streamed
    /// token for live display, before and independent of JSON extraction.
    /// Every failure is a typed, recoverable error; nothing here panics.
    pub async fn generate(
        &self,
        request: &TripRequest,
        on_token: impl FnMut(&str),
    ) -> Result<Itinerary> {
        request.validate()?;

        let prompt = build_prompt(request);
        debug!(
            target: "trip_planner::generation",
            destination = %request.destination,
            "starting itinerary generation"
        );

        let completion = self.client.stream_chat_completion(&prompt, on_token).await?;

        let mut document = extract_json(&completion)?;
        sanitize_descriptions(&mut document);
        let itinerary = validate_itinerary(&document)?;

        info!(
            target: "trip_planner::generation",
            title = %itinerary.title,
            days = itinerary.days.len(),
            "itinerary generated"
        );
        Ok(itinerary)
    }
}
