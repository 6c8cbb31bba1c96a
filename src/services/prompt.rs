use crate::types::trip::TripRequest;

/// Instruction pair handed to the model backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Fixed output contract for the model. The validator is the enforcement
/// point; this text only raises the odds of a clean first pass.
const SYSTEM_INSTRUCTION: &str = r#"You are a professional travel planner. Generate a detailed itinerary from the trip brief the user provides. Respond with a single valid JSON document and nothing else: no prose, no markdown fences, no commentary. The JSON must have exactly this shape:
{
  "title": "itinerary title",
  "days": [
    {
      "date": "date (YYYY/MM/DD)",
      "activities": [
        {
          "time": "time-of-day label",
          "title": "activity title",
          "description": "activity description (no line breaks)"
        }
      ]
    }
  ]
}
Cover every day of the trip in chronological order, include morning, afternoon and evening coverage for each day, never repeat the same activity verbatim across days, and keep every description free of line breaks."#;

/// Build the (system, user) instruction pair for a validated trip request.
/// Pure and deterministic: no I/O, identical input yields identical output.
pub fn build_prompt(request: &TripRequest) -> PromptPair {
    let user = format!(
        "Please generate an itinerary for the following trip:\n\
         Destination: {}\n\
         Description: {}\n\
         Start date: {}\n\
         End date: {}\n\
         First visit: {}\n\
         Budget: {}\n\
         Travel type: {}\n\
         Interests: {}",
        request.destination,
        request.description,
        request.start_date,
        request.end_date,
        if request.first_time_visiting { "yes" } else { "no" },
        request.planned_spending,
        request.travel_type.as_str(),
        request.interests_joined(),
    );

    PromptPair {
        system: SYSTEM_INSTRUCTION.to_string(),
        user,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::trip::TravelType;
    use std::collections::BTreeSet;

    fn request() -> TripRequest {
        TripRequest {
            destination: "Barcelona".to_string(),
            description: "A relaxed long weekend".to_string(),
            start_date: "2025/06/01".to_string(),
            end_date: "2025/06/03".to_string(),
            first_time_visiting: true,
            planned_spending: "1000 - 2500".to_string(),
            travel_type: TravelType::Couple,
            interests: BTreeSet::from([
                "Food Exploration".to_string(),
                "Architecture".to_string(),
            ]),
        }
    }

    #[test]
    fn prompt_is_deterministic() {
        let a = build_prompt(&request());
        let b = build_prompt(&request());
        assert_eq!(a, b);
    }

    #[test]
    fn user_prompt_interpolates_every_field() {
        let prompt = build_prompt(&request());
        assert!(prompt.user.contains("Barcelona"));
        assert!(prompt.user.contains("A relaxed long weekend"));
        assert!(prompt.user.contains("2025/06/01"));
        assert!(prompt.user.contains("2025/06/03"));
        assert!(prompt.user.contains("First visit: yes"));
        assert!(prompt.user.contains("1000 - 2500"));
        assert!(prompt.user.contains("couple"));
        assert!(prompt.user.contains("Architecture, Food Exploration"));
    }

    #[test]
    fn system_prompt_pins_json_only_output() {
        let prompt = build_prompt(&request());
        assert!(prompt.system.contains("single valid JSON document"));
        assert!(prompt.system.contains("YYYY/MM/DD"));
        assert!(prompt.system.contains("no line breaks"));
    }
}
