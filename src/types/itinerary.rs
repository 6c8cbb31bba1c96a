use crate::types::trip::{TravelType, TripRequest};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One scheduled item within a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Activity {
    /// Free-form time-of-day label, e.g. "morning" or "14:00"
    pub time: String,
    pub title: String,
    /// Never contains line breaks once sanitized
    pub description: String,
}

/// One calendar day of the trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ItineraryDay {
    /// Canonical "YYYY/MM/DD"
    pub date: String,
    /// Chronological within the day
    pub activities: Vec<Activity>,
}

/// The validated generated output: a title plus one entry per trip day,
/// chronological. Immutable after validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Itinerary {
    pub title: String,
    pub days: Vec<ItineraryDay>,
}

/// Payload handed to the persistence gateway: the validated itinerary plus
/// the originating request fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItinerary {
    pub title: String,
    pub destination: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub first_time_visiting: bool,
    pub planned_spending: String,
    pub travel_type: TravelType,
    pub interests: BTreeSet<String>,
    pub days: Vec<ItineraryDay>,
    #[serde(default)]
    pub activated: bool,
}

impl CreateItinerary {
    pub fn from_parts(request: &TripRequest, itinerary: Itinerary) -> Self {
        Self {
            title: itinerary.title,
            destination: request.destination.clone(),
            description: request.description.clone(),
            start_date: request.start_date.clone(),
            end_date: request.end_date.clone(),
            first_time_visiting: request.first_time_visiting,
            planned_spending: request.planned_spending.clone(),
            travel_type: request.travel_type,
            interests: request.interests.clone(),
            days: itinerary.days,
            activated: false,
        }
    }
}
