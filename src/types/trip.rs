use crate::error::{PlannerError, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Longest allowed trip: 4 elapsed days, i.e. at most 5 calendar days.
pub const MAX_TRIP_SPAN_DAYS: i64 = 4;

/// Canonical date format used across prompts and itineraries.
pub const DATE_FORMAT: &str = "%Y/%m/%d";

/// Who the user is travelling with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelType {
    Solo,
    Couple,
    Family,
    Friends,
}

impl TravelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelType::Solo => "solo",
            TravelType::Couple => "couple",
            TravelType::Family => "family",
            TravelType::Friends => "friends",
        }
    }
}

/// User-supplied trip parameters that seed itinerary generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub destination: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub first_time_visiting: bool,
    /// Budget band label, e.g. "1000 - 2500"
    pub planned_spending: String,
    pub travel_type: TravelType,
    /// Interest tags; set semantics, duplicates collapse on deserialization
    pub interests: BTreeSet<String>,
}

impl TripRequest {
    /// Validate every field and the date window. Must pass before any
    /// network call is made.
    pub fn validate(&self) -> Result<()> {
        if self.destination.trim().is_empty() {
            return Err(PlannerError::InvalidRequest(
                "destination must not be empty".to_string(),
            ));
        }
        if self.description.trim().is_empty() {
            return Err(PlannerError::InvalidRequest(
                "description must not be empty".to_string(),
            ));
        }
        if self.planned_spending.trim().is_empty() {
            return Err(PlannerError::InvalidRequest(
                "plannedSpending must not be empty".to_string(),
            ));
        }

        let start = parse_trip_date(&self.start_date, "startDate")?;
        let end = parse_trip_date(&self.end_date, "endDate")?;

        let span = end - start;
        if span <= Duration::zero() {
            return Err(PlannerError::InvalidRequest(
                "endDate must be after startDate".to_string(),
            ));
        }
        if span > Duration::days(MAX_TRIP_SPAN_DAYS) {
            return Err(PlannerError::InvalidRequest(format!(
                "trip can not span more than {} days",
                MAX_TRIP_SPAN_DAYS + 1
            )));
        }

        Ok(())
    }

    pub fn start(&self) -> Result<NaiveDateTime> {
        parse_trip_date(&self.start_date, "startDate")
    }

    pub fn end(&self) -> Result<NaiveDateTime> {
        parse_trip_date(&self.end_date, "endDate")
    }

    /// Inclusive calendar-day list the generated itinerary must cover,
    /// formatted "YYYY/MM/DD".
    pub fn trip_days(&self) -> Result<Vec<String>> {
        let start = self.start()?.date();
        let end = self.end()?.date();

        let mut days = Vec::new();
        let mut current = start;
        while current <= end {
            days.push(current.format(DATE_FORMAT).to_string());
            current = current + Duration::days(1);
        }
        Ok(days)
    }

    /// Interests joined for prompt interpolation; deterministic because the
    /// underlying set is ordered.
    pub fn interests_joined(&self) -> String {
        self.interests
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Accept "YYYY/MM/DD" (midnight) or a full "YYYY/MM/DD HH:MM:SS" timestamp,
/// with "-" separators tolerated.
fn parse_trip_date(raw: &str, field: &str) -> Result<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PlannerError::InvalidRequest(format!(
            "{} must not be empty",
            field
        )));
    }

    for fmt in ["%Y/%m/%d %H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt);
        }
    }
    for fmt in [DATE_FORMAT, "%Y-%m-%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Ok(date.and_hms_opt(0, 0, 0).expect("midnight is valid"));
        }
    }

    Err(PlannerError::InvalidRequest(format!(
        "{} \"{}\" is not a valid date",
        field, trimmed
    )))
}
