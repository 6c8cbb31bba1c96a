use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use std::sync::OnceLock;

use crate::error::{PlannerError, Result};
use crate::types::itinerary::Itinerary;

const MAX_SCHEMA_ERRORS: usize = 3;

fn itinerary_schema() -> &'static Value {
    static SCHEMA: OnceLock<Value> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        let root = schemars::schema_for!(Itinerary);
        serde_json::to_value(root).expect("itinerary schema serializes")
    })
}

/// Validate a sanitized completion document against the Itinerary contract.
/// Structural failures carry instance paths; there is no partial acceptance.
/// On success the returned value satisfies every itinerary invariant.
pub fn validate_itinerary(document: &Value) -> Result<Itinerary> {
    let validator = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(itinerary_schema())
        .map_err(|err| {
            PlannerError::InvalidItinerary(format!(
                "failed to prepare itinerary schema for validation: {}",
                err
            ))
        })?;

    if let Err(errors) = validator.validate(document) {
        let mut details = Vec::new();
        let mut truncated = false;

        for (idx, error) in errors.enumerate() {
            if idx < MAX_SCHEMA_ERRORS {
                let mut path = error.instance_path.to_string();
                if path.is_empty() {
                    path = "<root>".to_string();
                }
                details.push(format!("{}: {}", path, error));
            } else {
                truncated = true;
                break;
            }
        }

        let mut detail_str = if details.is_empty() {
            "document failed schema validation".to_string()
        } else {
            details.join("; ")
        };
        if truncated {
            detail_str.push_str("; additional errors truncated");
        }

        return Err(PlannerError::InvalidItinerary(detail_str));
    }

    let itinerary: Itinerary =
        serde_path_to_error::deserialize(document.clone()).map_err(|err| {
            PlannerError::InvalidItinerary(format!("at {}: {}", err.path(), err))
        })?;

    check_non_empty(&itinerary)?;
    Ok(itinerary)
}

fn check_non_empty(itinerary: &Itinerary) -> Result<()> {
    if itinerary.title.trim().is_empty() {
        return Err(PlannerError::InvalidItinerary(
            "title: must not be empty".to_string(),
        ));
    }
    if itinerary.days.is_empty() {
        return Err(PlannerError::InvalidItinerary(
            "days: must contain at least one day".to_string(),
        ));
    }

    for (day_idx, day) in itinerary.days.iter().enumerate() {
        if day.date.trim().is_empty() {
            return Err(PlannerError::InvalidItinerary(format!(
                "/days/{}/date: must not be empty",
                day_idx
            )));
        }
        if day.activities.is_empty() {
            return Err(PlannerError::InvalidItinerary(format!(
                "/days/{}/activities: must contain at least one activity",
                day_idx
            )));
        }
        for (act_idx, activity) in day.activities.iter().enumerate() {
            for (field, value) in [
                ("time", &activity.time),
                ("title", &activity.title),
                ("description", &activity.description),
            ] {
                if value.trim().is_empty() {
                    return Err(PlannerError::InvalidItinerary(format!(
                        "/days/{}/activities/{}/{}: must not be empty",
                        day_idx, act_idx, field
                    )));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_document() -> Value {
        json!({
            "title": "Trip",
            "days": [{
                "date": "2025/06/01",
                "activities": [{
                    "time": "morning",
                    "title": "Walk",
                    "description": "See the park and relax"
                }]
            }]
        })
    }

    #[test]
    fn accepts_valid_document() {
        let itinerary = validate_itinerary(&valid_document()).unwrap();
        assert_eq!(itinerary.title, "Trip");
        assert_eq!(itinerary.days.len(), 1);
    }

    #[test]
    fn rejects_missing_title() {
        let mut doc = valid_document();
        doc.as_object_mut().unwrap().remove("title");
        let err = validate_itinerary(&doc).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ITINERARY");
    }

    #[test]
    fn rejects_empty_days() {
        let mut doc = valid_document();
        doc["days"] = json!([]);
        assert!(validate_itinerary(&doc).is_err());
    }

    #[test]
    fn rejects_wrongly_typed_field() {
        let mut doc = valid_document();
        doc["days"][0]["activities"][0]["time"] = json!(9);
        assert!(validate_itinerary(&doc).is_err());
    }

    #[test]
    fn error_names_the_failing_path() {
        let mut doc = valid_document();
        doc["days"][0]["activities"][0]["description"] = json!("");
        let err = validate_itinerary(&doc).unwrap_err();
        assert!(err
            .to_string()
            .contains("/days/0/activities/0/description"));
    }

    #[test]
    fn sanitize_then_validate_only_rewrites_descriptions() {
        use crate::services::sanitize::sanitize_descriptions;

        let mut doc = valid_document();
        doc["days"][0]["activities"][0]["description"] =
            json!("  See the park\n\nand relax ");
        let mut expected = valid_document();
        expected["days"][0]["activities"][0]["description"] = json!("See the park and relax");

        sanitize_descriptions(&mut doc);
        let itinerary = validate_itinerary(&doc).unwrap();
        let round_tripped = serde_json::to_value(&itinerary).unwrap();
        assert_eq!(round_tripped, expected);
    }

    #[test]
    fn rejects_day_without_activities_key() {
        let doc = json!({
            "title": "Trip",
            "days": [{ "date": "2025/06/01" }]
        });
        assert!(validate_itinerary(&doc).is_err());
    }
}
