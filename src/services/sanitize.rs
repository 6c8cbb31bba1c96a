use serde_json::Value;
use tracing::debug;

use crate::error::{PlannerError, Result};

/// Strict-parse the accumulated completion text. No speculative repair
/// beyond description sanitization: over-aggressive repair risks silently
/// accepting wrong content. The raw text travels with the error for
/// diagnostics.
pub fn extract_json(completion: &str) -> Result<Value> {
    serde_json::from_str(completion.trim()).map_err(|err| {
        debug!(
            target: "trip_planner::generation",
            error = %err,
            raw = completion,
            "completion failed strict JSON parse"
        );
        PlannerError::MalformedCompletion {
            detail: err.to_string(),
            raw: completion.to_string(),
        }
    })
}

/// Restore the no-line-break invariant on every activity description:
/// each run of `\n`/`\r` collapses to a single space, then the field is
/// trimmed. Idempotent; nothing else in the document is touched.
pub fn sanitize_descriptions(document: &mut Value) {
    let Some(days) = document.get_mut("days").and_then(Value::as_array_mut) else {
        return;
    };

    for day in days {
        let Some(activities) = day.get_mut("activities").and_then(Value::as_array_mut) else {
            continue;
        };
        for activity in activities {
            if let Some(description) = activity.get_mut("description") {
                if let Some(text) = description.as_str() {
                    *description = Value::String(collapse_line_breaks(text));
                }
            }
        }
    }
}

fn collapse_line_breaks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_break = false;
    for ch in text.chars() {
        if ch == '\n' || ch == '\r' {
            in_break = true;
        } else {
            if in_break {
                out.push(' ');
                in_break = false;
            }
            out.push(ch);
        }
    }
    out.trim().to_string()
}
