use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::error::{PlannerError, Result};
use crate::weather::aggregate::ForecastSet;

/// Session-scoped forecast cache, keyed by normalized destination. Positive
/// entries short-circuit fetch and aggregation; negative entries replay the
/// previous failure so a doomed destination is not re-fetched. An owned
/// object with an explicit lifecycle, not global state. No invalidation
/// other than `clear` or drop.
#[derive(Debug, Default)]
pub struct ForecastCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

#[derive(Debug, Clone)]
enum CacheEntry {
    Success(Arc<ForecastSet>),
    Failure(CachedFailure),
}

#[derive(Debug, Clone)]
struct CachedFailure {
    code: &'static str,
    city: String,
    status: u16,
    message: String,
}

impl ForecastCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a normalized key. `Some(Ok)` is a positive hit, `Some(Err)`
    /// a replayed negative entry, `None` a miss.
    pub fn get(&self, key: &str) -> Option<Result<Arc<ForecastSet>>> {
        let entries = self.entries.lock().expect("cache lock poisoned");
        entries.get(key).map(|entry| match entry {
            CacheEntry::Success(set) => {
                debug!(target: "trip_planner::weather", key, "forecast cache hit");
                Ok(Arc::clone(set))
            }
            CacheEntry::Failure(failure) => {
                debug!(target: "trip_planner::weather", key, "negative cache hit");
                Err(failure.replay())
            }
        })
    }

    pub fn put_success(&self, key: String, set: Arc<ForecastSet>) {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.insert(key, CacheEntry::Success(set));
    }

    pub fn put_failure(&self, key: String, error: &PlannerError) {
        let failure = CachedFailure {
            code: error.error_code(),
            city: match error {
                PlannerError::CityNotFound(city) => city.clone(),
                _ => key.clone(),
            },
            status: match error {
                PlannerError::WeatherUpstream { status, .. } => *status,
                _ => 0,
            },
            message: match error {
                PlannerError::WeatherUpstream { message, .. } => message.clone(),
                PlannerError::MalformedForecast(detail)
                | PlannerError::WeatherTransport(detail) => detail.clone(),
                other => other.to_string(),
            },
        };
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.insert(key, CacheEntry::Failure(failure));
    }

    pub fn clear(&self) {
        self.entries.lock().expect("cache lock poisoned").clear();
    }
}

impl CachedFailure {
    /// Rebuild the typed condition the original fetch failed with.
    fn replay(&self) -> PlannerError {
        match self.code {
            "WEATHER_INVALID_CREDENTIALS" => PlannerError::InvalidCredentials,
            "WEATHER_CITY_NOT_FOUND" => PlannerError::CityNotFound(self.city.clone()),
            "WEATHER_RATE_LIMITED" => PlannerError::RateLimited,
            "WEATHER_TIMEOUT" => {
                PlannerError::Timeout(crate::weather::client::FETCH_TIMEOUT.as_secs())
            }
            "WEATHER_MALFORMED_PAYLOAD" => {
                PlannerError::MalformedForecast(self.message.clone())
            }
            "WEATHER_UPSTREAM_ERROR" => PlannerError::WeatherUpstream {
                status: self.status,
                message: self.message.clone(),
            },
            _ => PlannerError::WeatherTransport(self.message.clone()),
        }
    }
}
