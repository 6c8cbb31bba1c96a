use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{PlannerError, Result};
use crate::weather::city::canonical_city;

/// Overall per-call budget; exceeding it aborts the in-flight request.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);
/// Extra attempts after the first, transport failures only.
pub const MAX_RETRIES: usize = 3;
/// First backoff delay; doubles on every retry.
pub const INITIAL_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Raw forecast payload: city identity plus sub-daily samples, the subset of
/// the provider's 5-day/3-hour response the aggregator consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPayload {
    pub city: CityInfo,
    pub list: Vec<ForecastSample>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityInfo {
    pub name: String,
    pub country: String,
}

/// One sub-daily weather reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSample {
    /// Seconds since epoch
    pub dt: i64,
    pub main: SampleMain,
    pub weather: Vec<WeatherCondition>,
    pub wind: SampleWind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub main: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleWind {
    pub speed: f64,
}

/// Seam for the fetch step so the cache and service layers can be exercised
/// without a network.
#[async_trait]
pub trait ForecastFetch: Send + Sync {
    async fn fetch_forecast(&self, city: &str) -> Result<ForecastPayload>;
}

#[derive(Clone, Debug)]
pub struct WeatherClient {
    api_key: String,
    base_url: String,
}

impl WeatherClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self { api_key, base_url }
    }

    async fn fetch_inner(&self, city: &str) -> Result<ForecastPayload> {
        let mapped = canonical_city(city);
        debug!(
            target: "trip_planner::weather",
            city = %mapped,
            original = %city,
            "fetching forecast"
        );

        let client = reqwest::Client::new();
        let url = format!("{}/forecast", self.base_url.trim_end_matches('/'));

        let response = with_retries(|| {
            let request = client
                .get(&url)
                .query(&[
                    ("q", mapped.as_str()),
                    ("appid", self.api_key.as_str()),
                    ("units", "metric"),
                    ("lang", "zh_cn"),
                    ("cnt", "7"),
                ])
                .header("Accept", "application/json");
            async move {
                request
                    .send()
                    .await
                    .map_err(|err| PlannerError::WeatherTransport(err.to_string()))
            }
        })
        .await?;

        let status = response.status();
        let body: serde_json::Value = response.json().await.map_err(|err| {
            PlannerError::MalformedForecast(format!("unreadable response body: {err}"))
        })?;

        if !status.is_success() {
            return Err(match status.as_u16() {
                401 => PlannerError::InvalidCredentials,
                404 => PlannerError::CityNotFound(city.trim().to_string()),
                429 => PlannerError::RateLimited,
                code => PlannerError::WeatherUpstream {
                    status: code,
                    message: body
                        .get("message")
                        .and_then(|m| m.as_str())
                        .unwrap_or("unknown provider error")
                        .to_string(),
                },
            });
        }

        if body.get("city").is_none() || body.get("list").is_none() {
            return Err(PlannerError::MalformedForecast(
                "response is missing `city` or `list`".to_string(),
            ));
        }

        serde_json::from_value(body).map_err(|err| {
            PlannerError::MalformedForecast(format!("unexpected response shape: {err}"))
        })
    }
}

#[async_trait]
impl ForecastFetch for WeatherClient {
    /// Fetch the raw forecast under the full resilience policy: transport
    /// retries with exponential backoff inside a 15-second budget. Timeout
    /// expiry drops the whole retry loop, aborting any in-flight request.
    async fn fetch_forecast(&self, city: &str) -> Result<ForecastPayload> {
        with_budget(self.fetch_inner(city)).await
    }
}

/// Enforce the overall fetch budget. Expiry drops `work`, which aborts any
/// request or backoff delay it holds, and raises the timeout condition.
pub(crate) async fn with_budget<T>(work: impl Future<Output = Result<T>>) -> Result<T> {
    match tokio::time::timeout(FETCH_TIMEOUT, work).await {
        Ok(result) => result,
        Err(_) => Err(PlannerError::Timeout(FETCH_TIMEOUT.as_secs())),
    }
}

/// Retry `attempt` on transport failures only: up to `MAX_RETRIES` extra
/// tries with delays of 1s, 2s, 4s. Any received HTTP response, error status
/// included, is returned without retry.
pub(crate) async fn with_retries<T, F, Fut>(mut attempt: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut retries_left = MAX_RETRIES;
    let mut delay = INITIAL_RETRY_DELAY;

    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(err @ PlannerError::WeatherTransport(_)) if retries_left > 0 => {
                warn!(
                    target: "trip_planner::weather",
                    retries_left,
                    error = %err,
                    "transport failure, retrying"
                );
                tokio::time::sleep(delay).await;
                retries_left -= 1;
                delay *= 2;
            }
            Err(err) => return Err(err),
        }
    }
}
