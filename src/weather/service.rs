use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::Result;
use crate::weather::advisory::{derive_advisory, WeatherAdvisory};
use crate::weather::aggregate::ForecastSet;
use crate::weather::cache::ForecastCache;
use crate::weather::city::cache_key;
use crate::weather::client::ForecastFetch;

/// Forecast orchestration: read-before-fetch caching, aggregation and
/// advisory derivation over any `ForecastFetch` implementation.
pub struct WeatherService<F: ForecastFetch> {
    fetcher: F,
    cache: ForecastCache,
    inflight: Mutex<Option<PendingLookup>>,
}

struct PendingLookup {
    key: String,
    handle: tokio::task::AbortHandle,
}

impl<F: ForecastFetch> WeatherService<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            cache: ForecastCache::new(),
            inflight: Mutex::new(None),
        }
    }

    /// Fetch and aggregate the forecast for a destination. A cache hit,
    /// positive or negative, short-circuits both the network call and
    /// aggregation. Aggregation only starts once the fetch has fully
    /// succeeded.
    pub async fn forecast(&self, city: &str) -> Result<Arc<ForecastSet>> {
        let key = cache_key(city);
        if let Some(cached) = self.cache.get(&key) {
            return cached;
        }

        match self.fetcher.fetch_forecast(city).await {
            Ok(payload) => {
                let set = Arc::new(ForecastSet::from_payload(&payload));
                debug!(
                    target: "trip_planner::weather",
                    city = %set.city,
                    days = set.days.len(),
                    "forecast aggregated"
                );
                self.cache.put_success(key, Arc::clone(&set));
                Ok(set)
            }
            Err(err) => {
                self.cache.put_failure(key, &err);
                Err(err)
            }
        }
    }

    /// Forecast plus the rule-derived advisory.
    pub async fn forecast_with_advisory(
        &self,
        city: &str,
    ) -> Result<(Arc<ForecastSet>, WeatherAdvisory)> {
        let set = self.forecast(city).await?;
        let advisory = derive_advisory(&set.days);
        Ok((set, advisory))
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

impl<F: ForecastFetch + 'static> WeatherService<F> {
    /// Start a lookup for the latest destination the user typed, cancelling
    /// any pending lookup for a stale destination first. At most one lookup
    /// is in flight at a time.
    pub fn lookup_latest(self: &Arc<Self>, city: &str) -> JoinHandle<Result<Arc<ForecastSet>>> {
        let key = cache_key(city);

        let mut inflight = self.inflight.lock().expect("inflight lock poisoned");
        if let Some(pending) = inflight.take() {
            // Same key or not: replacing without aborting would leave two
            // lookups in flight at once.
            if !pending.handle.is_finished() {
                debug!(
                    target: "trip_planner::weather",
                    stale = %pending.key,
                    current = %key,
                    "cancelling pending forecast lookup"
                );
                pending.handle.abort();
            }
        }

        let service = Arc::clone(self);
        let city = city.to_string();
        let handle = tokio::spawn(async move { service.forecast(&city).await });
        *inflight = Some(PendingLookup {
            key,
            handle: handle.abort_handle(),
        });
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlannerError;
    use crate::weather::client::{CityInfo, ForecastPayload};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingFetcher {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingFetcher {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl ForecastFetch for CountingFetcher {
        async fn fetch_forecast(&self, city: &str) -> Result<ForecastPayload> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(PlannerError::CityNotFound(city.to_string()));
            }
            Ok(ForecastPayload {
                city: CityInfo {
                    name: city.to_string(),
                    country: "ES".to_string(),
                },
                list: Vec::new(),
            })
        }
    }

    #[tokio::test]
    async fn second_lookup_is_a_cache_hit() {
        let service = WeatherService::new(CountingFetcher::new(false));

        service.forecast("Barcelona").await.unwrap();
        service.forecast("  BARCELONA ").await.unwrap();

        assert_eq!(service.fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_lookup_is_negatively_cached() {
        let service = WeatherService::new(CountingFetcher::new(true));

        let first = service.forecast("Atlantis").await.unwrap_err();
        let second = service.forecast("Atlantis").await.unwrap_err();

        assert_eq!(first.error_code(), "WEATHER_CITY_NOT_FOUND");
        assert_eq!(second.error_code(), "WEATHER_CITY_NOT_FOUND");
        assert_eq!(service.fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cache_clear_forces_a_refetch() {
        let service = WeatherService::new(CountingFetcher::new(false));

        service.forecast("Barcelona").await.unwrap();
        service.clear_cache();
        service.forecast("Barcelona").await.unwrap();

        assert_eq!(service.fetcher.calls.load(Ordering::SeqCst), 2);
    }

    struct SlowFetcher;

    #[async_trait]
    impl ForecastFetch for SlowFetcher {
        async fn fetch_forecast(&self, city: &str) -> Result<ForecastPayload> {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            Ok(ForecastPayload {
                city: CityInfo {
                    name: city.to_string(),
                    country: "ES".to_string(),
                },
                list: Vec::new(),
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_lookup_for_same_destination_cancels_the_pending_one() {
        let service = Arc::new(WeatherService::new(SlowFetcher));

        let first = service.lookup_latest("Barcelona");
        // Let the first task start and park on its fetch
        tokio::task::yield_now().await;
        let second = service.lookup_latest("Barcelona");

        let join_err = first.await.unwrap_err();
        assert!(join_err.is_cancelled());

        let result = second.await.unwrap().unwrap();
        assert_eq!(result.city, "Barcelona");
    }

    #[tokio::test]
    async fn latest_lookup_wins() {
        let service = Arc::new(WeatherService::new(CountingFetcher::new(false)));

        let stale = service.lookup_latest("Madrid");
        let current = service.lookup_latest("Barcelona");

        let result = current.await.unwrap().unwrap();
        assert_eq!(result.city, "Barcelona");
        // The stale handle either completed before the abort or was cancelled
        let _ = stale.await;
    }
}
