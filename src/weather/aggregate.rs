use chrono::{DateTime, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::weather::client::{ForecastPayload, ForecastSample, WeatherCondition};

/// Forecasts are capped at one week regardless of how many calendar dates
/// the raw payload spans.
pub const MAX_FORECAST_DAYS: usize = 7;

/// Daytime window the representative condition is preferred from:
/// hours in [9, 18), so 18:00 and later counts as evening.
const DAYTIME_START_HOUR: u32 = 9;
const DAYTIME_END_HOUR: u32 = 18;

/// One calendar day's aggregated weather summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastDay {
    /// Seconds since epoch, normalized to that date at 12:00
    pub timestamp: i64,
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub condition: WeatherCondition,
}

/// A city's week of aggregated forecast days, chronological.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSet {
    pub city: String,
    pub country: String,
    pub days: Vec<ForecastDay>,
}

impl ForecastSet {
    pub fn from_payload(payload: &ForecastPayload) -> Self {
        Self {
            city: payload.city.name.clone(),
            country: payload.city.country.clone(),
            days: aggregate_daily(&payload.list),
        }
    }
}

/// Compress sub-daily samples into one entry per calendar date: arithmetic
/// means per field, representative condition preferred from the daytime
/// window, chronological order, truncated to 7 days. Infallible; empty
/// input yields an empty list.
pub fn aggregate_daily(samples: &[ForecastSample]) -> Vec<ForecastDay> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&ForecastSample>> = BTreeMap::new();
    for sample in samples {
        let Some(moment) = DateTime::from_timestamp(sample.dt, 0) else {
            continue;
        };
        by_date.entry(moment.date_naive()).or_default().push(sample);
    }

    by_date
        .into_iter()
        .take(MAX_FORECAST_DAYS)
        .map(|(date, group)| summarize_day(date, &group))
        .collect()
}

fn summarize_day(date: NaiveDate, group: &[&ForecastSample]) -> ForecastDay {
    let count = group.len() as f64;
    let temp = group.iter().map(|s| s.main.temp).sum::<f64>() / count;
    let feels_like = group.iter().map(|s| s.main.feels_like).sum::<f64>() / count;
    let humidity = group.iter().map(|s| s.main.humidity).sum::<f64>() / count;
    let wind_speed = group.iter().map(|s| s.wind.speed).sum::<f64>() / count;

    let representative = group
        .iter()
        .find(|s| {
            DateTime::from_timestamp(s.dt, 0)
                .map(|moment| {
                    let hour = moment.hour();
                    (DAYTIME_START_HOUR..DAYTIME_END_HOUR).contains(&hour)
                })
                .unwrap_or(false)
        })
        .or_else(|| group.first())
        .expect("group is never empty");

    let condition = representative
        .weather
        .first()
        .cloned()
        .unwrap_or(WeatherCondition {
            main: "Unknown".to_string(),
            description: String::new(),
            icon: String::new(),
        });

    let noon = date
        .and_hms_opt(12, 0, 0)
        .expect("noon is valid")
        .and_utc()
        .timestamp();

    ForecastDay {
        timestamp: noon,
        temp: round1(temp),
        feels_like: round1(feels_like),
        humidity: humidity.round(),
        wind_speed: round1(wind_speed),
        condition,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::client::{SampleMain, SampleWind};
    use chrono::NaiveDateTime;

    fn sample(when: &str, temp: f64, condition: &str) -> ForecastSample {
        let dt = NaiveDateTime::parse_from_str(when, "%Y-%m-%d %H:%M:%S")
            .unwrap()
            .and_utc()
            .timestamp();
        ForecastSample {
            dt,
            main: SampleMain {
                temp,
                feels_like: temp - 1.0,
                humidity: 60.0,
            },
            weather: vec![WeatherCondition {
                main: condition.to_string(),
                description: condition.to_lowercase(),
                icon: String::new(),
            }],
            wind: SampleWind { speed: 3.0 },
        }
    }

    #[test]
    fn one_entry_per_calendar_date_in_order() {
        let samples = vec![
            sample("2025-06-02 09:00:00", 20.0, "Clear"),
            sample("2025-06-01 09:00:00", 18.0, "Clouds"),
            sample("2025-06-01 15:00:00", 22.0, "Clear"),
        ];
        let days = aggregate_daily(&samples);
        assert_eq!(days.len(), 2);
        assert!(days[0].timestamp < days[1].timestamp);
        assert_eq!(days[0].temp, 20.0);
        assert_eq!(days[1].temp, 20.0);
    }

    #[test]
    fn means_are_rounded_per_field() {
        let samples = vec![
            sample("2025-06-01 09:00:00", 18.33, "Clear"),
            sample("2025-06-01 12:00:00", 19.0, "Clear"),
        ];
        let day = &aggregate_daily(&samples)[0];
        assert_eq!(day.temp, 18.7);
        assert_eq!(day.humidity, 60.0);
        assert_eq!(day.wind_speed, 3.0);
    }

    #[test]
    fn condition_prefers_the_daytime_window() {
        let samples = vec![
            sample("2025-06-01 03:00:00", 15.0, "Rain"),
            sample("2025-06-01 12:00:00", 20.0, "Clear"),
            sample("2025-06-01 21:00:00", 16.0, "Clouds"),
        ];
        let day = &aggregate_daily(&samples)[0];
        assert_eq!(day.condition.main, "Clear");
    }

    #[test]
    fn evening_samples_do_not_count_as_daytime() {
        // 18:30 is past the daytime window; with no daytime sample the
        // condition falls back to the first sample of the day.
        let samples = vec![
            sample("2025-06-01 03:00:00", 15.0, "Rain"),
            sample("2025-06-01 18:30:00", 17.0, "Clear"),
        ];
        let day = &aggregate_daily(&samples)[0];
        assert_eq!(day.condition.main, "Rain");
    }

    #[test]
    fn condition_falls_back_to_first_sample() {
        let samples = vec![
            sample("2025-06-01 03:00:00", 15.0, "Rain"),
            sample("2025-06-01 21:00:00", 16.0, "Clouds"),
        ];
        let day = &aggregate_daily(&samples)[0];
        assert_eq!(day.condition.main, "Rain");
    }

    #[test]
    fn truncates_to_seven_days() {
        let mut samples = Vec::new();
        for day in 1..=9 {
            samples.push(sample(
                &format!("2025-06-{:02} 12:00:00", day),
                20.0,
                "Clear",
            ));
        }
        assert_eq!(aggregate_daily(&samples).len(), MAX_FORECAST_DAYS);
    }

    #[test]
    fn timestamp_is_noon_normalized() {
        let samples = vec![sample("2025-06-01 03:00:00", 15.0, "Clear")];
        let day = &aggregate_daily(&samples)[0];
        let noon = DateTime::from_timestamp(day.timestamp, 0).unwrap();
        assert_eq!(noon.hour(), 12);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(aggregate_daily(&[]).is_empty());
    }
}
