use serde::{Deserialize, Serialize};

use crate::weather::aggregate::ForecastDay;

const COLD_THRESHOLD: f64 = 10.0;
const HOT_THRESHOLD: f64 = 30.0;
const STRONG_WIND_THRESHOLD: f64 = 10.0;

/// Rule-derived travel advisory over an aggregated week. Deterministic,
/// never model-generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherAdvisory {
    pub overview: String,
    pub clothing: String,
    pub activities: String,
    pub precautions: String,
}

/// Derive the four advisory fields from simple threshold rules. Empty input
/// yields a placeholder advisory, never an error.
pub fn derive_advisory(days: &[ForecastDay]) -> WeatherAdvisory {
    if days.is_empty() {
        return WeatherAdvisory {
            overview: "No weather data available yet.".to_string(),
            clothing: String::new(),
            activities: String::new(),
            precautions: String::new(),
        };
    }

    let avg_temp = days.iter().map(|d| d.temp).sum::<f64>() / days.len() as f64;
    let conditions: Vec<String> = days
        .iter()
        .map(|d| d.condition.main.to_lowercase())
        .collect();
    let has_rain = conditions.iter().any(|c| c.contains("rain"));
    let has_snow = conditions.iter().any(|c| c.contains("snow"));
    let has_clear = conditions.iter().any(|c| c.contains("clear"));
    let all_clear = has_clear && conditions.iter().all(|c| c.contains("clear"));
    let has_strong_wind = days.iter().any(|d| d.wind_speed > STRONG_WIND_THRESHOLD);

    let temp_word = if avg_temp < COLD_THRESHOLD {
        "on the cold side"
    } else if avg_temp > HOT_THRESHOLD {
        "hot"
    } else {
        "comfortable"
    };
    let sky_word = if all_clear {
        "mostly clear skies"
    } else if has_rain && has_snow {
        "very changeable weather"
    } else if has_rain {
        "some rainy spells"
    } else if has_snow {
        "some snowfall"
    } else {
        "fairly stable weather"
    };
    let overview = format!(
        "Average temperature around {:.0}°C over the coming days, {}. Expect {}.",
        avg_temp, temp_word, sky_word
    );

    let clothing = if avg_temp < COLD_THRESHOLD {
        "Pack warm layers plus a hat and scarf; mornings and evenings will be noticeably colder."
    } else if avg_temp > HOT_THRESHOLD {
        "Choose light, breathable fabrics and bring sunscreen, sunglasses and a sun hat."
    } else {
        "Comfortable, breathable clothing works well; bring a light jacket for temperature swings."
    }
    .to_string();

    let activities = if all_clear {
        "Great conditions for outdoor plans: sightseeing, walking tours and photography all work."
    } else if has_rain || has_snow {
        "Prioritize indoor options like museums, galleries and food spots; keep key outdoor plans away from wet days."
    } else {
        "Most of the week suits outdoor activity; check each day's forecast and keep plans flexible."
    }
    .to_string();

    let mut cautions = Vec::new();
    if has_rain {
        cautions.push("carry rain gear");
    }
    if has_snow {
        cautions.push("watch for slippery ground");
    }
    if has_strong_wind {
        cautions.push("guard against strong wind");
    }
    if avg_temp > HOT_THRESHOLD {
        cautions.push("avoid midday heat");
    }
    if avg_temp < COLD_THRESHOLD {
        cautions.push("keep warm");
    }
    let precautions = if cautions.is_empty() {
        "Conditions look mild; stay hydrated and enjoy the trip.".to_string()
    } else {
        format!("Take note: {}.", cautions.join(", "))
    };

    WeatherAdvisory {
        overview,
        clothing,
        activities,
        precautions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::client::WeatherCondition;

    fn day(temp: f64, condition: &str, wind: f64) -> ForecastDay {
        ForecastDay {
            timestamp: 1_748_779_200,
            temp,
            feels_like: temp,
            humidity: 60.0,
            wind_speed: wind,
            condition: WeatherCondition {
                main: condition.to_string(),
                description: condition.to_lowercase(),
                icon: String::new(),
            },
        }
    }

    #[test]
    fn empty_input_gets_placeholder() {
        let advisory = derive_advisory(&[]);
        assert!(advisory.overview.contains("No weather data"));
        assert!(advisory.clothing.is_empty());
    }

    #[test]
    fn cold_week_advises_warm_layers() {
        let advisory = derive_advisory(&[day(2.0, "Clear", 3.0), day(5.0, "Clear", 2.0)]);
        assert!(advisory.clothing.contains("warm layers"));
        assert!(advisory.precautions.contains("keep warm"));
    }

    #[test]
    fn hot_week_advises_sun_protection() {
        let advisory = derive_advisory(&[day(33.0, "Clear", 3.0)]);
        assert!(advisory.clothing.contains("sunscreen"));
        assert!(advisory.precautions.contains("midday heat"));
    }

    #[test]
    fn rain_shifts_activities_indoors() {
        let advisory = derive_advisory(&[day(18.0, "Rain", 3.0), day(20.0, "Clear", 4.0)]);
        assert!(advisory.activities.contains("indoor"));
        assert!(advisory.precautions.contains("rain gear"));
    }

    #[test]
    fn strong_wind_adds_precaution() {
        let advisory = derive_advisory(&[day(18.0, "Clouds", 12.5)]);
        assert!(advisory.precautions.contains("strong wind"));
    }

    #[test]
    fn mild_clear_week_has_no_warnings() {
        let advisory = derive_advisory(&[day(20.0, "Clear", 3.0)]);
        assert!(advisory.precautions.contains("mild"));
        assert!(advisory.activities.contains("outdoor"));
    }
}
