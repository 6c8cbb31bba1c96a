use clap::{Arg, ArgAction, Command};
use std::io::Write;
use tracing::{error, info};

use crate::config::PlannerConfig;
use crate::services::GenerationPipeline;
use crate::types::trip::TripRequest;
use crate::weather::{derive_advisory, WeatherClient, WeatherService};

/// CLI entry point for the trip-planner tool
pub async fn run() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let matches = Command::new("trip-planner")
        .version("0.1.0")
        .about("Generate validated travel itineraries with live weather context")
        .subcommand_required(true)
        .subcommand(
            Command::new("plan")
                .about("Stream an itinerary for a trip request JSON file")
                .arg(
                    Arg::new("request")
                        .help("Path to a TripRequest JSON file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("quiet")
                        .short('q')
                        .long("quiet")
                        .action(ArgAction::SetTrue)
                        .help("Suppress live token output, print only the final itinerary"),
                ),
        )
        .subcommand(
            Command::new("weather")
                .about("Fetch the 7-day forecast and travel advisory for a city")
                .arg(
                    Arg::new("city")
                        .help("City name, local-language names supported")
                        .required(true)
                        .index(1),
                ),
        )
        .get_matches();

    let config = PlannerConfig::from_env()?;

    match matches.subcommand() {
        Some(("plan", sub)) => {
            let path = sub.get_one::<String>("request").unwrap();
            let quiet = sub.get_flag("quiet");
            let raw = std::fs::read_to_string(path)?;
            let request: TripRequest = serde_json::from_str(&raw)?;

            info!("Generating itinerary for {}", request.destination);
            let pipeline = GenerationPipeline::new(&config);

            let result = pipeline
                .generate(&request, |token| {
                    if !quiet {
                        print!("{token}");
                        let _ = std::io::stdout().flush();
                    }
                })
                .await;

            match result {
                Ok(itinerary) => {
                    if !quiet {
                        println!();
                    }
                    println!("\n{}", itinerary.title);
                    for day in &itinerary.days {
                        println!("\n{}", day.date);
                        for activity in &day.activities {
                            println!("  [{}] {} — {}", activity.time, activity.title, activity.description);
                        }
                    }
                }
                Err(err) => {
                    error!("Generation failed: {}", err);
                    eprintln!("{}", err.user_message(cfg!(debug_assertions)));
                    return Err(err.into());
                }
            }
        }
        Some(("weather", sub)) => {
            let city = sub.get_one::<String>("city").unwrap();
            let client = WeatherClient::new(config.weather_api_key, config.weather_base_url);
            let service = WeatherService::new(client);

            match service.forecast(city).await {
                Ok(set) => {
                    println!("Forecast for {}, {}", set.city, set.country);
                    for day in &set.days {
                        let date = chrono::DateTime::from_timestamp(day.timestamp, 0)
                            .map(|d| d.format("%Y/%m/%d").to_string())
                            .unwrap_or_else(|| day.timestamp.to_string());
                        println!(
                            "  {}  {:>5.1}°C (feels {:.1}°C)  {}  wind {:.1}  humidity {:.0}%",
                            date,
                            day.temp,
                            day.feels_like,
                            day.condition.description,
                            day.wind_speed,
                            day.humidity
                        );
                    }
                    let advisory = derive_advisory(&set.days);
                    println!("\n{}", advisory.overview);
                    println!("Clothing: {}", advisory.clothing);
                    println!("Activities: {}", advisory.activities);
                    println!("Precautions: {}", advisory.precautions);
                }
                Err(err) => {
                    error!("Forecast failed: {}", err);
                    eprintln!("{}", err.user_message(cfg!(debug_assertions)));
                    return Err(err.into());
                }
            }
        }
        _ => unreachable!("subcommand is required"),
    }

    Ok(())
}
