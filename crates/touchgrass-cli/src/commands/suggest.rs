use clap::Args;
use touchgrass_core::engine::format_length;
use touchgrass_core::providers::{StaticCalendar, StaticWeather};
use touchgrass_core::storage::WaterLog;
use touchgrass_core::{Config, Database, SuggestionEngine, SuggestionHost, WeatherCondition, WeatherData};

use super::{print_json, resolve_now};

#[derive(Args)]
pub struct SuggestArgs {
    /// Seconds free before the next meeting
    #[arg(long)]
    available_secs: Option<u64>,
    /// Minutes since the last break (derived from history when omitted)
    #[arg(long)]
    since_break_min: Option<u64>,
    /// Temperature in °F
    #[arg(long, requires = "condition")]
    temp: Option<f64>,
    /// Sky condition: sunny, cloudy, partly-cloudy, rainy, snowy
    #[arg(long, requires = "temp")]
    condition: Option<WeatherCondition>,
    /// It is dark outside
    #[arg(long)]
    night: bool,
    /// Number of meetings today
    #[arg(long, default_value = "0")]
    meetings: u32,
    /// Suggest as of today at HH:MM instead of now
    #[arg(long)]
    at: Option<String>,
    /// Print the suggestion as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: SuggestArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let now = resolve_now(args.at.as_deref())?;

    let weather = match (args.temp, args.condition) {
        (Some(temperature_f), Some(condition)) if config.suggestions.outdoor_enabled => {
            Some(WeatherData {
                temperature_f,
                condition,
                is_daylight: !args.night,
            })
        }
        _ => None,
    };
    let calendar = StaticCalendar {
        seconds_until_next: args
            .available_secs
            .or(config.suggestions.default_available_seconds),
        meeting_count: args.meetings,
        in_meeting: false,
    };
    let goal = if config.water.enabled {
        config.water.daily_goal
    } else {
        0
    };

    let host = SuggestionHost::new(
        SuggestionEngine::new(),
        Box::new(StaticWeather(weather)),
        Box::new(calendar),
        Box::new(&db),
        Box::new(WaterLog::new(&db, goal)),
    );
    let since_break = args.since_break_min.map(|m| m * 60);
    let Some(suggestion) = host.suggest_at(now, since_break)? else {
        println!("In a meeting. No suggestion right now.");
        return Ok(());
    };

    if args.json {
        return print_json(&suggestion);
    }

    println!(
        "{} ({}, {})",
        suggestion.name,
        format_length(suggestion.duration_seconds),
        if suggestion.is_indoor { "indoor" } else { "outdoor" }
    );
    println!("{}", suggestion.reason);
    if let Some(tip) = &suggestion.hydration_tip {
        println!("{tip}");
    }
    Ok(())
}
