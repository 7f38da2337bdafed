pub mod activity;
pub mod config;
pub mod reminder;
pub mod suggest;
pub mod water;

use chrono::{Local, NaiveDateTime, NaiveTime};

/// Local wall-clock time, or today at `at` ("HH:MM") when given.
pub fn resolve_now(at: Option<&str>) -> Result<NaiveDateTime, Box<dyn std::error::Error>> {
    let now = Local::now().naive_local();
    match at {
        Some(raw) => {
            let time = NaiveTime::parse_from_str(raw, "%H:%M")
                .map_err(|e| format!("invalid time '{raw}' (expected HH:MM): {e}"))?;
            Ok(now.date().and_time(time))
        }
        None => Ok(now),
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
