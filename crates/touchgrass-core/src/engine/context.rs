//! Suggestion context and the helpers that classify it.
//!
//! An [`ActivityContext`] is a snapshot of everything the engine looks at for
//! one call: wall-clock time, the time budget before the next meeting,
//! weather, activity history and hydration. All timestamps are local
//! wall-clock times.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Window in which the latest completion counts as a repeat.
pub const REPEAT_WINDOW_SECS: i64 = 60 * 60;

/// Kind of activity a candidate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityCategory {
    Movement,
    Stretch,
    Breathing,
    Meditation,
    Outdoor,
    Posture,
}

impl ActivityCategory {
    pub const ALL: [ActivityCategory; 6] = [
        ActivityCategory::Movement,
        ActivityCategory::Stretch,
        ActivityCategory::Breathing,
        ActivityCategory::Meditation,
        ActivityCategory::Outdoor,
        ActivityCategory::Posture,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ActivityCategory::Movement => "movement",
            ActivityCategory::Stretch => "stretch",
            ActivityCategory::Breathing => "breathing",
            ActivityCategory::Meditation => "meditation",
            ActivityCategory::Outdoor => "outdoor",
            ActivityCategory::Posture => "posture",
        }
    }

    /// Whether an activity of this category counts as a break from sitting.
    pub fn is_active(&self) -> bool {
        matches!(self, ActivityCategory::Movement | ActivityCategory::Stretch)
    }
}

impl fmt::Display for ActivityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActivityCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivityCategory::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown activity category: {s}"))
    }
}

/// Sky condition reported by the weather collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
    PartlyCloudy,
}

impl WeatherCondition {
    pub fn name(&self) -> &'static str {
        match self {
            WeatherCondition::Sunny => "sunny",
            WeatherCondition::Cloudy => "cloudy",
            WeatherCondition::Rainy => "rainy",
            WeatherCondition::Snowy => "snowy",
            WeatherCondition::PartlyCloudy => "partly cloudy",
        }
    }

    pub fn is_precipitation(&self) -> bool {
        matches!(self, WeatherCondition::Rainy | WeatherCondition::Snowy)
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WeatherCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "sunny" | "clear" => Ok(WeatherCondition::Sunny),
            "cloudy" | "overcast" => Ok(WeatherCondition::Cloudy),
            "rainy" | "rain" => Ok(WeatherCondition::Rainy),
            "snowy" | "snow" => Ok(WeatherCondition::Snowy),
            "partlycloudy" => Ok(WeatherCondition::PartlyCloudy),
            _ => Err(format!("unknown weather condition: {s}")),
        }
    }
}

/// Current weather as supplied by the weather collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherData {
    pub temperature_f: f64,
    pub condition: WeatherCondition,
    pub is_daylight: bool,
}

/// How inviting the weather is for going outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherClass {
    /// Daylight, sunny or partly cloudy, 55-85°F.
    Ideal,
    /// Dry daylight outside the ideal band but still tolerable.
    Acceptable,
    /// Rain, snow, darkness or extreme temperatures.
    Poor,
}

impl WeatherData {
    pub const IDEAL_MIN_F: f64 = 55.0;
    pub const IDEAL_MAX_F: f64 = 85.0;
    pub const TOLERABLE_MIN_F: f64 = 40.0;
    pub const TOLERABLE_MAX_F: f64 = 95.0;

    pub fn classify(&self) -> WeatherClass {
        let temp = self.temperature_f;
        if !temp.is_finite() || !self.is_daylight || self.condition.is_precipitation() {
            return WeatherClass::Poor;
        }
        if !(Self::TOLERABLE_MIN_F..=Self::TOLERABLE_MAX_F).contains(&temp) {
            return WeatherClass::Poor;
        }
        let clear = matches!(
            self.condition,
            WeatherCondition::Sunny | WeatherCondition::PartlyCloudy
        );
        if clear && (Self::IDEAL_MIN_F..=Self::IDEAL_MAX_F).contains(&temp) {
            WeatherClass::Ideal
        } else {
            WeatherClass::Acceptable
        }
    }

    /// Temperature rounded for display, e.g. `72°F`.
    pub fn temperature_label(&self) -> String {
        format!("{}°F", self.temperature_f.round() as i64)
    }
}

/// Calendar load for the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingDensity {
    Light,
    #[default]
    Normal,
    Heavy,
}

impl MeetingDensity {
    /// Classify from the number of calendar events today.
    pub fn from_meeting_count(count: u32) -> Self {
        match count {
            0..=2 => MeetingDensity::Light,
            3..=5 => MeetingDensity::Normal,
            _ => MeetingDensity::Heavy,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MeetingDensity::Light => "light",
            MeetingDensity::Normal => "normal",
            MeetingDensity::Heavy => "heavy",
        }
    }
}

/// Coarse time-of-day bucket used by scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    /// 00:00-04:59
    Night,
    /// 05:00-10:59
    Morning,
    /// 11:00-12:59
    Midday,
    /// 13:00-14:59
    EarlyAfternoon,
    /// 15:00-17:59
    LateAfternoon,
    /// 18:00-23:59
    Evening,
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=10 => TimeOfDay::Morning,
            11..=12 => TimeOfDay::Midday,
            13..=14 => TimeOfDay::EarlyAfternoon,
            15..=17 => TimeOfDay::LateAfternoon,
            18..=23 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TimeOfDay::Night => "night",
            TimeOfDay::Morning => "morning",
            TimeOfDay::Midday => "midday",
            TimeOfDay::EarlyAfternoon => "early afternoon",
            TimeOfDay::LateAfternoon => "late afternoon",
            TimeOfDay::Evening => "evening",
        }
    }
}

/// One completed activity from the history store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedActivity {
    pub activity_id: String,
    pub category: ActivityCategory,
    pub completed_at: NaiveDateTime,
    pub duration_seconds: u64,
}

/// Snapshot of the situation for one suggestion call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityContext {
    /// Local wall-clock time of the call.
    pub current_time: NaiveDateTime,
    /// Seconds until the next interruption; `None` when unbounded.
    pub available_seconds: Option<u64>,
    pub weather: Option<WeatherData>,
    pub seconds_since_last_break: u64,
    /// Today's completions in the order they happened.
    pub todays_activities: Vec<CompletedActivity>,
    /// Most recent completion of each activity on any day.
    #[serde(default)]
    pub last_completed: HashMap<String, NaiveDateTime>,
    pub meeting_density: MeetingDensity,
    pub current_water_intake: u32,
    pub daily_water_goal: u32,
    pub current_streak: u32,
}

impl ActivityContext {
    /// Empty context at `current_time`: no weather, no calendar, no history.
    pub fn new(current_time: NaiveDateTime) -> Self {
        Self {
            current_time,
            available_seconds: None,
            weather: None,
            seconds_since_last_break: 0,
            todays_activities: Vec::new(),
            last_completed: HashMap::new(),
            meeting_density: MeetingDensity::default(),
            current_water_intake: 0,
            daily_water_goal: 0,
            current_streak: 0,
        }
    }

    pub fn hour(&self) -> u32 {
        self.current_time.hour()
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from_hour(self.hour())
    }

    /// Weather classification, `None` when no weather is known.
    pub fn weather_class(&self) -> Option<WeatherClass> {
        self.weather.as_ref().map(WeatherData::classify)
    }

    /// Whether outdoor candidates may be offered at all.
    pub fn outdoor_allowed(&self) -> bool {
        matches!(
            self.weather_class(),
            Some(WeatherClass::Ideal | WeatherClass::Acceptable)
        )
    }

    /// Whether an activity of `duration_seconds` fits the time budget.
    pub fn fits(&self, duration_seconds: u64) -> bool {
        self.available_seconds
            .map_or(true, |available| duration_seconds <= available)
    }

    pub fn outdoor_done_today(&self) -> bool {
        self.todays_activities
            .iter()
            .any(|a| a.category == ActivityCategory::Outdoor)
    }

    /// Nothing recorded today or on any earlier day.
    pub fn is_first_run(&self) -> bool {
        self.todays_activities.is_empty() && self.last_completed.is_empty()
    }

    /// Id of the latest completion on any day if it finished within the
    /// repeat window.
    pub fn recent_repeat(&self) -> Option<&str> {
        let today = self
            .todays_activities
            .iter()
            .map(|a| (a.completed_at, a.activity_id.as_str()));
        let history = self
            .last_completed
            .iter()
            .map(|(id, at)| (*at, id.as_str()));
        let (latest, id) = today.chain(history).max()?;
        let age = self.current_time - latest;
        (age.num_seconds() < REPEAT_WINDOW_SECS).then_some(id)
    }

    /// Latest known completion time of `activity_id`.
    pub fn last_done(&self, activity_id: &str) -> Option<NaiveDateTime> {
        let from_today = self
            .todays_activities
            .iter()
            .filter(|a| a.activity_id == activity_id)
            .map(|a| a.completed_at)
            .max();
        let from_history = self.last_completed.get(activity_id).copied();
        from_today.max(from_history)
    }

    /// Whole calendar days since `activity_id` was last done; `None` if never.
    pub fn days_since_last_done(&self, activity_id: &str) -> Option<i64> {
        self.last_done(activity_id).map(|last| {
            (self.current_time.date() - last.date())
                .num_days()
                .max(0)
        })
    }

    /// The category shared by the three latest completions today, if any.
    pub fn streaking_category(&self) -> Option<ActivityCategory> {
        let mut recent: Vec<&CompletedActivity> = self.todays_activities.iter().collect();
        recent.sort_by_key(|a| std::cmp::Reverse(a.completed_at));
        let mut latest = recent.into_iter().take(3).map(|a| a.category);
        let first = latest.next()?;
        let rest: Vec<ActivityCategory> = latest.collect();
        (rest.len() == 2 && rest.iter().all(|c| *c == first)).then_some(first)
    }
}

/// Render an elapsed span as `2h 13m` or `45m`.
pub fn format_elapsed(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Render an activity length as `2-minute` or `45-second`.
pub fn format_length(seconds: u64) -> String {
    if seconds >= 60 && seconds % 60 == 0 {
        format!("{}-minute", seconds / 60)
    } else if seconds >= 60 {
        format!("{:.1}-minute", seconds as f64 / 60.0)
    } else {
        format!("{seconds}-second")
    }
}
