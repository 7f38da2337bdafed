//! Collaborators the suggestion engine's host depends on.
//!
//! The engine never fetches anything itself. A [`SuggestionHost`] owns the
//! weather, calendar, history and hydration collaborators (injected at
//! construction), snapshots them into an [`ActivityContext`] and calls the
//! engine. Static implementations here back the CLI flags and tests.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::{
    ActivityContext, CompletedActivity, MeetingDensity, Suggestion, SuggestionEngine, WeatherData,
};
use crate::error::Result;
use crate::storage::streak::consecutive_days;

/// Source of current weather.
pub trait WeatherProvider {
    /// Current conditions, `None` when unknown.
    fn current_weather(&self) -> Option<WeatherData>;
}

/// Source of calendar load.
pub trait CalendarProvider {
    /// Seconds from `now` until the next meeting starts, `None` if none today.
    fn seconds_until_next_meeting(&self, now: NaiveDateTime) -> Option<u64>;

    /// Number of meetings on `now`'s day.
    fn todays_meeting_count(&self, now: NaiveDateTime) -> u32;

    fn is_in_meeting(&self, now: NaiveDateTime) -> bool;
}

/// Completed-activity history.
pub trait ActivityHistory {
    /// Completions on `now`'s calendar day, oldest first.
    fn activities_today(&self, now: NaiveDateTime) -> Result<Vec<CompletedActivity>>;

    /// Most recent completion of `activity_id` on any day.
    fn last_completed(&self, activity_id: &str) -> Result<Option<NaiveDateTime>>;

    /// Consecutive days with at least one completion, ending today or yesterday.
    fn current_streak(&self, today: NaiveDate) -> Result<u32>;
}

/// Water intake tracking.
pub trait HydrationTracker {
    /// Amount logged on `now`'s calendar day.
    fn current_intake(&self, now: NaiveDateTime) -> Result<u32>;

    /// Daily goal, 0 when tracking is off.
    fn daily_goal(&self) -> u32;
}

impl<T: ActivityHistory + ?Sized> ActivityHistory for &T {
    fn activities_today(&self, now: NaiveDateTime) -> Result<Vec<CompletedActivity>> {
        (**self).activities_today(now)
    }

    fn last_completed(&self, activity_id: &str) -> Result<Option<NaiveDateTime>> {
        (**self).last_completed(activity_id)
    }

    fn current_streak(&self, today: NaiveDate) -> Result<u32> {
        (**self).current_streak(today)
    }
}

impl<T: HydrationTracker + ?Sized> HydrationTracker for &T {
    fn current_intake(&self, now: NaiveDateTime) -> Result<u32> {
        (**self).current_intake(now)
    }

    fn daily_goal(&self) -> u32 {
        (**self).daily_goal()
    }
}

/// Fixed weather answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticWeather(pub Option<WeatherData>);

impl WeatherProvider for StaticWeather {
    fn current_weather(&self) -> Option<WeatherData> {
        self.0
    }
}

/// A calendar event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Meeting {
    pub fn new(title: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            title: title.into(),
            start,
            end,
        }
    }
}

/// Calendar backed by a fixed list of meetings.
#[derive(Debug, Clone, Default)]
pub struct MeetingCalendar {
    meetings: Vec<Meeting>,
}

impl MeetingCalendar {
    pub fn new(mut meetings: Vec<Meeting>) -> Self {
        meetings.sort_by_key(|m| m.start);
        Self { meetings }
    }

    pub fn meetings(&self) -> &[Meeting] {
        &self.meetings
    }
}

impl CalendarProvider for MeetingCalendar {
    fn seconds_until_next_meeting(&self, now: NaiveDateTime) -> Option<u64> {
        self.meetings
            .iter()
            .find(|m| m.start > now && m.start.date() == now.date())
            .map(|m| (m.start - now).num_seconds().max(0) as u64)
    }

    fn todays_meeting_count(&self, now: NaiveDateTime) -> u32 {
        self.meetings
            .iter()
            .filter(|m| m.start.date() == now.date())
            .count() as u32
    }

    fn is_in_meeting(&self, now: NaiveDateTime) -> bool {
        self.meetings.iter().any(|m| m.start <= now && now < m.end)
    }
}

/// Calendar with only a known gap and meeting count, as supplied on the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCalendar {
    pub seconds_until_next: Option<u64>,
    pub meeting_count: u32,
    pub in_meeting: bool,
}

impl CalendarProvider for StaticCalendar {
    fn seconds_until_next_meeting(&self, _now: NaiveDateTime) -> Option<u64> {
        self.seconds_until_next
    }

    fn todays_meeting_count(&self, _now: NaiveDateTime) -> u32 {
        self.meeting_count
    }

    fn is_in_meeting(&self, _now: NaiveDateTime) -> bool {
        self.in_meeting
    }
}

/// In-memory history.
#[derive(Debug, Clone, Default)]
pub struct StaticHistory {
    pub activities: Vec<CompletedActivity>,
}

impl ActivityHistory for StaticHistory {
    fn activities_today(&self, now: NaiveDateTime) -> Result<Vec<CompletedActivity>> {
        let mut today: Vec<CompletedActivity> = self
            .activities
            .iter()
            .filter(|a| a.completed_at.date() == now.date() && a.completed_at <= now)
            .cloned()
            .collect();
        today.sort_by_key(|a| a.completed_at);
        Ok(today)
    }

    fn last_completed(&self, activity_id: &str) -> Result<Option<NaiveDateTime>> {
        Ok(self
            .activities
            .iter()
            .filter(|a| a.activity_id == activity_id)
            .map(|a| a.completed_at)
            .max())
    }

    fn current_streak(&self, today: NaiveDate) -> Result<u32> {
        Ok(consecutive_days(
            self.activities.iter().map(|a| a.completed_at.date()),
            today,
        ))
    }
}

/// Fixed hydration answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticHydration {
    pub intake: u32,
    pub goal: u32,
}

impl HydrationTracker for StaticHydration {
    fn current_intake(&self, _now: NaiveDateTime) -> Result<u32> {
        Ok(self.intake)
    }

    fn daily_goal(&self) -> u32 {
        self.goal
    }
}

/// Builds context snapshots from collaborators and asks the engine.
pub struct SuggestionHost<'a> {
    engine: SuggestionEngine,
    weather: Box<dyn WeatherProvider + 'a>,
    calendar: Box<dyn CalendarProvider + 'a>,
    history: Box<dyn ActivityHistory + 'a>,
    hydration: Box<dyn HydrationTracker + 'a>,
    end_of_day: Option<NaiveTime>,
}

impl<'a> SuggestionHost<'a> {
    pub fn new(
        engine: SuggestionEngine,
        weather: Box<dyn WeatherProvider + 'a>,
        calendar: Box<dyn CalendarProvider + 'a>,
        history: Box<dyn ActivityHistory + 'a>,
        hydration: Box<dyn HydrationTracker + 'a>,
    ) -> Self {
        Self {
            engine,
            weather,
            calendar,
            history,
            hydration,
            end_of_day: None,
        }
    }

    /// Also cap the time budget at this wall-clock time.
    pub fn with_end_of_day(mut self, end_of_day: NaiveTime) -> Self {
        self.end_of_day = Some(end_of_day);
        self
    }

    pub fn engine(&self) -> &SuggestionEngine {
        &self.engine
    }

    /// Time budget: the nearer of the next meeting and the end of the day.
    fn available_seconds(&self, now: NaiveDateTime) -> Option<u64> {
        let until_meeting = self.calendar.seconds_until_next_meeting(now);
        let until_end = self.end_of_day.and_then(|end| {
            let end = now.date().and_time(end);
            (end > now).then(|| (end - now).num_seconds() as u64)
        });
        match (until_meeting, until_end) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Snapshot every collaborator at `now`.
    ///
    /// When `seconds_since_last_break` is `None` it is derived from the
    /// latest completion today (0 if there is none).
    ///
    /// # Errors
    /// Returns an error if the history or hydration store fails.
    pub fn snapshot(
        &self,
        now: NaiveDateTime,
        seconds_since_last_break: Option<u64>,
    ) -> Result<ActivityContext> {
        let todays_activities = self.history.activities_today(now)?;

        let mut last_completed = HashMap::new();
        for candidate in self.engine.catalog() {
            if let Some(at) = self.history.last_completed(candidate.id)? {
                last_completed.insert(candidate.id.to_string(), at);
            }
        }

        let seconds_since_last_break = seconds_since_last_break.unwrap_or_else(|| {
            todays_activities
                .iter()
                .map(|a| a.completed_at)
                .max()
                .map_or(0, |last| (now - last).num_seconds().max(0) as u64)
        });

        let weather = self.weather.current_weather();
        if let Some(w) = weather {
            if !w.temperature_f.is_finite() {
                warn!("weather provider returned a non-finite temperature");
            }
        }

        let context = ActivityContext {
            current_time: now,
            available_seconds: self.available_seconds(now),
            weather,
            seconds_since_last_break,
            todays_activities,
            last_completed,
            meeting_density: MeetingDensity::from_meeting_count(
                self.calendar.todays_meeting_count(now),
            ),
            current_water_intake: self.hydration.current_intake(now)?,
            daily_water_goal: self.hydration.daily_goal(),
            current_streak: self.history.current_streak(now.date())?,
        };
        Ok(context)
    }

    /// Suggestion for `now`, or `None` while a meeting is in progress.
    ///
    /// # Errors
    /// Returns an error if the history or hydration store fails.
    pub fn suggest_at(
        &self,
        now: NaiveDateTime,
        seconds_since_last_break: Option<u64>,
    ) -> Result<Option<Suggestion>> {
        if self.calendar.is_in_meeting(now) {
            debug!("in a meeting, holding suggestion");
            return Ok(None);
        }
        let context = self.snapshot(now, seconds_since_last_break)?;
        Ok(Some(self.engine.suggest(&context)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ActivityCategory, WeatherCondition};
    use chrono::Duration;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 14)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn host<'a>(
        calendar: impl CalendarProvider + 'a,
        history: StaticHistory,
        weather: Option<WeatherData>,
    ) -> SuggestionHost<'a> {
        SuggestionHost::new(
            SuggestionEngine::new(),
            Box::new(StaticWeather(weather)),
            Box::new(calendar),
            Box::new(history),
            Box::new(StaticHydration { intake: 1, goal: 8 }),
        )
    }

    #[test]
    fn meeting_calendar_counts_and_gaps() {
        let calendar = MeetingCalendar::new(vec![
            Meeting::new("standup", at(9, 0), at(9, 15)),
            Meeting::new("review", at(14, 0), at(15, 0)),
            Meeting::new("tomorrow", at(9, 0) + Duration::days(1), at(10, 0) + Duration::days(1)),
        ]);
        assert_eq!(calendar.todays_meeting_count(at(8, 0)), 2);
        assert_eq!(calendar.seconds_until_next_meeting(at(13, 50)), Some(600));
        assert_eq!(calendar.seconds_until_next_meeting(at(16, 0)), None);
        assert!(calendar.is_in_meeting(at(9, 5)));
        assert!(!calendar.is_in_meeting(at(9, 15)));
    }

    #[test]
    fn snapshot_collects_everything() {
        let history = StaticHistory {
            activities: vec![
                CompletedActivity {
                    activity_id: "chin-tuck".into(),
                    category: ActivityCategory::Posture,
                    completed_at: at(10, 0) - Duration::days(1),
                    duration_seconds: 30,
                },
                CompletedActivity {
                    activity_id: "neck-rolls".into(),
                    category: ActivityCategory::Stretch,
                    completed_at: at(10, 0),
                    duration_seconds: 60,
                },
            ],
        };
        let calendar = MeetingCalendar::new(vec![Meeting::new("sync", at(11, 0), at(11, 30))]);
        let host = host(calendar, history, None);
        let ctx = host.snapshot(at(10, 50), None).unwrap();

        assert_eq!(ctx.available_seconds, Some(600));
        assert_eq!(ctx.todays_activities.len(), 1);
        assert_eq!(ctx.last_completed.len(), 2);
        assert_eq!(ctx.seconds_since_last_break, 50 * 60);
        assert_eq!(ctx.meeting_density, MeetingDensity::Light);
        assert_eq!(ctx.current_water_intake, 1);
        assert_eq!(ctx.daily_water_goal, 8);
        assert_eq!(ctx.current_streak, 2);
    }

    #[test]
    fn end_of_day_caps_budget() {
        let host = host(StaticCalendar::default(), StaticHistory::default(), None)
            .with_end_of_day(NaiveTime::from_hms_opt(17, 0, 0).unwrap());
        let ctx = host.snapshot(at(16, 58), Some(0)).unwrap();
        assert_eq!(ctx.available_seconds, Some(120));

        let late = host.snapshot(at(18, 0), Some(0)).unwrap();
        assert_eq!(late.available_seconds, None);
    }

    #[test]
    fn no_suggestion_during_meeting() {
        let calendar = StaticCalendar {
            in_meeting: true,
            ..StaticCalendar::default()
        };
        let host = host(calendar, StaticHistory::default(), None);
        assert!(host.suggest_at(at(10, 0), None).unwrap().is_none());
    }

    #[test]
    fn host_suggests_outdoors_on_a_nice_day() {
        let weather = Some(WeatherData {
            temperature_f: 70.0,
            condition: WeatherCondition::PartlyCloudy,
            is_daylight: true,
        });
        let host = host(StaticCalendar::default(), StaticHistory::default(), weather);
        let suggestion = host.suggest_at(at(11, 0), Some(0)).unwrap().unwrap();
        assert_eq!(suggestion.activity_id, "touch-grass");
        assert!(!suggestion.is_indoor);
        assert!(suggestion.hydration_tip.is_some());
    }
}
