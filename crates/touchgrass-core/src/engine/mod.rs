//! Activity suggestion engine.
//!
//! Given a snapshot of the user's situation, pick the single best thing to do
//! next and explain why. The engine is a pure function of its input:
//!
//! 1. Weather gating drops outdoor activities when there is no weather or it
//!    is unsuitable.
//! 2. The time budget is a hard filter; if nothing fits, the shortest
//!    activity is returned anyway.
//! 3. Priority rules (weather opportunity, last chance, prolonged sitting,
//!    busy day, pre-meeting energizer, getting started) short-circuit.
//! 4. Otherwise every surviving candidate is scored and the best one wins.

mod catalog;
mod context;
mod rules;
mod scoring;
mod suggest;

pub use catalog::{find, heaviest, shortest, ActivityCandidate, CATALOG};
pub use context::{
    format_elapsed, format_length, ActivityCategory, ActivityContext, CompletedActivity,
    MeetingDensity, TimeOfDay, WeatherClass, WeatherCondition, WeatherData, REPEAT_WINDOW_SECS,
};
pub use rules::SuggestionRule;
pub use scoring::{
    max_possible_score, rank, recency_bonus, score_candidate, time_of_day_bonus, weather_bonus,
    ScoreBreakdown,
};
pub use suggest::{hydration_tip, Suggestion, SuggestionEngine};
