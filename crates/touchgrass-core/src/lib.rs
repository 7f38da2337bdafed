//! # Touch Grass Core Library
//!
//! Core logic for the Touch Grass wellness reminder: deciding which short
//! break activity to suggest right now, and keeping the history, water log,
//! configuration and reminder state that feed that decision. The CLI binary
//! is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Suggestion Engine**: A pure function from an [`ActivityContext`]
//!   snapshot to one [`Suggestion`] with a reason and urgency
//! - **Providers**: Traits for weather, calendar, history and hydration, and
//!   a [`SuggestionHost`] that snapshots them for the engine
//! - **Storage**: SQLite activity and water history, TOML configuration
//! - **Reminder**: A wall-clock scheduler the caller drives with `tick()`
//!
//! ## Key Components
//!
//! - [`SuggestionEngine`]: Picks the next activity
//! - [`Database`]: Activity and water persistence
//! - [`Config`]: Application configuration management
//! - [`ReminderScheduler`]: Break reminder state machine

pub mod engine;
pub mod error;
pub mod events;
pub mod providers;
pub mod reminder;
pub mod storage;

pub use engine::{
    ActivityCandidate, ActivityCategory, ActivityContext, CompletedActivity, MeetingDensity,
    Suggestion, SuggestionEngine, SuggestionRule, WeatherClass, WeatherCondition, WeatherData,
};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use providers::{
    ActivityHistory, CalendarProvider, HydrationTracker, SuggestionHost, WeatherProvider,
};
pub use reminder::{ReminderScheduler, ReminderState};
pub use storage::{Config, Database};
