//! Priority overrides that short-circuit scoring.
//!
//! Rules are tried in a fixed order and the first one that finds a
//! candidate wins. A rule whose filter leaves nothing simply does not fire.

use serde::{Deserialize, Serialize};

use super::catalog::{heaviest, ActivityCandidate};
use super::context::{
    format_elapsed, format_length, ActivityCategory, ActivityContext, MeetingDensity,
    WeatherClass,
};

pub const LAST_CHANCE_HOUR: u32 = 16;
pub const PROLONGED_SITTING_SECS: u64 = 2 * 60 * 60;
pub const BUSY_DAY_MAX_AVAILABLE_SECS: u64 = 15 * 60;
pub const BUSY_DAY_MAX_DURATION_SECS: u64 = 120;
pub const ENERGIZER_MIN_AVAILABLE_SECS: u64 = 180;
pub const ENERGIZER_MAX_AVAILABLE_SECS: u64 = 420;
pub const ENERGIZER_MIN_SINCE_BREAK_SECS: u64 = 90 * 60;
pub const GETTING_STARTED_MAX_DURATION_SECS: u64 = 120;

/// Which decision path produced a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionRule {
    WeatherOpportunity,
    LastChance,
    ProlongedSitting,
    BusyDay,
    PreMeetingEnergizer,
    GettingStarted,
    /// No rule fired; chosen by score.
    Scored,
    /// Nothing fits the time budget; the shortest activity was returned.
    NothingFits,
}

impl SuggestionRule {
    pub fn name(&self) -> &'static str {
        match self {
            SuggestionRule::WeatherOpportunity => "weather_opportunity",
            SuggestionRule::LastChance => "last_chance",
            SuggestionRule::ProlongedSitting => "prolonged_sitting",
            SuggestionRule::BusyDay => "busy_day",
            SuggestionRule::PreMeetingEnergizer => "pre_meeting_energizer",
            SuggestionRule::GettingStarted => "getting_started",
            SuggestionRule::Scored => "scored",
            SuggestionRule::NothingFits => "nothing_fits",
        }
    }
}

/// A fired rule with its pick and explanation.
#[derive(Debug, Clone)]
pub(crate) struct RuleHit<'a> {
    pub candidate: &'a ActivityCandidate,
    pub rule: SuggestionRule,
    pub reason: String,
    pub urgency: f64,
}

/// Run the overrides against `pool` (already weather-gated and time-filtered).
pub(crate) fn evaluate<'a>(
    context: &ActivityContext,
    pool: &[&'a ActivityCandidate],
) -> Option<RuleHit<'a>> {
    let eligible = without_recent_repeat(context, pool);

    weather_opportunity(context, &eligible)
        .or_else(|| last_chance(context, &eligible))
        .or_else(|| prolonged_sitting(context, &eligible))
        .or_else(|| busy_day(context, &eligible))
        .or_else(|| pre_meeting_energizer(context, &eligible))
        .or_else(|| getting_started(context, &eligible))
}

/// Drop the activity finished under an hour ago unless it is all we have.
fn without_recent_repeat<'a>(
    context: &ActivityContext,
    pool: &[&'a ActivityCandidate],
) -> Vec<&'a ActivityCandidate> {
    match context.recent_repeat() {
        Some(repeat) if pool.len() > 1 => pool.iter().copied().filter(|c| c.id != repeat).collect(),
        _ => pool.to_vec(),
    }
}

/// Outdoor pick when the weather is ideal and nobody has been out today.
fn outdoor_pick<'a>(
    context: &ActivityContext,
    eligible: &[&'a ActivityCandidate],
) -> Option<&'a ActivityCandidate> {
    if context.weather_class() != Some(WeatherClass::Ideal) || context.outdoor_done_today() {
        return None;
    }
    heaviest(eligible.iter().copied().filter(|c| c.requires_outdoor))
}

fn weather_opportunity<'a>(
    context: &ActivityContext,
    eligible: &[&'a ActivityCandidate],
) -> Option<RuleHit<'a>> {
    if context.hour() >= LAST_CHANCE_HOUR {
        return None;
    }
    let candidate = outdoor_pick(context, eligible)?;
    let weather = context.weather?;
    Some(RuleHit {
        candidate,
        rule: SuggestionRule::WeatherOpportunity,
        reason: format!(
            "It's {} and {} outside: perfect for a {} {} break.",
            weather.temperature_label(),
            weather.condition,
            format_length(candidate.duration_seconds),
            candidate.name,
        ),
        urgency: 0.85,
    })
}

fn last_chance<'a>(
    context: &ActivityContext,
    eligible: &[&'a ActivityCandidate],
) -> Option<RuleHit<'a>> {
    if context.hour() < LAST_CHANCE_HOUR {
        return None;
    }
    let candidate = outdoor_pick(context, eligible)?;
    let weather = context.weather?;
    Some(RuleHit {
        candidate,
        rule: SuggestionRule::LastChance,
        reason: format!(
            "This is your last chance for daylight today: it's {} and {}, so head out for {}.",
            weather.temperature_label(),
            weather.condition,
            candidate.name,
        ),
        urgency: 0.9,
    })
}

fn prolonged_sitting<'a>(
    context: &ActivityContext,
    eligible: &[&'a ActivityCandidate],
) -> Option<RuleHit<'a>> {
    let sitting = context.seconds_since_last_break;
    if sitting < PROLONGED_SITTING_SECS {
        return None;
    }
    let candidate = heaviest(eligible.iter().copied().filter(|c| c.category.is_active()))?;
    let extra_hours = (sitting - PROLONGED_SITTING_SECS) as f64 / 3600.0;
    Some(RuleHit {
        candidate,
        rule: SuggestionRule::ProlongedSitting,
        reason: format!(
            "You've been sitting for {}. Time to move: {} takes {}.",
            format_elapsed(sitting),
            candidate.name,
            format_length(candidate.duration_seconds),
        ),
        urgency: (0.75 + 0.1 * extra_hours).min(1.0),
    })
}

fn busy_day<'a>(
    context: &ActivityContext,
    eligible: &[&'a ActivityCandidate],
) -> Option<RuleHit<'a>> {
    if context.meeting_density != MeetingDensity::Heavy {
        return None;
    }
    let available = context.available_seconds?;
    if available > BUSY_DAY_MAX_AVAILABLE_SECS {
        return None;
    }
    let candidate = heaviest(
        eligible
            .iter()
            .copied()
            .filter(|c| c.duration_seconds <= BUSY_DAY_MAX_DURATION_SECS),
    )?;
    Some(RuleHit {
        candidate,
        rule: SuggestionRule::BusyDay,
        reason: format!(
            "Busy day with back-to-back meetings: a {} {} fits before the next one.",
            format_length(candidate.duration_seconds),
            candidate.name,
        ),
        urgency: 0.7,
    })
}

fn pre_meeting_energizer<'a>(
    context: &ActivityContext,
    eligible: &[&'a ActivityCandidate],
) -> Option<RuleHit<'a>> {
    let available = context.available_seconds?;
    if available <= ENERGIZER_MIN_AVAILABLE_SECS
        || available > ENERGIZER_MAX_AVAILABLE_SECS
        || context.seconds_since_last_break < ENERGIZER_MIN_SINCE_BREAK_SECS
    {
        return None;
    }
    let candidate = heaviest(eligible.iter().copied().filter(|c| {
        c.category == ActivityCategory::Movement && c.duration_seconds <= available / 2
    }))?;
    Some(RuleHit {
        candidate,
        rule: SuggestionRule::PreMeetingEnergizer,
        reason: format!(
            "{} minutes before your meeting: energize with {} ({}).",
            available / 60,
            candidate.name,
            format_length(candidate.duration_seconds),
        ),
        urgency: 0.75,
    })
}

fn getting_started<'a>(
    context: &ActivityContext,
    eligible: &[&'a ActivityCandidate],
) -> Option<RuleHit<'a>> {
    if !context.is_first_run() {
        return None;
    }
    let candidate = heaviest(eligible.iter().copied().filter(|c| {
        !c.requires_outdoor
            && matches!(c.category, ActivityCategory::Movement | ActivityCategory::Breathing)
            && c.duration_seconds <= GETTING_STARTED_MAX_DURATION_SECS
    }))?;
    Some(RuleHit {
        candidate,
        rule: SuggestionRule::GettingStarted,
        reason: format!(
            "An easy start: {} takes just {}.",
            candidate.name,
            format_length(candidate.duration_seconds),
        ),
        urgency: 0.4,
    })
}
