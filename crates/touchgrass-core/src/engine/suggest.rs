//! The suggestion engine.
//!
//! `SuggestionEngine::suggest` is pure and total: for any context it returns
//! exactly one suggestion and touches no store.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::catalog::{shortest, ActivityCandidate, CATALOG};
use super::context::{format_length, ActivityCategory, ActivityContext, TimeOfDay};
use super::rules::{self, SuggestionRule};
use super::scoring::{max_possible_score, rank, score_candidate, ScoreBreakdown};
use crate::error::{Result, ValidationError};

/// Hydration pace is measured linearly across this window.
const HYDRATION_DAY_START_HOUR: u32 = 8;
const HYDRATION_DAY_HOURS: f64 = 12.0;

/// What to do next and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub activity_id: String,
    pub name: String,
    pub category: ActivityCategory,
    pub duration_seconds: u64,
    pub is_indoor: bool,
    pub reason: String,
    /// 0.0 .. 1.0
    pub urgency: f64,
    pub rule: SuggestionRule,
    pub hydration_tip: Option<String>,
}

impl Suggestion {
    fn from_candidate(
        candidate: &ActivityCandidate,
        rule: SuggestionRule,
        reason: String,
        urgency: f64,
        context: &ActivityContext,
    ) -> Self {
        Self {
            activity_id: candidate.id.to_string(),
            name: candidate.name.to_string(),
            category: candidate.category,
            duration_seconds: candidate.duration_seconds,
            is_indoor: !candidate.requires_outdoor,
            reason,
            urgency: urgency.clamp(0.0, 1.0),
            rule,
            hydration_tip: hydration_tip(context),
        }
    }
}

/// Scores a fixed catalog against a context.
#[derive(Debug, Clone)]
pub struct SuggestionEngine {
    catalog: Vec<ActivityCandidate>,
    shortest: ActivityCandidate,
    max_score: f64,
}

impl SuggestionEngine {
    /// Engine over the built-in catalog.
    pub fn new() -> Self {
        Self {
            catalog: CATALOG.to_vec(),
            shortest: *shortest(CATALOG).unwrap_or(&CATALOG[0]),
            max_score: max_possible_score(CATALOG),
        }
    }

    /// Engine over a custom catalog.
    ///
    /// # Errors
    /// Returns a validation error when `catalog` is empty.
    pub fn with_catalog(catalog: Vec<ActivityCandidate>) -> Result<Self> {
        let shortest = *shortest(&catalog)
            .ok_or_else(|| ValidationError::EmptyCollection("activity catalog".into()))?;
        let max_score = max_possible_score(&catalog);
        Ok(Self {
            catalog,
            shortest,
            max_score,
        })
    }

    pub fn catalog(&self) -> &[ActivityCandidate] {
        &self.catalog
    }

    /// Pick the single best activity for `context`.
    pub fn suggest(&self, context: &ActivityContext) -> Suggestion {
        let outdoor_allowed = context.outdoor_allowed();
        if context.weather.is_some() && !outdoor_allowed {
            debug!("weather unsuitable, considering indoor activities only");
        }

        let gated: Vec<&ActivityCandidate> = self
            .catalog
            .iter()
            .filter(|c| outdoor_allowed || !c.requires_outdoor)
            .collect();
        let pool: Vec<&ActivityCandidate> = gated
            .iter()
            .copied()
            .filter(|c| context.fits(c.duration_seconds))
            .collect();

        if pool.is_empty() {
            let candidate = shortest(gated.iter().copied()).unwrap_or(&self.shortest);
            debug!(
                activity = candidate.id,
                available = ?context.available_seconds,
                "nothing fits the time budget"
            );
            let reason = match context.available_seconds {
                Some(secs) => format!(
                    "Only {secs} seconds free, but even {} helps.",
                    candidate.name
                ),
                None => format!("{} is the quickest reset available.", candidate.name),
            };
            return Suggestion::from_candidate(
                candidate,
                SuggestionRule::NothingFits,
                reason,
                0.3,
                context,
            );
        }

        if let Some(hit) = rules::evaluate(context, &pool) {
            debug!(rule = hit.rule.name(), activity = hit.candidate.id, "priority rule fired");
            return Suggestion::from_candidate(hit.candidate, hit.rule, hit.reason, hit.urgency, context);
        }

        let streak = context.streaking_category();
        let scored: Vec<(&ActivityCandidate, ScoreBreakdown)> = pool
            .iter()
            .map(|c| (*c, score_candidate(c, context, streak)))
            .collect();
        let Some((winner, breakdown)) = scored
            .iter()
            .min_by(|a, b| rank((a.0, a.1.total()), (b.0, b.1.total())))
            .copied()
        else {
            return Suggestion::from_candidate(
                &self.shortest,
                SuggestionRule::NothingFits,
                format!("{} is the quickest reset available.", self.shortest.name),
                0.3,
                context,
            );
        };

        debug!(
            activity = winner.id,
            score = breakdown.total(),
            candidates = scored.len(),
            "scored suggestion"
        );
        let reason = scored_reason(winner, &breakdown, context, streak);
        let urgency = if self.max_score > 0.0 {
            breakdown.total() / self.max_score
        } else {
            0.0
        };
        Suggestion::from_candidate(winner, SuggestionRule::Scored, reason, urgency, context)
    }
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Term that decided a scored pick, in phrasing priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dominant {
    Recency,
    Weather,
    TimeOfDay,
}

fn dominant_term(breakdown: &ScoreBreakdown) -> Option<Dominant> {
    let terms = [
        (Dominant::Recency, breakdown.recency),
        (Dominant::Weather, breakdown.weather),
        (Dominant::TimeOfDay, breakdown.time_of_day),
    ];
    let mut best: Option<(Dominant, f64)> = None;
    for (term, value) in terms {
        if value <= 0.0 {
            continue;
        }
        // Strictly greater keeps the earlier term on ties.
        if best.map_or(true, |(_, b)| value > b) {
            best = Some((term, value));
        }
    }
    best.map(|(term, _)| term)
}

fn scored_reason(
    candidate: &ActivityCandidate,
    breakdown: &ScoreBreakdown,
    context: &ActivityContext,
    streak: Option<ActivityCategory>,
) -> String {
    if breakdown.variety > 0.0 {
        if let Some(category) = streak {
            return format!(
                "Balance your day: after a run of {category} activities, switch to {} ({}).",
                candidate.name, candidate.category,
            );
        }
    }

    match dominant_term(breakdown) {
        Some(Dominant::Recency) => match context.last_done(candidate.id) {
            None => format!(
                "You haven't tried {} yet. It takes just {}.",
                candidate.name,
                format_length(candidate.duration_seconds),
            ),
            Some(last) if (context.current_time - last).num_hours() < 24 => {
                match (context.current_time - last).num_hours().max(1) {
                    1 => format!("Your last {} was about an hour ago.", candidate.name),
                    hours => format!("Your last {} was {hours} hours ago.", candidate.name),
                }
            }
            Some(_) => match context.days_since_last_done(candidate.id).unwrap_or(1) {
                0 | 1 => format!("It's been a day since your last {}.", candidate.name),
                days => format!("It's been {days} days since your last {}.", candidate.name),
            },
        },
        Some(Dominant::Weather) => match context.weather {
            Some(weather) => format!(
                "{} and {}: nice weather for {}.",
                weather.temperature_label(),
                weather.condition,
                candidate.name,
            ),
            None => format!("Good conditions for {}.", candidate.name),
        },
        Some(Dominant::TimeOfDay) => match context.time_of_day() {
            TimeOfDay::Morning => {
                format!("Morning movement gets the blood flowing: try {}.", candidate.name)
            }
            TimeOfDay::EarlyAfternoon => {
                format!("Beat the afternoon slump with {}.", candidate.name)
            }
            TimeOfDay::Evening => format!("Wind down for the evening with {}.", candidate.name),
            _ => format!("{} suits this time of day.", candidate.name),
        },
        None => format!(
            "A quick {} {} keeps you fresh.",
            format_length(candidate.duration_seconds),
            candidate.name,
        ),
    }
}

/// Nudge when water intake lags a linear pace from 08:00 to 20:00.
pub fn hydration_tip(context: &ActivityContext) -> Option<String> {
    let goal = context.daily_water_goal;
    if goal == 0 || context.current_water_intake >= goal {
        return None;
    }
    let start = NaiveTime::from_hms_opt(HYDRATION_DAY_START_HOUR, 0, 0)?;
    let now = context.current_time.time();
    let elapsed_hours = if now <= start {
        0.0
    } else {
        (now - start).num_minutes() as f64 / 60.0
    };
    let pace = (elapsed_hours / HYDRATION_DAY_HOURS).clamp(0.0, 1.0);
    let expected = (goal as f64 * pace).floor() as u32;
    if context.current_water_intake < expected {
        Some(format!(
            "Grab some water too: {} of {} so far today.",
            context.current_water_intake, goal
        ))
    } else {
        None
    }
}
