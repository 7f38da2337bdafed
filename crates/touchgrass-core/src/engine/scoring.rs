//! Additive scoring for the fallback path.
//!
//! ```text
//! score = base_weight
//!       + recency      (10 per day since last done, capped at 70; never done = 70)
//!       + variety      (flat 15 when breaking a three-in-a-row category run)
//!       + time_of_day  (±10 by bucket and category)
//!       + weather      (outdoor only: ideal +25, acceptable -10)
//!       - repeat       (1000 when it is the completion from under an hour ago)
//! ```

use std::cmp::Ordering;

use serde::Serialize;

use super::catalog::ActivityCandidate;
use super::context::{ActivityCategory, ActivityContext, TimeOfDay, WeatherClass};

pub const RECENCY_PER_DAY: f64 = 10.0;
pub const RECENCY_CAP: f64 = 70.0;
pub const VARIETY_BONUS: f64 = 15.0;
pub const TIME_OF_DAY_BONUS: f64 = 10.0;
pub const IDEAL_WEATHER_BONUS: f64 = 25.0;
pub const MARGINAL_WEATHER_PENALTY: f64 = 10.0;
pub const REPEAT_PENALTY: f64 = 1000.0;
pub const UNSUITABLE_WEATHER_PENALTY: f64 = 1000.0;

/// Recency bonus from whole days since last done.
pub fn recency_bonus(days_since_last_done: Option<i64>) -> f64 {
    match days_since_last_done {
        None => RECENCY_CAP,
        Some(days) => (days.max(0) as f64 * RECENCY_PER_DAY).min(RECENCY_CAP),
    }
}

/// Morning favours movement, early afternoon movement and outdoor,
/// evening breathing and meditation.
pub fn time_of_day_bonus(time_of_day: TimeOfDay, category: ActivityCategory) -> f64 {
    use ActivityCategory::*;
    let favoured = match time_of_day {
        TimeOfDay::Morning => matches!(category, Movement),
        TimeOfDay::EarlyAfternoon => matches!(category, Movement | Outdoor),
        TimeOfDay::Evening => matches!(category, Breathing | Meditation),
        TimeOfDay::Night | TimeOfDay::Midday | TimeOfDay::LateAfternoon => false,
    };
    if favoured {
        TIME_OF_DAY_BONUS
    } else {
        0.0
    }
}

pub fn weather_bonus(weather: Option<WeatherClass>, candidate: &ActivityCandidate) -> f64 {
    if !candidate.requires_outdoor {
        return 0.0;
    }
    match weather {
        Some(WeatherClass::Ideal) => IDEAL_WEATHER_BONUS,
        Some(WeatherClass::Acceptable) => -MARGINAL_WEATHER_PENALTY,
        // Gated out before scoring; kept total for direct callers.
        Some(WeatherClass::Poor) | None => -UNSUITABLE_WEATHER_PENALTY,
    }
}

/// Per-term contributions for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub base: f64,
    pub recency: f64,
    pub variety: f64,
    pub time_of_day: f64,
    pub weather: f64,
    pub repeat_penalty: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.base + self.recency + self.variety + self.time_of_day + self.weather
            - self.repeat_penalty
    }
}

/// Highest score any candidate of `catalog` could reach.
pub fn max_possible_score(catalog: &[ActivityCandidate]) -> f64 {
    let max_base = catalog
        .iter()
        .map(|c| c.base_weight)
        .fold(0.0_f64, f64::max);
    max_base + RECENCY_CAP + VARIETY_BONUS + TIME_OF_DAY_BONUS + IDEAL_WEATHER_BONUS
}

/// Score one candidate. `streak` is the category of a three-in-a-row run
/// that the variety bonus tries to break.
pub fn score_candidate(
    candidate: &ActivityCandidate,
    context: &ActivityContext,
    streak: Option<ActivityCategory>,
) -> ScoreBreakdown {
    let variety = match streak {
        Some(category) if category != candidate.category => VARIETY_BONUS,
        _ => 0.0,
    };
    let repeat_penalty = if context.recent_repeat() == Some(candidate.id) {
        REPEAT_PENALTY
    } else {
        0.0
    };

    ScoreBreakdown {
        base: candidate.base_weight,
        recency: recency_bonus(context.days_since_last_done(candidate.id)),
        variety,
        time_of_day: time_of_day_bonus(context.time_of_day(), candidate.category),
        weather: weather_bonus(context.weather_class(), candidate),
        repeat_penalty,
    }
}

/// Ordering where `Less` means the first entry wins: higher score, then
/// shorter duration, then smaller id.
pub fn rank(a: (&ActivityCandidate, f64), b: (&ActivityCandidate, f64)) -> Ordering {
    b.1.total_cmp(&a.1)
        .then_with(|| a.0.duration_seconds.cmp(&b.0.duration_seconds))
        .then_with(|| a.0.id.cmp(b.0.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::catalog::find;
    use chrono::NaiveDate;

    fn ctx_at(hour: u32) -> ActivityContext {
        ActivityContext::new(
            NaiveDate::from_ymd_opt(2024, 5, 14)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn recency_caps_at_seventy() {
        assert_eq!(recency_bonus(None), 70.0);
        assert_eq!(recency_bonus(Some(0)), 0.0);
        assert_eq!(recency_bonus(Some(1)), 10.0);
        assert_eq!(recency_bonus(Some(3)), 30.0);
        assert_eq!(recency_bonus(Some(30)), 70.0);
    }

    #[test]
    fn time_of_day_preferences() {
        use ActivityCategory::*;
        assert_eq!(time_of_day_bonus(TimeOfDay::Morning, Movement), 10.0);
        assert_eq!(time_of_day_bonus(TimeOfDay::Morning, Breathing), 0.0);
        assert_eq!(time_of_day_bonus(TimeOfDay::EarlyAfternoon, Outdoor), 10.0);
        assert_eq!(time_of_day_bonus(TimeOfDay::Evening, Meditation), 10.0);
        assert_eq!(time_of_day_bonus(TimeOfDay::Evening, Movement), 0.0);
    }

    #[test]
    fn weather_only_affects_outdoor() {
        let grass = find("touch-grass").unwrap();
        let tuck = find("chin-tuck").unwrap();
        assert_eq!(weather_bonus(Some(WeatherClass::Ideal), grass), 25.0);
        assert_eq!(weather_bonus(Some(WeatherClass::Acceptable), grass), -10.0);
        assert_eq!(weather_bonus(Some(WeatherClass::Ideal), tuck), 0.0);
    }

    #[test]
    fn variety_bonus_skips_streaking_category() {
        let ctx = ctx_at(12);
        let stretch = find("neck-rolls").unwrap();
        let posture = find("chin-tuck").unwrap();
        let streak = Some(ActivityCategory::Stretch);
        assert_eq!(score_candidate(stretch, &ctx, streak).variety, 0.0);
        assert_eq!(score_candidate(posture, &ctx, streak).variety, VARIETY_BONUS);
    }

    #[test]
    fn rank_prefers_score_then_duration_then_id() {
        let long = ActivityCandidate::new("aaa", "A", ActivityCategory::Stretch, 120, 0.0);
        let short = ActivityCandidate::new("zzz", "Z", ActivityCategory::Stretch, 60, 0.0);
        let twin = ActivityCandidate::new("mmm", "M", ActivityCategory::Stretch, 60, 0.0);
        assert_eq!(rank((&long, 50.0), (&short, 40.0)), Ordering::Less);
        assert_eq!(rank((&long, 50.0), (&short, 50.0)), Ordering::Greater);
        assert_eq!(rank((&twin, 50.0), (&short, 50.0)), Ordering::Less);
    }

    #[test]
    fn max_possible_uses_heaviest_base() {
        let max = max_possible_score(crate::engine::catalog::CATALOG);
        assert_eq!(max, 50.0 + 70.0 + 15.0 + 10.0 + 25.0);
    }
}
