//! Integration tests for the suggestion engine's observable behavior.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use touchgrass_core::engine::{ActivityCandidate, CATALOG};
use touchgrass_core::{
    ActivityCategory, ActivityContext, CompletedActivity, MeetingDensity, SuggestionEngine,
    SuggestionRule, WeatherCondition, WeatherData,
};

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 14)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn weather(temperature_f: f64, condition: WeatherCondition) -> Option<WeatherData> {
    Some(WeatherData {
        temperature_f,
        condition,
        is_daylight: true,
    })
}

fn done(id: &str, completed_at: NaiveDateTime) -> CompletedActivity {
    let candidate = touchgrass_core::engine::find(id).unwrap();
    CompletedActivity {
        activity_id: id.to_string(),
        category: candidate.category,
        completed_at,
        duration_seconds: candidate.duration_seconds,
    }
}

#[test]
fn scenario_a_nice_morning_goes_outside() {
    let mut ctx = ActivityContext::new(at(10, 0));
    ctx.available_seconds = Some(600);
    ctx.weather = weather(72.0, WeatherCondition::Sunny);
    ctx.meeting_density = MeetingDensity::Normal;

    let suggestion = SuggestionEngine::new().suggest(&ctx);
    assert_eq!(suggestion.activity_id, "touch-grass");
    assert_eq!(suggestion.rule, SuggestionRule::WeatherOpportunity);
    assert!(!suggestion.is_indoor);
}

#[test]
fn scenario_b_long_sit_gets_moving() {
    let mut ctx = ActivityContext::new(at(14, 0));
    ctx.seconds_since_last_break = 8000;

    let suggestion = SuggestionEngine::new().suggest(&ctx);
    assert!(matches!(
        suggestion.category,
        ActivityCategory::Movement | ActivityCategory::Stretch
    ));
}

#[test]
fn scenario_c_tiny_gap_respected() {
    let mut ctx = ActivityContext::new(at(10, 0));
    ctx.available_seconds = Some(90);

    let suggestion = SuggestionEngine::new().suggest(&ctx);
    assert!(suggestion.duration_seconds <= 90);
}

#[test]
fn scenario_d_last_chance_for_daylight() {
    let mut ctx = ActivityContext::new(at(16, 30));
    ctx.weather = weather(65.0, WeatherCondition::Sunny);
    ctx.todays_activities = vec![done("neck-rolls", at(11, 0)), done("deep-breathing", at(14, 0))];
    ctx.seconds_since_last_break = 9000;

    let suggestion = SuggestionEngine::new().suggest(&ctx);
    assert_eq!(suggestion.activity_id, "touch-grass");
    assert_eq!(suggestion.rule, SuggestionRule::LastChance);
    assert!(suggestion.reason.to_lowercase().contains("last chance"));
}

#[test]
fn weather_opportunity_mentions_conditions() {
    let mut ctx = ActivityContext::new(at(10, 0));
    ctx.weather = weather(72.0, WeatherCondition::Sunny);

    let suggestion = SuggestionEngine::new().suggest(&ctx);
    assert_eq!(suggestion.activity_id, "touch-grass");
    assert!(suggestion.reason.contains("72"));
    assert!(suggestion.reason.contains("sunny"));
}

#[test]
fn outdoor_done_today_skips_weather_rules() {
    let mut ctx = ActivityContext::new(at(10, 0));
    ctx.weather = weather(72.0, WeatherCondition::Sunny);
    ctx.todays_activities = vec![done("touch-grass", at(8, 0))];

    let suggestion = SuggestionEngine::new().suggest(&ctx);
    assert_ne!(suggestion.rule, SuggestionRule::WeatherOpportunity);
    assert_ne!(suggestion.rule, SuggestionRule::LastChance);
}

#[test]
fn rain_keeps_everything_indoors() {
    let mut ctx = ActivityContext::new(at(10, 0));
    ctx.weather = weather(45.0, WeatherCondition::Rainy);

    let suggestion = SuggestionEngine::new().suggest(&ctx);
    assert!(suggestion.is_indoor);
    assert_ne!(suggestion.activity_id, "touch-grass");
}

#[test]
fn longer_neglected_activity_wins() {
    let catalog = vec![
        ActivityCandidate::new("stretch-a", "Stretch A", ActivityCategory::Stretch, 60, 30.0),
        ActivityCandidate::new("stretch-b", "Stretch B", ActivityCategory::Stretch, 60, 30.0),
    ];
    let engine = SuggestionEngine::with_catalog(catalog).unwrap();

    let now = at(12, 0);
    let mut ctx = ActivityContext::new(now);
    ctx.last_completed.insert("stretch-a".into(), now - Duration::days(1));
    ctx.last_completed.insert("stretch-b".into(), now - Duration::days(3));

    let suggestion = engine.suggest(&ctx);
    assert_eq!(suggestion.activity_id, "stretch-b");
    assert_eq!(suggestion.rule, SuggestionRule::Scored);
    assert!(suggestion.reason.contains("3 days"));
}

#[test]
fn just_finished_activity_is_not_repeated() {
    let engine = SuggestionEngine::new();
    for candidate in CATALOG {
        let now = at(12, 0);
        let mut ctx = ActivityContext::new(now);
        ctx.seconds_since_last_break = 1800;
        ctx.todays_activities = vec![done(candidate.id, now - Duration::minutes(30))];
        ctx.last_completed
            .insert(candidate.id.to_string(), now - Duration::minutes(30));

        let suggestion = engine.suggest(&ctx);
        assert_ne!(suggestion.activity_id, candidate.id);
    }
}

#[test]
fn repeat_allowed_when_it_is_the_only_option() {
    let catalog = vec![ActivityCandidate::new(
        "only",
        "Only Option",
        ActivityCategory::Breathing,
        60,
        10.0,
    )];
    let engine = SuggestionEngine::with_catalog(catalog).unwrap();
    let now = at(12, 0);
    let mut ctx = ActivityContext::new(now);
    ctx.todays_activities = vec![CompletedActivity {
        activity_id: "only".into(),
        category: ActivityCategory::Breathing,
        completed_at: now - Duration::minutes(5),
        duration_seconds: 60,
    }];
    assert_eq!(engine.suggest(&ctx).activity_id, "only");
}

#[test]
fn prolonged_sitting_reports_elapsed_time() {
    let mut ctx = ActivityContext::new(at(15, 0));
    ctx.seconds_since_last_break = 8000;
    ctx.todays_activities = vec![done("chin-tuck", at(9, 0))];

    let suggestion = SuggestionEngine::new().suggest(&ctx);
    assert_eq!(suggestion.rule, SuggestionRule::ProlongedSitting);
    assert!(suggestion.category.is_active());
    assert!(suggestion.reason.contains("2h 13m"));
    assert!(suggestion.reason.contains("move"));
}

#[test]
fn variety_breaks_a_category_streak() {
    let now = at(13, 0);
    let mut ctx = ActivityContext::new(now);
    ctx.seconds_since_last_break = 1200;
    ctx.todays_activities = vec![
        done("neck-rolls", at(10, 0)),
        done("shoulder-rolls", at(11, 0)),
        done("upper-trap-stretch", at(12, 40)),
    ];
    for a in &ctx.todays_activities {
        ctx.last_completed.insert(a.activity_id.clone(), a.completed_at);
    }

    let suggestion = SuggestionEngine::new().suggest(&ctx);
    assert_eq!(suggestion.rule, SuggestionRule::Scored);
    assert_ne!(suggestion.category, ActivityCategory::Stretch);
    assert!(suggestion.reason.starts_with("Balance your day"));
}

#[test]
fn nothing_fits_returns_shortest() {
    let mut ctx = ActivityContext::new(at(10, 0));
    ctx.available_seconds = Some(10);

    let suggestion = SuggestionEngine::new().suggest(&ctx);
    assert_eq!(suggestion.rule, SuggestionRule::NothingFits);
    assert_eq!(suggestion.activity_id, "chin-tuck");
}

#[test]
fn empty_custom_catalog_is_rejected() {
    assert!(SuggestionEngine::with_catalog(Vec::new()).is_err());
}

#[test]
fn activity_finished_before_midnight_is_not_repeated() {
    let now = at(0, 20);
    let mut ctx = ActivityContext::new(now);
    ctx.meeting_density = MeetingDensity::Heavy;
    ctx.available_seconds = Some(600);
    ctx.last_completed
        .insert("squat-hip-extensions".into(), now - Duration::minutes(30));

    let suggestion = SuggestionEngine::new().suggest(&ctx);
    assert_eq!(suggestion.rule, SuggestionRule::BusyDay);
    assert_ne!(suggestion.activity_id, "squat-hip-extensions");
}
