//! The fixed catalog of activities the engine can suggest.

use serde::Serialize;

use super::context::ActivityCategory;

/// A statically defined activity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActivityCandidate {
    pub id: &'static str,
    pub name: &'static str,
    pub category: ActivityCategory,
    pub duration_seconds: u64,
    pub requires_outdoor: bool,
    pub base_weight: f64,
}

impl ActivityCandidate {
    pub const fn new(
        id: &'static str,
        name: &'static str,
        category: ActivityCategory,
        duration_seconds: u64,
        base_weight: f64,
    ) -> Self {
        Self {
            id,
            name,
            category,
            duration_seconds,
            requires_outdoor: matches!(category, ActivityCategory::Outdoor),
            base_weight,
        }
    }
}

use ActivityCategory::*;

/// Built-in activities. Order carries no meaning; ties are broken by id.
pub static CATALOG: &[ActivityCandidate] = &[
    ActivityCandidate::new("touch-grass", "Touch Grass", Outdoor, 300, 50.0),
    ActivityCandidate::new("quick-walk", "Quick Walk", Movement, 300, 45.0),
    ActivityCandidate::new("squat-hip-extensions", "Squat Hip Extensions", Movement, 120, 42.0),
    ActivityCandidate::new("ankle-pumps", "Ankle Pumps", Movement, 60, 30.0),
    ActivityCandidate::new("standing-hip-flexor", "Standing Hip Flexor Stretch", Stretch, 120, 40.0),
    ActivityCandidate::new("doorway-stretch", "Doorway Chest Stretch", Stretch, 90, 38.0),
    ActivityCandidate::new("shoulder-rolls", "Shoulder Rolls", Stretch, 60, 35.0),
    ActivityCandidate::new("upper-trap-stretch", "Upper Trap Stretch", Stretch, 60, 34.0),
    ActivityCandidate::new("neck-rolls", "Gentle Neck Rolls", Stretch, 60, 32.0),
    ActivityCandidate::new("thoracic-extension", "Thoracic Extension", Posture, 60, 36.0),
    ActivityCandidate::new("scapular-retraction", "Shoulder Blade Squeeze", Posture, 45, 33.0),
    ActivityCandidate::new("chin-tuck", "Chin Tuck", Posture, 30, 30.0),
    ActivityCandidate::new("deep-breathing", "Deep Breathing", Breathing, 120, 40.0),
    ActivityCandidate::new("eye-palming", "Eye Palming", Meditation, 60, 32.0),
    ActivityCandidate::new("guided-meditation", "Guided Meditation", Meditation, 300, 38.0),
];

/// Look up a built-in activity by id.
pub fn find(id: &str) -> Option<&'static ActivityCandidate> {
    CATALOG.iter().find(|c| c.id == id)
}

/// Shortest candidate, ties broken by id.
pub fn shortest<'a, I>(candidates: I) -> Option<&'a ActivityCandidate>
where
    I: IntoIterator<Item = &'a ActivityCandidate>,
{
    candidates
        .into_iter()
        .min_by(|a, b| a.duration_seconds.cmp(&b.duration_seconds).then_with(|| a.id.cmp(b.id)))
}

/// Highest base weight, ties broken by shorter duration then id.
pub fn heaviest<'a, I>(candidates: I) -> Option<&'a ActivityCandidate>
where
    I: IntoIterator<Item = &'a ActivityCandidate>,
{
    candidates.into_iter().min_by(|a, b| {
        b.base_weight
            .total_cmp(&a.base_weight)
            .then_with(|| a.duration_seconds.cmp(&b.duration_seconds))
            .then_with(|| a.id.cmp(b.id))
    })
}
