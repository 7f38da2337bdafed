use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::engine::ActivityCategory;

/// Every state change in the system produces an Event.
/// The CLI prints them as JSON; a tray app would poll for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Reminder scheduled for `due_at`.
    ReminderArmed {
        due_at: NaiveDateTime,
    },
    /// Reminder fired.
    ReminderDue {
        at: NaiveDateTime,
    },
    ReminderSnoozed {
        until: NaiveDateTime,
    },
    ReminderPaused {
        remaining_secs: u64,
        at: NaiveDateTime,
    },
    ReminderResumed {
        due_at: NaiveDateTime,
    },
    ReminderCancelled {
        at: NaiveDateTime,
    },
    ActivityRecorded {
        activity_id: String,
        category: ActivityCategory,
        duration_seconds: u64,
        at: NaiveDateTime,
    },
    WaterLogged {
        amount: u32,
        total_today: u32,
        at: NaiveDateTime,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn serializes_with_type_tag() {
        let at = NaiveDate::from_ymd_opt(2024, 5, 14)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let event = Event::WaterLogged {
            amount: 1,
            total_today: 3,
            at,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "WaterLogged");
        assert_eq!(json["total_today"], 3);
        assert_eq!(json["at"], "2024-05-14T09:30:00");

        let back: Event = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
