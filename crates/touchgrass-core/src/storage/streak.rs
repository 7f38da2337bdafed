//! Consecutive-day streaks.
//!
//! A streak counts back from today. If nothing is logged yet today the
//! streak is still alive as long as yesterday counted, so a morning check
//! does not report zero.

use std::collections::BTreeSet;

use chrono::NaiveDate;

/// Length of the run of consecutive `days` ending today or yesterday.
pub fn consecutive_days<I>(days: I, today: NaiveDate) -> u32
where
    I: IntoIterator<Item = NaiveDate>,
{
    let days: BTreeSet<NaiveDate> = days.into_iter().filter(|d| *d <= today).collect();

    let mut cursor = if days.contains(&today) {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) if days.contains(&yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        match cursor.pred_opt() {
            Some(prev) => cursor = prev,
            None => break,
        }
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    #[test]
    fn empty_history_has_no_streak() {
        assert_eq!(consecutive_days(Vec::new(), d(14)), 0);
    }

    #[test]
    fn counts_back_from_today() {
        assert_eq!(consecutive_days([d(12), d(13), d(14)], d(14)), 3);
    }

    #[test]
    fn yesterday_keeps_streak_alive() {
        assert_eq!(consecutive_days([d(12), d(13)], d(14)), 2);
    }

    #[test]
    fn gap_breaks_streak() {
        assert_eq!(consecutive_days([d(10), d(11), d(13), d(14)], d(14)), 2);
        assert_eq!(consecutive_days([d(10), d(11)], d(14)), 0);
    }

    #[test]
    fn future_days_are_ignored() {
        assert_eq!(consecutive_days([d(14), d(15), d(16)], d(14)), 1);
    }

    #[test]
    fn duplicates_count_once() {
        assert_eq!(consecutive_days([d(14), d(14), d(13)], d(14)), 2);
    }
}
