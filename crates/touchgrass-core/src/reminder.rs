//! Break reminder scheduler.
//!
//! A wall-clock state machine with no internal thread. The caller passes the
//! current time to every operation and calls `tick()` periodically; the CLI
//! persists the scheduler as JSON between invocations.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Armed -> (Paused | Snoozed) -> Armed
//!           \-> tick past deadline: ReminderDue, re-armed
//! any -> cancel -> Idle
//! ```

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::events::Event;
use crate::storage::ReminderConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderState {
    Idle,
    Armed,
    Paused,
    Snoozed,
}

impl ReminderState {
    pub fn name(&self) -> &'static str {
        match self {
            ReminderState::Idle => "idle",
            ReminderState::Armed => "armed",
            ReminderState::Paused => "paused",
            ReminderState::Snoozed => "snoozed",
        }
    }
}

/// Single-shot break reminder that re-arms after it fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderScheduler {
    state: ReminderState,
    enabled: bool,
    interval_secs: u64,
    snooze_secs: u64,
    /// `(start, end)` hours; deadlines outside are deferred to the next start.
    #[serde(default)]
    working_hours: Option<(u32, u32)>,
    /// Pending deadline while armed or snoozed.
    #[serde(default)]
    due_at: Option<NaiveDateTime>,
    /// Time left on the shot while paused.
    #[serde(default)]
    remaining_secs: Option<u64>,
}

impl ReminderScheduler {
    pub fn new(config: &ReminderConfig) -> Self {
        let mut scheduler = Self {
            state: ReminderState::Idle,
            enabled: true,
            interval_secs: 0,
            snooze_secs: 0,
            working_hours: None,
            due_at: None,
            remaining_secs: None,
        };
        scheduler.apply_config(config);
        scheduler
    }

    /// Take new interval, snooze and working-hours settings.
    ///
    /// A pending deadline is kept; new values apply from the next arm.
    pub fn apply_config(&mut self, config: &ReminderConfig) {
        self.enabled = config.enabled;
        self.interval_secs = u64::from(config.interval_minutes.max(1)) * 60;
        self.snooze_secs = u64::from(config.snooze_minutes.max(1)) * 60;
        self.working_hours = config.working_hours();
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> ReminderState {
        self.state
    }

    pub fn next_due(&self) -> Option<NaiveDateTime> {
        self.due_at
    }

    pub fn remaining_secs(&self, now: NaiveDateTime) -> Option<u64> {
        match self.state {
            ReminderState::Paused => self.remaining_secs,
            _ => self
                .due_at
                .map(|due| (due - now).num_seconds().max(0) as u64),
        }
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Schedule the next reminder one interval from `now`.
    ///
    /// Returns `None` when reminders are disabled.
    pub fn arm(&mut self, now: NaiveDateTime) -> Option<Event> {
        if !self.enabled {
            debug!("reminders disabled, not arming");
            return None;
        }
        let due_at = self.schedule(now, self.interval_secs);
        self.state = ReminderState::Armed;
        self.due_at = Some(due_at);
        self.remaining_secs = None;
        Some(Event::ReminderArmed { due_at })
    }

    /// Fire if the deadline has passed, then re-arm.
    pub fn tick(&mut self, now: NaiveDateTime) -> Option<Event> {
        if !matches!(self.state, ReminderState::Armed | ReminderState::Snoozed) {
            return None;
        }
        let due = self.due_at?;
        if now < due {
            return None;
        }
        debug!(%due, "reminder due");
        if self.arm(now).is_none() {
            self.cancel(now);
        }
        Some(Event::ReminderDue { at: due })
    }

    /// Freeze the pending shot.
    pub fn pause(&mut self, now: NaiveDateTime) -> Option<Event> {
        if !matches!(self.state, ReminderState::Armed | ReminderState::Snoozed) {
            return None;
        }
        let remaining_secs = self.remaining_secs(now).unwrap_or(0);
        self.state = ReminderState::Paused;
        self.due_at = None;
        self.remaining_secs = Some(remaining_secs);
        Some(Event::ReminderPaused {
            remaining_secs,
            at: now,
        })
    }

    /// Continue a paused shot with the time it had left.
    pub fn resume(&mut self, now: NaiveDateTime) -> Option<Event> {
        if self.state != ReminderState::Paused {
            return None;
        }
        let remaining = self.remaining_secs.take().unwrap_or(self.interval_secs);
        let due_at = self.schedule(now, remaining);
        self.state = ReminderState::Armed;
        self.due_at = Some(due_at);
        Some(Event::ReminderResumed { due_at })
    }

    /// Push the reminder back by the snooze length.
    pub fn snooze(&mut self, now: NaiveDateTime) -> Option<Event> {
        if self.state == ReminderState::Idle {
            return None;
        }
        let until = self.schedule(now, self.snooze_secs);
        self.state = ReminderState::Snoozed;
        self.due_at = Some(until);
        self.remaining_secs = None;
        Some(Event::ReminderSnoozed { until })
    }

    /// Discard the pending shot.
    pub fn cancel(&mut self, now: NaiveDateTime) -> Option<Event> {
        if self.state == ReminderState::Idle {
            return None;
        }
        self.state = ReminderState::Idle;
        self.due_at = None;
        self.remaining_secs = None;
        Some(Event::ReminderCancelled { at: now })
    }

    fn schedule(&self, now: NaiveDateTime, secs: u64) -> NaiveDateTime {
        let target = now + Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX / 1000));
        self.defer_to_working_hours(target)
    }

    /// Move `at` into working hours: the start of today's if it is early, the
    /// start of tomorrow's if it is late.
    pub fn defer_to_working_hours(&self, at: NaiveDateTime) -> NaiveDateTime {
        let Some((start, end)) = self.working_hours else {
            return at;
        };
        let Some(start_time) = NaiveTime::from_hms_opt(start, 0, 0) else {
            return at;
        };
        let hour = at.hour();
        if hour < start {
            at.date().and_time(start_time)
        } else if hour >= end {
            match at.date().succ_opt() {
                Some(next) => next.and_time(start_time),
                None => at,
            }
        } else {
            at
        }
    }
}
