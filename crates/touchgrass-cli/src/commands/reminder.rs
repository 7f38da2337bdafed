use clap::Subcommand;
use serde::Serialize;
use touchgrass_core::storage::Database;
use touchgrass_core::{Config, ReminderScheduler, ReminderState};

use super::{print_json, resolve_now};

const SCHEDULER_KEY: &str = "reminder_scheduler";

#[derive(Subcommand)]
pub enum ReminderAction {
    /// Print the reminder state as JSON
    Status,
    /// Arm the reminder one interval from now
    Start,
    /// Freeze the pending reminder
    Pause,
    /// Continue a paused reminder
    Resume,
    /// Push the reminder back by the snooze length
    Snooze,
    /// Discard the pending reminder
    Cancel,
    /// Fire the reminder if it is due
    Tick,
}

#[derive(Serialize)]
struct Status {
    state: ReminderState,
    next_due: Option<chrono::NaiveDateTime>,
    remaining_secs: Option<u64>,
    interval_secs: u64,
}

fn load_scheduler(
    db: &Database,
    config: &Config,
) -> Result<ReminderScheduler, Box<dyn std::error::Error>> {
    if let Some(json) = db.kv_get(SCHEDULER_KEY)? {
        match serde_json::from_str::<ReminderScheduler>(&json) {
            Ok(mut scheduler) => {
                scheduler.apply_config(&config.reminders);
                return Ok(scheduler);
            }
            Err(e) => tracing::warn!("discarding unreadable reminder state: {e}"),
        }
    }
    Ok(ReminderScheduler::new(&config.reminders))
}

fn save_scheduler(
    db: &Database,
    scheduler: &ReminderScheduler,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(scheduler)?;
    db.kv_set(SCHEDULER_KEY, &json)?;
    Ok(())
}

pub fn run(action: ReminderAction, at: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let mut scheduler = load_scheduler(&db, &config)?;
    let now = resolve_now(at)?;

    let event = match action {
        ReminderAction::Status => None,
        ReminderAction::Start => {
            let event = scheduler.arm(now);
            if event.is_none() {
                return Err("reminders are disabled (config set reminders.enabled true)".into());
            }
            event
        }
        ReminderAction::Pause => scheduler.pause(now),
        ReminderAction::Resume => scheduler.resume(now),
        ReminderAction::Snooze => scheduler.snooze(now),
        ReminderAction::Cancel => scheduler.cancel(now),
        ReminderAction::Tick => scheduler.tick(now),
    };

    match event {
        Some(event) => print_json(&event)?,
        None => print_json(&Status {
            state: scheduler.state(),
            next_due: scheduler.next_due(),
            remaining_secs: scheduler.remaining_secs(now),
            interval_secs: scheduler.interval_secs(),
        })?,
    }

    save_scheduler(&db, &scheduler)?;
    Ok(())
}
