use clap::Subcommand;
use touchgrass_core::engine::{self, format_length, CATALOG};
use touchgrass_core::{CompletedActivity, CoreError, Database};

use super::{print_json, resolve_now};

#[derive(Subcommand)]
pub enum ActivityAction {
    /// Record a completed activity
    Log {
        /// Activity id (see `activity catalog`)
        id: String,
        /// How long it took (defaults to the catalog length)
        #[arg(long)]
        duration_secs: Option<u64>,
        /// Completed today at HH:MM instead of now
        #[arg(long)]
        at: Option<String>,
    },
    /// List today's completed activities
    Today {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List every activity that can be suggested
    Catalog,
    /// Consecutive days with at least one activity
    Streak,
}

pub fn run(action: ActivityAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        ActivityAction::Log {
            id,
            duration_secs,
            at,
        } => {
            let candidate =
                engine::find(&id).ok_or_else(|| CoreError::UnknownActivity(id.clone()))?;
            let activity = CompletedActivity {
                activity_id: candidate.id.to_string(),
                category: candidate.category,
                completed_at: resolve_now(at.as_deref())?,
                duration_seconds: duration_secs.unwrap_or(candidate.duration_seconds),
            };
            let event = db.record_activity(&activity)?;
            print_json(&event)?;
        }
        ActivityAction::Today { json } => {
            let now = resolve_now(None)?;
            let activities = db.activities_on(now.date())?;
            if json {
                print_json(&activities)?;
            } else if activities.is_empty() {
                println!("Nothing yet today.");
            } else {
                for activity in &activities {
                    let name = engine::find(&activity.activity_id)
                        .map(|c| c.name)
                        .unwrap_or(activity.activity_id.as_str());
                    println!(
                        "{}  {:<28} {:<10} {}",
                        activity.completed_at.format("%H:%M"),
                        name,
                        activity.category,
                        format_length(activity.duration_seconds),
                    );
                }
            }
        }
        ActivityAction::Catalog => {
            for candidate in CATALOG {
                println!(
                    "{:<22} {:<28} {:<10} {}",
                    candidate.id,
                    candidate.name,
                    candidate.category,
                    format_length(candidate.duration_seconds),
                );
            }
        }
        ActivityAction::Streak => {
            let today = resolve_now(None)?.date();
            let streak = db.activity_streak(today)?;
            let unit = if streak == 1 { "day" } else { "days" };
            println!("{streak} {unit}");
        }
    }
    Ok(())
}
