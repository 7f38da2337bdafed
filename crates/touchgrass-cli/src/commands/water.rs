use clap::Subcommand;
use touchgrass_core::{Config, Database};

use super::{print_json, resolve_now};

#[derive(Subcommand)]
pub enum WaterAction {
    /// Log water intake
    Log {
        /// Amount in the configured unit (defaults to one serving)
        amount: Option<u32>,
        /// Logged today at HH:MM instead of now
        #[arg(long)]
        at: Option<String>,
    },
    /// Show today's intake against the goal
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: WaterAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let unit = config.water.unit;

    match action {
        WaterAction::Log { amount, at } => {
            let amount = amount.unwrap_or_else(|| unit.default_serving());
            if amount == 0 {
                return Err("amount must be positive".into());
            }
            let event = db.log_water(amount, resolve_now(at.as_deref())?)?;
            print_json(&event)?;
        }
        WaterAction::Status { json } => {
            let today = resolve_now(None)?.date();
            let total = db.water_on(today)?;
            let goal = config.water.daily_goal;
            let streak = db.water_streak(today, goal)?;
            if json {
                print_json(&serde_json::json!({
                    "total_today": total,
                    "daily_goal": goal,
                    "unit": unit,
                    "streak_days": streak,
                }))?;
            } else {
                println!("{total} of {goal} {unit} today");
                println!("goal streak: {streak} days");
            }
        }
    }
    Ok(())
}
