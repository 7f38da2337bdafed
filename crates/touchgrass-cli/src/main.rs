use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "touchgrass-cli", version, about = "Touch Grass CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest what to do on your next break
    Suggest(commands::suggest::SuggestArgs),
    /// Activity history
    Activity {
        #[command(subcommand)]
        action: commands::activity::ActivityAction,
    },
    /// Water intake tracking
    Water {
        #[command(subcommand)]
        action: commands::water::WaterAction,
    },
    /// Break reminder control
    Reminder {
        /// Act as of today at HH:MM instead of now
        #[arg(long, global = true)]
        at: Option<String>,
        #[command(subcommand)]
        action: commands::reminder::ReminderAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("TOUCHGRASS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Suggest(args) => commands::suggest::run(args),
        Commands::Activity { action } => commands::activity::run(action),
        Commands::Water { action } => commands::water::run(action),
        Commands::Reminder { action, at } => commands::reminder::run(action, at.as_deref()),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
