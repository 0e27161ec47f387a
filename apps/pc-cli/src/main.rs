//! # pc-cli
//!
//! Command-line host for the Pipeline Coach goal engine.
//!
//! - `pc profile setup/show` — save or inspect the business profile
//! - `pc goal setup` — set this month's revenue and deal targets
//! - `pc status` — today's requirements and plan progress
//! - `pc log <activity> [count]` — record completed activity
//! - `pc commission simulate <request.json>` — price a request on the remote calculator

mod commands;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pc_goal::CoachConfig;
use tracing_subscriber::EnvFilter;

/// Pipeline Coach — turn a monthly goal into today's activity.
#[derive(Parser)]
#[command(name = "pc", version, about)]
struct Cli {
    /// Project root holding the `.pc/` directory (defaults to current directory).
    #[arg(long, default_value = ".")]
    project_root: PathBuf,

    /// Owner whose records are in scope (overrides the config file).
    #[arg(long, env = "PC_OWNER")]
    owner: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the business profile.
    Profile {
        #[command(subcommand)]
        command: commands::profile::ProfileCommands,
    },
    /// Manage the monthly goal.
    Goal {
        #[command(subcommand)]
        command: commands::goal::GoalCommands,
    },
    /// Show today's requirements and plan progress.
    Status {
        /// Print the read model as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Record completed activity on today's plan.
    Log {
        /// Activity type: new_contacts, followups, or meetings.
        activity: String,
        /// How many more were completed.
        #[arg(default_value_t = 1)]
        count: u32,
    },
    /// Talk to the remote commission calculator.
    Commission {
        #[command(subcommand)]
        command: commands::commission::CommissionCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let project_root = cli.project_root.canonicalize().unwrap_or(cli.project_root);
    let config = CoachConfig::load(&project_root)
        .with_context(|| format!("loading config under {}", project_root.display()))?;

    // Logs go to stderr so command output stays clean on stdout.
    let filter = match &config.log_filter {
        Some(directives) => EnvFilter::try_new(directives)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("pc_goal=info,pc_store=info,pc=info")
        }),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let owner = commands::resolve_owner(cli.owner.as_deref(), &config)?;

    match &cli.command {
        Commands::Profile { command } => commands::profile::execute(command, &config, owner).await,
        Commands::Goal { command } => commands::goal::execute(command, &config, owner).await,
        Commands::Status { json } => commands::status::execute(&config, owner, *json).await,
        Commands::Log { activity, count } => {
            commands::log::execute(&config, owner, activity, *count).await
        }
        Commands::Commission { command } => commands::commission::execute(command, &config).await,
    }
}
