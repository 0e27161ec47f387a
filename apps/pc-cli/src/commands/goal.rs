// goal.rs — Goal subcommands: setup, show.

use clap::Subcommand;
use pc_goal::CoachConfig;
use pc_store::OwnerId;

use super::{ensure_no_error, format_money, open_engine};

#[derive(Subcommand)]
pub enum GoalCommands {
    /// Set (or replace) this month's goal. Progress on the goal restarts at zero.
    Setup {
        /// Target revenue for the month.
        #[arg(long)]
        revenue: f64,
        /// Target number of closed deals for the month.
        #[arg(long)]
        deals: u32,
    },
    /// Show this month's goal.
    Show,
}

pub async fn execute(cmd: &GoalCommands, config: &CoachConfig, owner: OwnerId) -> anyhow::Result<()> {
    match cmd {
        GoalCommands::Setup { revenue, deals } => setup_goal(config, owner, *revenue, *deals).await,
        GoalCommands::Show => show_goal(config, owner).await,
    }
}

async fn setup_goal(
    config: &CoachConfig,
    owner: OwnerId,
    revenue: f64,
    deals: u32,
) -> anyhow::Result<()> {
    let mut engine = open_engine(config, owner).await?;
    if engine.view().profile.is_none() && engine.view().error.is_none() {
        anyhow::bail!("no profile for {}; run `pc profile setup` first", engine.owner());
    }
    engine.setup_monthly_goal(revenue, deals).await?;
    ensure_no_error(&engine)?;
    tracing::info!(owner = %engine.owner(), revenue, deals, "monthly goal set from cli");

    let view = engine.view();
    if let (Some(goal), Some(plan)) = (&view.goal, &view.plan) {
        println!(
            "Goal saved for {}: {} revenue, {} deals.",
            goal.month,
            format_money(goal.target_revenue),
            goal.target_deals
        );
        println!(
            "Today's plan: {} new contacts, {} follow-ups, {} meetings.",
            plan.target_new_contacts, plan.target_followups, plan.target_meetings
        );
    }
    Ok(())
}

async fn show_goal(config: &CoachConfig, owner: OwnerId) -> anyhow::Result<()> {
    let engine = open_engine(config, owner).await?;
    ensure_no_error(&engine)?;

    match &engine.view().goal {
        Some(g) => {
            println!("Month:    {}", g.month);
            println!(
                "Revenue:  {} / {}",
                format_money(g.current_revenue),
                format_money(g.target_revenue)
            );
            println!("Deals:    {} / {}", g.current_deals, g.target_deals);
        }
        None => {
            eprintln!("No goal for this month. Run `pc goal setup` first.");
            std::process::exit(1);
        }
    }
    Ok(())
}
