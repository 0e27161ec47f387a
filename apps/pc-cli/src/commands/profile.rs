// profile.rs — Profile subcommands: setup, show.

use clap::Subcommand;
use pc_goal::{CoachConfig, ProfileSetup};
use pc_store::{Industry, OwnerId};

use super::{ensure_no_error, format_money, open_engine};

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Create or replace the business profile.
    Setup {
        /// Industry (e.g., "real_estate", "insurance", "solar").
        #[arg(long)]
        industry: String,
        /// What you sell.
        #[arg(long)]
        product: String,
        /// Commission earned per closed deal.
        #[arg(long)]
        commission: f64,
        /// Typical days from first contact to close.
        #[arg(long)]
        cycle_days: u32,
        /// Lead → meeting conversion rate (0..1). Defaults from config.
        #[arg(long)]
        lead_to_meeting: Option<f64>,
        /// Meeting → deal conversion rate (0..1). Defaults from config.
        #[arg(long)]
        meeting_to_deal: Option<f64>,
    },
    /// Show the saved business profile.
    Show,
}

pub async fn execute(
    cmd: &ProfileCommands,
    config: &CoachConfig,
    owner: OwnerId,
) -> anyhow::Result<()> {
    match cmd {
        ProfileCommands::Setup {
            industry,
            product,
            commission,
            cycle_days,
            lead_to_meeting,
            meeting_to_deal,
        } => {
            let industry = parse_industry(industry)?;
            let setup = ProfileSetup {
                industry: Some(industry),
                product_name: product.clone(),
                commission_per_deal: *commission,
                sales_cycle_days: *cycle_days,
                conversion_lead_to_meeting: *lead_to_meeting,
                conversion_meeting_to_deal: *meeting_to_deal,
            };
            setup_profile(config, owner, setup).await
        }
        ProfileCommands::Show => show_profile(config, owner).await,
    }
}

fn parse_industry(value: &str) -> anyhow::Result<Industry> {
    value.parse::<Industry>().map_err(|e| {
        let valid: Vec<&str> = Industry::ALL.iter().map(|i| i.as_str()).collect();
        anyhow::anyhow!("{} (expected one of: {})", e, valid.join(", "))
    })
}

async fn setup_profile(
    config: &CoachConfig,
    owner: OwnerId,
    setup: ProfileSetup,
) -> anyhow::Result<()> {
    let mut engine = open_engine(config, owner).await?;
    engine.setup_profile(setup).await?;

    let view = engine.view();
    println!("Profile saved for {}.", engine.owner());
    if view.needs_onboarding() {
        println!("Next: set this month's goal with `pc goal setup --revenue <amount> --deals <n>`.");
    }
    Ok(())
}

async fn show_profile(config: &CoachConfig, owner: OwnerId) -> anyhow::Result<()> {
    let engine = open_engine(config, owner).await?;
    ensure_no_error(&engine)?;

    match &engine.view().profile {
        Some(p) => {
            println!("Owner:       {}", p.owner);
            println!("Industry:    {}", p.industry);
            println!("Product:     {}", p.product_name);
            println!("Commission:  {} per deal", format_money(p.commission_per_deal));
            println!("Sales cycle: {} days", p.sales_cycle_days);
            if let Some(rate) = p.conversion_lead_to_meeting {
                println!("Lead → meeting:  {:.0}%", rate * 100.0);
            }
            if let Some(rate) = p.conversion_meeting_to_deal {
                println!("Meeting → deal:  {:.0}%", rate * 100.0);
            }
            println!("Updated:     {}", p.updated_at.to_rfc3339());
        }
        None => {
            eprintln!("No profile for {}. Run `pc profile setup` first.", engine.owner());
            std::process::exit(1);
        }
    }
    Ok(())
}
