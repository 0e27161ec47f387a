// status.rs — `pc status`: today's requirements and plan progress.

use pc_goal::{CoachConfig, EngineView, OnboardingStage};
use pc_store::{ActivityType, OwnerId};

use super::{ensure_no_error, format_money, open_engine};

pub async fn execute(config: &CoachConfig, owner: OwnerId, json: bool) -> anyhow::Result<()> {
    let engine = open_engine(config, owner).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(engine.view())?);
        return Ok(());
    }

    ensure_no_error(&engine)?;
    print!("{}", render(engine.view()));
    Ok(())
}

fn render(view: &EngineView) -> String {
    let mut out = String::new();
    match view.stage {
        OnboardingStage::NotOnboarded => {
            out.push_str("No profile yet. Run `pc profile setup` to get started.\n");
            return out;
        }
        OnboardingStage::NeedsGoal => {
            out.push_str("No goal for this month. Run `pc goal setup` to plan your days.\n");
            return out;
        }
        OnboardingStage::Planned => {}
    }

    if let (Some(goal), Some(req)) = (&view.goal, &view.requirements) {
        out.push_str(&format!(
            "Month {}: {} of {} revenue ({}%)\n",
            goal.month,
            format_money(goal.current_revenue),
            format_money(goal.target_revenue),
            req.progress_percent
        ));
        out.push_str(&format!(
            "Still needed: {} revenue → {} deals → {} contacts over {} day(s)\n",
            format_money(req.missing_revenue),
            req.needed_deals,
            req.needed_contacts,
            req.days_remaining
        ));
        out.push_str(&format!("Daily target: {} contacts\n", req.daily_target));
    }

    if let Some(plan) = &view.plan {
        out.push_str(&format!("\nPlan for {}:\n", plan.date));
        for activity in ActivityType::ALL {
            let done = plan.completed(activity);
            let target = plan.target(activity);
            let mark = if done >= target { "✓" } else { " " };
            out.push_str(&format!(
                "  [{}] {:<13} {:>3} / {:<3} {:>4.0}%\n",
                mark,
                activity.to_string(),
                done,
                target,
                plan.completion_ratio(activity) * 100.0
            ));
        }
        if plan.is_complete() {
            out.push_str("All of today's targets are met.\n");
        }
    }
    out
}
