// log.rs — `pc log`: record completed activity on today's plan.

use pc_goal::CoachConfig;
use pc_store::{ActivityType, OwnerId};

use super::{ensure_no_error, open_engine};

pub async fn execute(
    config: &CoachConfig,
    owner: OwnerId,
    activity: &str,
    count: u32,
) -> anyhow::Result<()> {
    let activity: ActivityType = activity.parse().map_err(anyhow::Error::msg)?;

    let mut engine = open_engine(config, owner).await?;
    ensure_no_error(&engine)?;
    if engine.view().needs_onboarding() {
        anyhow::bail!("no plan for today yet; finish `pc profile setup` and `pc goal setup` first");
    }

    engine.update_progress(activity, count).await;
    ensure_no_error(&engine)?;

    if let Some(plan) = &engine.view().plan {
        tracing::info!(
            owner = %engine.owner(),
            plan_id = %plan.plan_id,
            %activity,
            count,
            "activity logged"
        );
        println!(
            "{}: {} / {}",
            activity,
            plan.completed(activity),
            plan.target(activity)
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pc_goal::ProfileSetup;
    use pc_store::Industry;
    use tempfile::TempDir;

    #[tokio::test]
    async fn log_before_onboarding_fails() {
        let project = TempDir::new().unwrap();
        let config = CoachConfig::for_project(project.path());
        let result = execute(&config, OwnerId::new("rep-1"), "meetings", 1).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn unknown_activity_fails() {
        let project = TempDir::new().unwrap();
        let config = CoachConfig::for_project(project.path());
        let result = execute(&config, OwnerId::new("rep-1"), "cold_calls", 1).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn logged_activity_is_persisted() {
        let project = TempDir::new().unwrap();
        let config = CoachConfig::for_project(project.path());
        let owner = OwnerId::new("rep-1");

        let mut engine = open_engine(&config, owner.clone()).await.unwrap();
        engine
            .setup_profile(ProfileSetup {
                industry: Some(Industry::DirectSales),
                product_name: "Skincare".to_string(),
                commission_per_deal: 80.0,
                sales_cycle_days: 3,
                conversion_lead_to_meeting: Some(0.3),
                conversion_meeting_to_deal: Some(0.4),
            })
            .await
            .unwrap();
        engine.setup_monthly_goal(2_000.0, 25).await.unwrap();

        execute(&config, owner.clone(), "followups", 3).await.unwrap();
        execute(&config, owner.clone(), "follow-ups", 1).await.unwrap();

        let engine = open_engine(&config, owner).await.unwrap();
        assert_eq!(engine.view().plan.as_ref().unwrap().completed_followups, 4);
    }
}
