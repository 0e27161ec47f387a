// commission.rs — `pc commission simulate`: price a request on the remote calculator.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Subcommand;
use pc_goal::{CoachConfig, CommissionCalculator, CommissionRequest, HttpCommissionClient};

use super::format_money;

#[derive(Subcommand)]
pub enum CommissionCommands {
    /// Send a request file (JSON) to the configured calculator and print the payout.
    Simulate {
        /// Path to a JSON commission request.
        request: PathBuf,
    },
}

pub async fn execute(cmd: &CommissionCommands, config: &CoachConfig) -> anyhow::Result<()> {
    match cmd {
        CommissionCommands::Simulate { request } => simulate(config, request).await,
    }
}

fn read_request(path: &Path) -> anyhow::Result<CommissionRequest> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))
}

async fn simulate(config: &CoachConfig, path: &Path) -> anyhow::Result<()> {
    let request = read_request(path)?;
    let Some(client) = HttpCommissionClient::from_config(&config.commission)? else {
        anyhow::bail!("no commission endpoint configured; set [commission] endpoint in .pc/config.toml");
    };

    tracing::info!(endpoint = client.endpoint(), plan_id = %request.plan_id, "simulating commission");
    let response = client.calculate(&request).await?;
    println!("Qualified rank: {}", response.qualified_rank);
    println!("Total volume:   {}", format_money(response.total_volume));
    println!("Total earnings: {}", format_money(response.total_earnings));
    if !response.breakdown.is_empty() {
        println!();
        for line in &response.breakdown {
            match line.level {
                Some(level) => println!("  L{:<2} {:<30} {:>12}", level, line.label, format_money(line.amount)),
                None => println!("      {:<30} {:>12}", line.label, format_money(line.amount)),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn request_file_is_parsed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("request.json");
        std::fs::write(
            &path,
            r#"{"planId": "binary-v2", "rank": "gold", "personalVolume": 500, "groupVolume": 9000,
                "team": [{"memberId": "a", "rank": "silver", "personalVolume": 300}]}"#,
        )
        .unwrap();

        let request = read_request(&path).unwrap();
        assert_eq!(request.plan_id, "binary-v2");
        assert_eq!(request.team.len(), 1);
        assert_eq!(request.team[0].group_volume, 0.0);
    }

    #[tokio::test]
    async fn simulate_without_endpoint_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("request.json");
        std::fs::write(
            &path,
            r#"{"planId": "p", "rank": "r", "personalVolume": 0, "groupVolume": 0}"#,
        )
        .unwrap();

        let config = CoachConfig::for_project(dir.path());
        let err = simulate(&config, &path).await.unwrap_err();
        assert!(err.to_string().contains("no commission endpoint"));
    }
}
