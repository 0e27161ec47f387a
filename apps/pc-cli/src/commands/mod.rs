pub mod commission;
pub mod goal;
pub mod log;
pub mod profile;
pub mod status;

use std::sync::Arc;

use pc_goal::{CoachConfig, EventDispatcher, GoalEngine, LogSink, SystemClock};
use pc_store::{JsonFileStore, OwnerId};

/// Owner from the flag/env, falling back to the config file.
pub fn resolve_owner(flag: Option<&str>, config: &CoachConfig) -> anyhow::Result<OwnerId> {
    match flag.or(config.owner.as_deref()) {
        Some(id) if !id.trim().is_empty() => Ok(OwnerId::new(id.trim())),
        _ => anyhow::bail!(
            "no owner configured: pass --owner, set PC_OWNER, or add `owner = \"...\"` to .pc/config.toml"
        ),
    }
}

/// Build an engine over the project's JSON store, logging events to the
/// configured JSONL file, and run the initial load.
pub async fn open_engine(config: &CoachConfig, owner: OwnerId) -> anyhow::Result<GoalEngine> {
    let store = Arc::new(JsonFileStore::new(&config.data_dir)?);
    let mut events = EventDispatcher::new();
    events.add_sink(Box::new(LogSink::new(&config.events_log)));

    let mut engine = GoalEngine::new(owner, store, Arc::new(SystemClock))
        .with_defaults(config.defaults)
        .with_events(events);
    engine.load().await;
    tracing::debug!(
        owner = %engine.owner(),
        data_dir = %config.data_dir.display(),
        stage = ?engine.view().stage,
        "engine loaded"
    );
    Ok(engine)
}

/// Fail the command if the last engine operation left an error behind.
pub fn ensure_no_error(engine: &GoalEngine) -> anyhow::Result<()> {
    match &engine.view().error {
        Some(e) => anyhow::bail!("{}", e),
        None => Ok(()),
    }
}

pub fn format_money(amount: f64) -> String {
    format!("{:.2}", amount)
}
