// config.rs — Engine configuration.
//
// CoachConfig decides where Pipeline Coach keeps its state and which defaults
// the engine plans with. `for_project()` gives the standard `.pc/` layout;
// `load()` overlays `.pc/config.toml` on top of it when present.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::calculator::ConversionDefaults;
use crate::error::GoalError;

/// Name of the config file inside the `.pc/` directory.
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachConfig {
    /// Root of the JSON record store.
    pub data_dir: PathBuf,

    /// Path to the JSONL engine event log.
    pub events_log: PathBuf,

    /// Owner identity used when the host doesn't supply one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// Conversion rates for profiles saved without their own.
    #[serde(default)]
    pub defaults: ConversionDefaults,

    #[serde(default)]
    pub commission: CommissionConfig,

    /// tracing EnvFilter directives, e.g. "pc_goal=debug".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

/// Where the remote commission calculator lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionConfig {
    pub endpoint: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CommissionConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// On-disk shape: every field optional, relative paths resolve against the project root.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    events_log: Option<PathBuf>,
    owner: Option<String>,
    #[serde(default)]
    defaults: Option<ConversionDefaults>,
    #[serde(default)]
    commission: Option<CommissionConfig>,
    log_filter: Option<String>,
}

impl CoachConfig {
    /// Create a config with the standard `.pc/` layout for a project.
    pub fn for_project(project_root: impl AsRef<Path>) -> Self {
        let pc_dir = project_root.as_ref().join(".pc");
        Self {
            data_dir: pc_dir.join("data"),
            events_log: pc_dir.join("events.jsonl"),
            owner: None,
            defaults: ConversionDefaults::default(),
            commission: CommissionConfig::default(),
            log_filter: None,
        }
    }

    /// Load `.pc/config.toml` over the project defaults.
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load(project_root: impl AsRef<Path>) -> Result<Self, GoalError> {
        let root = project_root.as_ref();
        let path = root.join(".pc").join(CONFIG_FILE);
        let mut config = Self::for_project(root);

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(config),
            Err(source) => {
                return Err(GoalError::IoError {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        let file: ConfigFile = toml::from_str(&content).map_err(|e| GoalError::Config {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        if let Some(dir) = file.data_dir {
            config.data_dir = root.join(dir);
        }
        if let Some(log) = file.events_log {
            config.events_log = root.join(log);
        }
        if let Some(defaults) = file.defaults {
            config.defaults = defaults;
        }
        if let Some(commission) = file.commission {
            config.commission = commission;
        }
        config.owner = file.owner;
        config.log_filter = file.log_filter;

        config.validate().map_err(|reason| GoalError::Config {
            path: path.display().to_string(),
            reason,
        })?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        for (name, rate) in [
            ("defaults.lead_to_meeting", self.defaults.lead_to_meeting),
            ("defaults.meeting_to_deal", self.defaults.meeting_to_deal),
        ] {
            if !(rate > 0.0 && rate <= 1.0) {
                return Err(format!("{} must be in (0, 1], got {}", name, rate));
            }
        }
        if self.commission.timeout_secs == 0 {
            return Err("commission.timeout_secs must be > 0".to_string());
        }
        Ok(())
    }
}
