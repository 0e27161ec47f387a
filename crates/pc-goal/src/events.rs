// events.rs — Engine event model and notification dispatch.
//
// The engine emits an event at each point a host might want to observe:
// setup saves, plan creation, progress writes and their rollbacks, and load
// failures. Sinks (a JSONL log, a push bridge, analytics) subscribe by being
// added to the dispatcher. A failing sink never fails the engine operation.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use pc_store::{ActivityType, DailyPlan, Industry, MonthKey, OwnerId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GoalError;

/// Events emitted by the goal engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum CoachEvent {
    /// The owner's business profile was created or replaced.
    ProfileSaved {
        owner: OwnerId,
        industry: Industry,
        timestamp: DateTime<Utc>,
    },

    /// A monthly goal was created or replaced.
    GoalSaved {
        owner: OwnerId,
        month: MonthKey,
        target_revenue: f64,
        target_deals: u32,
        timestamp: DateTime<Utc>,
    },

    /// A daily plan was created for a day that had none.
    PlanCreated {
        owner: OwnerId,
        plan_id: Uuid,
        date: NaiveDate,
        target_new_contacts: u32,
        target_followups: u32,
        target_meetings: u32,
        timestamp: DateTime<Utc>,
    },

    /// A progress increment reached the store.
    ProgressRecorded {
        owner: OwnerId,
        plan_id: Uuid,
        activity: ActivityType,
        count: u32,
        timestamp: DateTime<Utc>,
    },

    /// A progress write failed and the local increment was undone.
    ProgressRolledBack {
        owner: OwnerId,
        plan_id: Uuid,
        activity: ActivityType,
        count: u32,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// A load cycle failed; the previous read model was kept.
    LoadFailed {
        owner: OwnerId,
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

impl CoachEvent {
    /// Get the event type name as a string.
    pub fn event_type(&self) -> &str {
        match self {
            CoachEvent::ProfileSaved { .. } => "profile_saved",
            CoachEvent::GoalSaved { .. } => "goal_saved",
            CoachEvent::PlanCreated { .. } => "plan_created",
            CoachEvent::ProgressRecorded { .. } => "progress_recorded",
            CoachEvent::ProgressRolledBack { .. } => "progress_rolled_back",
            CoachEvent::LoadFailed { .. } => "load_failed",
        }
    }

    pub fn plan_created(plan: &DailyPlan) -> Self {
        CoachEvent::PlanCreated {
            owner: plan.owner.clone(),
            plan_id: plan.plan_id,
            date: plan.date,
            target_new_contacts: plan.target_new_contacts,
            target_followups: plan.target_followups,
            target_meetings: plan.target_meetings,
            timestamp: Utc::now(),
        }
    }

    pub fn load_failed(owner: &OwnerId, reason: impl Into<String>) -> Self {
        CoachEvent::LoadFailed {
            owner: owner.clone(),
            reason: reason.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Receives engine events.
pub trait NotificationSink: Send + Sync {
    /// Handle an event. Errors are logged but don't stop the engine.
    fn send(&self, event: &CoachEvent) -> Result<(), GoalError>;
}

/// Appends events as JSONL to a file.
pub struct LogSink {
    path: PathBuf,
}

impl LogSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl NotificationSink for LogSink {
    fn send(&self, event: &CoachEvent) -> Result<(), GoalError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| GoalError::IoError {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| GoalError::IoError {
                path: self.path.display().to_string(),
                source,
            })?;

        let json = serde_json::to_string(event)?;
        writeln!(file, "{}", json).map_err(|source| GoalError::IoError {
            path: self.path.display().to_string(),
            source,
        })?;

        Ok(())
    }
}

/// Fans events out to every registered sink.
#[derive(Default)]
pub struct EventDispatcher {
    sinks: Vec<Box<dyn NotificationSink>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add_sink(&mut self, sink: Box<dyn NotificationSink>) {
        self.sinks.push(sink);
    }

    pub fn dispatch(&self, event: &CoachEvent) {
        for sink in &self.sinks {
            if let Err(e) = sink.send(event) {
                tracing::warn!(event = event.event_type(), "notification sink error: {}", e);
            }
        }
    }
}
