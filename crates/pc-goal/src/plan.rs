// plan.rs — DailyPlanManager: exactly one daily plan per (owner, date).
//
// A plan is created the first time it is requested and absent, from the
// requirements in effect at that moment. Its targets are then frozen: later
// profile or goal changes the same day don't retarget it.

use std::sync::Arc;

use chrono::NaiveDate;
use pc_store::{DailyPlan, OwnerId, RecordStore, StoreError};
use serde::Serialize;

use crate::calculator::DailyRequirements;
use crate::error::GoalError;

/// Percent of the daily target assigned to each activity type.
const NEW_CONTACTS_SHARE: u32 = 30;
const FOLLOWUPS_SHARE: u32 = 50;
const MEETINGS_SHARE: u32 = 20;

/// Per-activity targets for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivityTargets {
    pub new_contacts: u32,
    pub followups: u32,
    pub meetings: u32,
}

/// Split a daily target 30/50/20 across activities.
///
/// Each share is rounded up on its own, so the parts may sum to slightly more
/// than `daily_target`. Integer arithmetic keeps `ceil(n * 0.3)` exact.
pub fn split_daily_target(daily_target: u32) -> ActivityTargets {
    let share = |percent: u32| (u64::from(daily_target) * u64::from(percent)).div_ceil(100) as u32;
    ActivityTargets {
        new_contacts: share(NEW_CONTACTS_SHARE),
        followups: share(FOLLOWUPS_SHARE),
        meetings: share(MEETINGS_SHARE),
    }
}

/// Result of [`DailyPlanManager::ensure_plan`].
#[derive(Debug, Clone, PartialEq)]
pub enum EnsuredPlan {
    /// The plan already existed and was returned untouched.
    Existing(DailyPlan),
    /// No plan existed; this one was just written.
    Created(DailyPlan),
}

impl EnsuredPlan {
    pub fn plan(&self) -> &DailyPlan {
        match self {
            EnsuredPlan::Existing(plan) | EnsuredPlan::Created(plan) => plan,
        }
    }

    pub fn into_plan(self) -> DailyPlan {
        match self {
            EnsuredPlan::Existing(plan) | EnsuredPlan::Created(plan) => plan,
        }
    }
}

pub struct DailyPlanManager {
    store: Arc<dyn RecordStore>,
}

impl DailyPlanManager {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Look up the plan for a day. No side effects.
    pub async fn fetch_plan(
        &self,
        owner: &OwnerId,
        date: NaiveDate,
    ) -> Result<Option<DailyPlan>, GoalError> {
        Ok(self.store.get_plan(owner, date).await?)
    }

    /// Return the plan for a day, creating it from `requirements` if absent.
    ///
    /// An existing plan is never retargeted. If another writer inserts the
    /// same day's plan between our read and our write, theirs wins and is
    /// returned as `Existing`.
    pub async fn ensure_plan(
        &self,
        owner: &OwnerId,
        date: NaiveDate,
        requirements: &DailyRequirements,
    ) -> Result<EnsuredPlan, GoalError> {
        if let Some(existing) = self.fetch_plan(owner, date).await? {
            return Ok(EnsuredPlan::Existing(existing));
        }

        let targets = split_daily_target(requirements.daily_target);
        let plan = DailyPlan::new(
            owner.clone(),
            date,
            targets.new_contacts,
            targets.followups,
            targets.meetings,
        );

        match self.store.insert_plan(&plan).await {
            Ok(()) => {
                tracing::info!(
                    %owner,
                    %date,
                    plan_id = %plan.plan_id,
                    new_contacts = targets.new_contacts,
                    followups = targets.followups,
                    meetings = targets.meetings,
                    "created daily plan"
                );
                Ok(EnsuredPlan::Created(plan))
            }
            Err(StoreError::PlanConflict { .. }) => {
                tracing::debug!(%owner, %date, "daily plan created concurrently, using stored one");
                self.fetch_plan(owner, date)
                    .await?
                    .map(EnsuredPlan::Existing)
                    .ok_or(GoalError::Persistence(StoreError::PlanConflict {
                        owner: owner.clone(),
                        date,
                    }))
            }
            Err(e) => Err(e.into()),
        }
    }
}
