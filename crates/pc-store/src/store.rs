// store.rs — RecordStore trait: the seven logical operations the goal engine needs.
//
// Every call takes the owner (or a plan id) explicitly; no backend holds an
// ambient "current user". Each operation returns a record, an explicit absent
// marker (`Ok(None)`), or a StoreError.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::StoreError;
use crate::records::{ActivityType, BusinessProfile, DailyPlan, MonthKey, MonthlyGoal, OwnerId};

/// Persistent record store for profiles, monthly goals, and daily plans.
///
/// Implementations must make `insert_plan` all-or-nothing: either the whole
/// plan is stored or nothing is. A second insert for the same (owner, date)
/// fails with [`StoreError::PlanConflict`].
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Load the owner's business profile.
    async fn get_profile(&self, owner: &OwnerId) -> Result<Option<BusinessProfile>, StoreError>;

    /// Create or replace the owner's business profile.
    async fn upsert_profile(&self, profile: &BusinessProfile) -> Result<(), StoreError>;

    /// Load the goal for one calendar month.
    async fn get_goal(
        &self,
        owner: &OwnerId,
        month: MonthKey,
    ) -> Result<Option<MonthlyGoal>, StoreError>;

    /// Create or replace the goal keyed by (owner, month).
    async fn upsert_goal(&self, goal: &MonthlyGoal) -> Result<(), StoreError>;

    /// Load the plan for one day.
    async fn get_plan(
        &self,
        owner: &OwnerId,
        date: NaiveDate,
    ) -> Result<Option<DailyPlan>, StoreError>;

    /// Store a new plan in a single write.
    async fn insert_plan(&self, plan: &DailyPlan) -> Result<(), StoreError>;

    /// Add `delta` to one completion counter of a plan.
    ///
    /// Returns the updated plan, or `None` if no plan has that id.
    async fn update_plan_field(
        &self,
        plan_id: Uuid,
        activity: ActivityType,
        delta: u32,
    ) -> Result<Option<DailyPlan>, StoreError>;
}
