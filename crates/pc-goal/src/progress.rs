// progress.rs — ProgressTracker: optimistic completion counters with rollback.
//
// Recording progress is a two-phase command:
//   1. apply   — bump the in-memory counter right away (AppliedIncrement)
//   2. confirm — send the same increment to the store
//   on failure — AppliedIncrement::rollback subtracts exactly what apply added
//
// The visible plan therefore differs from the stored one for at most one
// round-trip, and a failed write always nets to zero locally. This assumes a
// single writer per plan; concurrent writers are not reconciled.

use std::sync::Arc;

use pc_store::{ActivityType, DailyPlan, RecordStore};
use uuid::Uuid;

use crate::error::GoalError;

/// A locally-applied increment awaiting remote confirmation.
///
/// Holding one means the in-memory plan is ahead of the store by `amount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "an applied increment must be confirmed or rolled back"]
pub struct AppliedIncrement {
    plan_id: Uuid,
    activity: ActivityType,
    amount: u32,
}

impl AppliedIncrement {
    /// Phase 1: add `count` to the plan's counter for `activity`.
    pub fn apply(plan: &mut DailyPlan, activity: ActivityType, count: u32) -> Self {
        let plan_id = plan.plan_id;
        let counter = plan.completed_mut(activity);
        let before = *counter;
        *counter = before.saturating_add(count);
        Self {
            plan_id,
            activity,
            amount: *counter - before,
        }
    }

    /// Undo this increment on `plan`.
    pub fn rollback(self, plan: &mut DailyPlan) {
        if plan.plan_id != self.plan_id {
            tracing::warn!(
                expected = %self.plan_id,
                found = %plan.plan_id,
                "rollback skipped: plan was replaced while the write was in flight"
            );
            return;
        }
        let counter = plan.completed_mut(self.activity);
        *counter = counter.saturating_sub(self.amount);
    }

    pub fn plan_id(&self) -> Uuid {
        self.plan_id
    }

    pub fn activity(&self) -> ActivityType {
        self.activity
    }

    pub fn amount(&self) -> u32 {
        self.amount
    }
}

pub struct ProgressTracker {
    store: Arc<dyn RecordStore>,
}

impl ProgressTracker {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Phase 2: write an applied increment to the store.
    ///
    /// On error the caller owns the rollback.
    pub async fn confirm(&self, applied: &AppliedIncrement) -> Result<(), GoalError> {
        if applied.amount == 0 {
            return Ok(());
        }
        match self
            .store
            .update_plan_field(applied.plan_id, applied.activity, applied.amount)
            .await?
        {
            Some(_) => Ok(()),
            None => Err(GoalError::PlanNotFound(applied.plan_id)),
        }
    }

    /// Confirm an applied increment, undoing it on `plan` if the write fails.
    pub async fn confirm_or_rollback(
        &self,
        plan: &mut DailyPlan,
        applied: AppliedIncrement,
    ) -> Result<(), GoalError> {
        if let Err(e) = self.confirm(&applied).await {
            tracing::warn!(
                plan_id = %applied.plan_id,
                activity = %applied.activity,
                count = applied.amount,
                error = %e,
                "progress write failed, rolling back"
            );
            applied.rollback(plan);
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pc_store::{MemoryStore, OwnerId};

    fn plan() -> DailyPlan {
        DailyPlan::new(
            OwnerId::new("rep-1"),
            NaiveDate::from_ymd_opt(2026, 9, 21).unwrap(),
            2,
            3,
            2,
        )
    }

    #[test]
    fn rollback_undoes_exactly_what_apply_added() {
        let mut plan = plan();
        plan.completed_followups = 4;

        let applied = AppliedIncrement::apply(&mut plan, ActivityType::Followups, 3);
        assert_eq!(plan.completed_followups, 7);
        assert_eq!(applied.amount(), 3);

        applied.rollback(&mut plan);
        assert_eq!(plan.completed_followups, 4);
    }

    #[test]
    fn saturated_apply_rolls_back_to_the_original_value() {
        let mut plan = plan();
        plan.completed_meetings = u32::MAX - 1;

        let applied = AppliedIncrement::apply(&mut plan, ActivityType::Meetings, 10);
        assert_eq!(plan.completed_meetings, u32::MAX);
        assert_eq!(applied.amount(), 1);

        applied.rollback(&mut plan);
        assert_eq!(plan.completed_meetings, u32::MAX - 1);
    }

    #[test]
    fn rollback_ignores_a_different_plan() {
        let mut original = plan();
        let applied = AppliedIncrement::apply(&mut original, ActivityType::Meetings, 1);

        let mut replacement = plan();
        replacement.completed_meetings = 5;
        applied.rollback(&mut replacement);
        assert_eq!(replacement.completed_meetings, 5);
    }

    #[tokio::test]
    async fn successful_record_matches_store() {
        let store = Arc::new(MemoryStore::new());
        let mut local = plan();
        store.insert_plan(&local).await.unwrap();

        let tracker = ProgressTracker::new(store.clone());
        let applied = AppliedIncrement::apply(&mut local, ActivityType::NewContacts, 2);
        tracker
            .confirm_or_rollback(&mut local, applied)
            .await
            .unwrap();

        assert_eq!(local.completed_new_contacts, 2);
        let remote = store
            .get_plan(&local.owner, local.date)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(remote.completed_new_contacts, 2);
    }

    #[tokio::test]
    async fn failed_write_is_net_zero() {
        let store = Arc::new(MemoryStore::new());
        let mut local = plan();
        store.insert_plan(&local).await.unwrap();
        local.completed_followups = 1;

        store.set_fail_writes(true);
        let tracker = ProgressTracker::new(store.clone());
        let applied = AppliedIncrement::apply(&mut local, ActivityType::Followups, 5);
        let result = tracker
            .confirm_or_rollback(&mut local, applied)
            .await;

        assert!(matches!(result, Err(GoalError::Persistence(_))));
        assert_eq!(local.completed_followups, 1);
    }

    #[tokio::test]
    async fn vanished_plan_rolls_back_with_not_found() {
        let store = Arc::new(MemoryStore::new());
        let mut local = plan();

        let tracker = ProgressTracker::new(store);
        let applied = AppliedIncrement::apply(&mut local, ActivityType::Meetings, 1);
        let result = tracker
            .confirm_or_rollback(&mut local, applied)
            .await;

        assert!(matches!(result, Err(GoalError::PlanNotFound(id)) if id == local.plan_id));
        assert_eq!(local.completed_meetings, 0);
    }

    #[tokio::test]
    async fn zero_count_performs_no_write() {
        let store = Arc::new(MemoryStore::new());
        let mut local = plan();
        store.insert_plan(&local).await.unwrap();
        let writes_before = store.write_attempts();

        let tracker = ProgressTracker::new(store.clone());
        let applied = AppliedIncrement::apply(&mut local, ActivityType::Meetings, 0);
        tracker
            .confirm_or_rollback(&mut local, applied)
            .await
            .unwrap();
        assert_eq!(store.write_attempts(), writes_before);
    }
}
