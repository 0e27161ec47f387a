// memory.rs — MemoryStore: in-process RecordStore with failure injection.
//
// Used by tests and by hosts that don't need durability. Reads and writes can
// be switched to fail on demand, and every write attempt is counted so callers
// can assert that an operation performed no write at all.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::StoreError;
use crate::records::{ActivityType, BusinessProfile, DailyPlan, MonthKey, MonthlyGoal, OwnerId};
use crate::store::RecordStore;

#[derive(Default)]
struct Records {
    profiles: HashMap<OwnerId, BusinessProfile>,
    goals: HashMap<(OwnerId, MonthKey), MonthlyGoal>,
    plans: HashMap<(OwnerId, NaiveDate), DailyPlan>,
}

/// RecordStore held entirely in memory.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Records>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    write_attempts: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent read fail with [`StoreError::Unavailable`].
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent write fail with [`StoreError::Unavailable`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of write calls received, successful or not.
    pub fn write_attempts(&self) -> usize {
        self.write_attempts.load(Ordering::SeqCst)
    }

    /// Overwrite a goal's running totals, the way a deal-closing process would.
    pub fn record_closed_revenue(
        &self,
        owner: &OwnerId,
        month: MonthKey,
        current_revenue: f64,
        current_deals: u32,
    ) -> bool {
        let mut records = self.lock();
        match records.goals.get_mut(&(owner.clone(), month)) {
            Some(goal) => {
                goal.current_revenue = current_revenue;
                goal.current_deals = current_deals;
                true
            }
            None => false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Records> {
        // A panic while holding the lock leaves the maps intact; keep serving them.
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_read(&self) -> Result<(), StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("reads disabled".to_string()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), StoreError> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get_profile(&self, owner: &OwnerId) -> Result<Option<BusinessProfile>, StoreError> {
        self.check_read()?;
        Ok(self.lock().profiles.get(owner).cloned())
    }

    async fn upsert_profile(&self, profile: &BusinessProfile) -> Result<(), StoreError> {
        self.check_write()?;
        self.lock()
            .profiles
            .insert(profile.owner.clone(), profile.clone());
        Ok(())
    }

    async fn get_goal(
        &self,
        owner: &OwnerId,
        month: MonthKey,
    ) -> Result<Option<MonthlyGoal>, StoreError> {
        self.check_read()?;
        Ok(self.lock().goals.get(&(owner.clone(), month)).cloned())
    }

    async fn upsert_goal(&self, goal: &MonthlyGoal) -> Result<(), StoreError> {
        self.check_write()?;
        self.lock()
            .goals
            .insert((goal.owner.clone(), goal.month), goal.clone());
        Ok(())
    }

    async fn get_plan(
        &self,
        owner: &OwnerId,
        date: NaiveDate,
    ) -> Result<Option<DailyPlan>, StoreError> {
        self.check_read()?;
        Ok(self.lock().plans.get(&(owner.clone(), date)).cloned())
    }

    async fn insert_plan(&self, plan: &DailyPlan) -> Result<(), StoreError> {
        self.check_write()?;
        let mut records = self.lock();
        let key = (plan.owner.clone(), plan.date);
        if records.plans.contains_key(&key) {
            return Err(StoreError::PlanConflict {
                owner: plan.owner.clone(),
                date: plan.date,
            });
        }
        records.plans.insert(key, plan.clone());
        Ok(())
    }

    async fn update_plan_field(
        &self,
        plan_id: Uuid,
        activity: ActivityType,
        delta: u32,
    ) -> Result<Option<DailyPlan>, StoreError> {
        self.check_write()?;
        let mut records = self.lock();
        let Some(plan) = records.plans.values_mut().find(|p| p.plan_id == plan_id) else {
            return Ok(None);
        };
        let counter = plan.completed_mut(activity);
        *counter = counter.saturating_add(delta);
        Ok(Some(plan.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[tokio::test]
    async fn failed_writes_change_nothing_but_are_counted() {
        let store = MemoryStore::new();
        let owner = OwnerId::new("rep-1");
        store.set_fail_writes(true);

        let plan = DailyPlan::new(owner.clone(), date(), 1, 2, 1);
        let result = store.insert_plan(&plan).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert_eq!(store.write_attempts(), 1);

        store.set_fail_writes(false);
        assert!(store.get_plan(&owner, date()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failed_reads_surface_as_errors() {
        let store = MemoryStore::new();
        store.set_fail_reads(true);
        let result = store.get_profile(&OwnerId::new("rep-1")).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn update_plan_field_targets_plan_by_id() {
        let store = MemoryStore::new();
        let owner = OwnerId::new("rep-1");
        let plan = DailyPlan::new(owner.clone(), date(), 1, 2, 1);
        store.insert_plan(&plan).await.unwrap();

        let updated = store
            .update_plan_field(plan.plan_id, ActivityType::Meetings, 1)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.completed_meetings, 1);

        let missing = store
            .update_plan_field(Uuid::new_v4(), ActivityType::Meetings, 1)
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn duplicate_plan_insert_conflicts() {
        let store = MemoryStore::new();
        let owner = OwnerId::new("rep-1");
        store
            .insert_plan(&DailyPlan::new(owner.clone(), date(), 1, 2, 1))
            .await
            .unwrap();
        let result = store
            .insert_plan(&DailyPlan::new(owner, date(), 5, 5, 5))
            .await;
        assert!(matches!(result, Err(StoreError::PlanConflict { .. })));
    }
}
