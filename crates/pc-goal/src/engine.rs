// engine.rs — GoalEngine: the single entry point for the goal engine.
//
// Onboarding moves through three stages:
//   NotOnboarded --(profile saved)--> NeedsGoal --(goal saved)--> Planned
//
// A load runs strictly in order: profile → this month's goal → requirements →
// today's plan. A missing profile or goal stops the sequence. The result is
// committed to the read model only if the whole sequence succeeds; a failed
// read keeps the previous model and reports the error instead.
//
// Only `setup_profile` and `setup_monthly_goal` return errors. Loads and
// progress updates report failures through `EngineView::error` and events.

use std::sync::Arc;

use chrono::Utc;
use pc_store::{
    ActivityType, BusinessProfile, DailyPlan, Industry, MonthKey, MonthlyGoal, OwnerId,
    RecordStore,
};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use tokio::sync::watch;

use crate::calculator::{compute_requirements, ConversionDefaults, DailyRequirements};
use crate::clock::Clock;
use crate::error::GoalError;
use crate::events::{CoachEvent, EventDispatcher};
use crate::plan::{DailyPlanManager, EnsuredPlan};
use crate::progress::{AppliedIncrement, ProgressTracker};

/// Where the owner is in onboarding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStage {
    /// No business profile yet.
    #[default]
    NotOnboarded,
    /// Profile saved, no goal for the current month.
    NeedsGoal,
    /// Profile and goal present; requirements and a daily plan are derived.
    Planned,
}

/// The composed read model a host renders.
///
/// Serializes with a derived `needs_onboarding` flag next to `stage`.
#[derive(Debug, Clone, Default)]
pub struct EngineView {
    pub stage: OnboardingStage,
    pub profile: Option<BusinessProfile>,
    pub goal: Option<MonthlyGoal>,
    pub plan: Option<DailyPlan>,
    pub requirements: Option<DailyRequirements>,
    pub loading: bool,
    pub error: Option<String>,
}

impl EngineView {
    pub fn needs_onboarding(&self) -> bool {
        self.stage != OnboardingStage::Planned
    }
}

impl Serialize for EngineView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut view = serializer.serialize_struct("EngineView", 8)?;
        view.serialize_field("stage", &self.stage)?;
        view.serialize_field("needs_onboarding", &self.needs_onboarding())?;
        view.serialize_field("profile", &self.profile)?;
        view.serialize_field("goal", &self.goal)?;
        view.serialize_field("plan", &self.plan)?;
        view.serialize_field("requirements", &self.requirements)?;
        view.serialize_field("loading", &self.loading)?;
        view.serialize_field("error", &self.error)?;
        view.end()
    }
}

/// Input to [`GoalEngine::setup_profile`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileSetup {
    pub industry: Option<Industry>,
    pub product_name: String,
    pub commission_per_deal: f64,
    pub sales_cycle_days: u32,
    #[serde(default)]
    pub conversion_lead_to_meeting: Option<f64>,
    #[serde(default)]
    pub conversion_meeting_to_deal: Option<f64>,
}

impl ProfileSetup {
    /// Check every field; the first bad one is reported.
    pub fn validate(&self) -> Result<(), GoalError> {
        if self.industry.is_none() {
            return Err(GoalError::validation("industry", "is required"));
        }
        if self.product_name.trim().is_empty() {
            return Err(GoalError::validation("product_name", "is required"));
        }
        if !(self.commission_per_deal.is_finite() && self.commission_per_deal > 0.0) {
            return Err(GoalError::validation(
                "commission_per_deal",
                format!("must be > 0, got {}", self.commission_per_deal),
            ));
        }
        if self.sales_cycle_days == 0 {
            return Err(GoalError::validation("sales_cycle_days", "must be > 0"));
        }
        for (field, rate) in [
            ("conversion_lead_to_meeting", self.conversion_lead_to_meeting),
            ("conversion_meeting_to_deal", self.conversion_meeting_to_deal),
        ] {
            if let Some(rate) = rate {
                if !(0.0..=1.0).contains(&rate) {
                    return Err(GoalError::validation(
                        field,
                        format!("must be between 0 and 1, got {}", rate),
                    ));
                }
            }
        }
        Ok(())
    }
}

fn validate_goal(target_revenue: f64, target_deals: u32) -> Result<(), GoalError> {
    if !(target_revenue.is_finite() && target_revenue > 0.0) {
        return Err(GoalError::validation(
            "target_revenue",
            format!("must be > 0, got {}", target_revenue),
        ));
    }
    if target_deals == 0 {
        return Err(GoalError::validation("target_deals", "must be > 0"));
    }
    Ok(())
}

/// Outcome of one load pass, committed to the view as a unit.
struct Snapshot {
    stage: OnboardingStage,
    profile: Option<BusinessProfile>,
    goal: Option<MonthlyGoal>,
    requirements: Option<DailyRequirements>,
    plan: Option<DailyPlan>,
}

pub struct GoalEngine {
    owner: OwnerId,
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
    defaults: ConversionDefaults,
    plans: DailyPlanManager,
    tracker: ProgressTracker,
    events: EventDispatcher,
    view: EngineView,
    publisher: watch::Sender<EngineView>,
}

impl GoalEngine {
    pub fn new(owner: OwnerId, store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>) -> Self {
        let (publisher, _) = watch::channel(EngineView::default());
        Self {
            owner,
            plans: DailyPlanManager::new(store.clone()),
            tracker: ProgressTracker::new(store.clone()),
            store,
            clock,
            defaults: ConversionDefaults::default(),
            events: EventDispatcher::new(),
            view: EngineView::default(),
            publisher,
        }
    }

    pub fn with_defaults(mut self, defaults: ConversionDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_events(mut self, events: EventDispatcher) -> Self {
        self.events = events;
        self
    }

    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    /// Current read model.
    pub fn view(&self) -> &EngineView {
        &self.view
    }

    /// Watch the read model, including `loading` transitions mid-operation.
    pub fn subscribe(&self) -> watch::Receiver<EngineView> {
        self.publisher.subscribe()
    }

    /// Run the full load sequence. Never fails; see `EngineView::error`.
    pub async fn load(&mut self) {
        self.view.loading = true;
        self.view.error = None;
        self.publish();

        let today = self.clock.today();
        match self.read_snapshot(today).await {
            Ok(snapshot) => {
                self.view.stage = snapshot.stage;
                self.view.profile = snapshot.profile;
                self.view.goal = snapshot.goal;
                self.view.requirements = snapshot.requirements;
                self.view.plan = snapshot.plan;
            }
            Err(e) => {
                tracing::warn!(owner = %self.owner, error = %e, "goal engine load failed");
                self.events
                    .dispatch(&CoachEvent::load_failed(&self.owner, e.to_string()));
                self.view.error = Some(e.to_string());
            }
        }

        self.view.loading = false;
        self.publish();
    }

    /// Re-run the load sequence.
    pub async fn refetch(&mut self) {
        self.load().await;
    }

    async fn read_snapshot(&self, today: chrono::NaiveDate) -> Result<Snapshot, GoalError> {
        let Some(profile) = self.store.get_profile(&self.owner).await? else {
            return Ok(Snapshot {
                stage: OnboardingStage::NotOnboarded,
                profile: None,
                goal: None,
                requirements: None,
                plan: None,
            });
        };

        let month = MonthKey::of(today);
        let Some(goal) = self.store.get_goal(&self.owner, month).await? else {
            return Ok(Snapshot {
                stage: OnboardingStage::NeedsGoal,
                profile: Some(profile),
                goal: None,
                requirements: None,
                plan: None,
            });
        };

        let requirements = compute_requirements(&profile, &goal, today, &self.defaults);
        tracing::debug!(owner = %self.owner, %today, ?requirements, "computed daily requirements");

        let ensured = self
            .plans
            .ensure_plan(&self.owner, today, &requirements)
            .await?;
        if let EnsuredPlan::Created(plan) = &ensured {
            self.events.dispatch(&CoachEvent::plan_created(plan));
        }
        tracing::debug!(owner = %self.owner, plan_id = %ensured.plan().plan_id, "daily plan ready");

        Ok(Snapshot {
            stage: OnboardingStage::Planned,
            profile: Some(profile),
            goal: Some(goal),
            requirements: Some(requirements),
            plan: Some(ensured.into_plan()),
        })
    }

    /// Create or replace the owner's business profile, then reload.
    ///
    /// Validation errors are returned before any I/O. Store errors are
    /// returned as-is so the caller can hold its flow until the save lands.
    pub async fn setup_profile(&mut self, setup: ProfileSetup) -> Result<(), GoalError> {
        setup.validate()?;
        let Some(industry) = setup.industry else {
            return Err(GoalError::validation("industry", "is required"));
        };

        let now = Utc::now();
        let created_at = self
            .view
            .profile
            .as_ref()
            .map(|p| p.created_at)
            .unwrap_or(now);
        let profile = BusinessProfile {
            owner: self.owner.clone(),
            industry,
            product_name: setup.product_name.trim().to_string(),
            commission_per_deal: setup.commission_per_deal,
            sales_cycle_days: setup.sales_cycle_days,
            conversion_lead_to_meeting: Some(
                setup
                    .conversion_lead_to_meeting
                    .unwrap_or(self.defaults.lead_to_meeting),
            ),
            conversion_meeting_to_deal: Some(
                setup
                    .conversion_meeting_to_deal
                    .unwrap_or(self.defaults.meeting_to_deal),
            ),
            created_at,
            updated_at: now,
        };

        self.store.upsert_profile(&profile).await?;
        tracing::info!(owner = %self.owner, %industry, "saved business profile");
        self.events.dispatch(&CoachEvent::ProfileSaved {
            owner: self.owner.clone(),
            industry,
            timestamp: now,
        });

        self.load().await;
        Ok(())
    }

    /// Create or replace this month's goal with progress reset to zero, then reload.
    pub async fn setup_monthly_goal(
        &mut self,
        target_revenue: f64,
        target_deals: u32,
    ) -> Result<(), GoalError> {
        validate_goal(target_revenue, target_deals)?;

        let now = Utc::now();
        let month = MonthKey::of(self.clock.today());
        let goal = MonthlyGoal {
            owner: self.owner.clone(),
            month,
            target_revenue,
            target_deals,
            current_revenue: 0.0,
            current_deals: 0,
            updated_at: now,
        };

        self.store.upsert_goal(&goal).await?;
        tracing::info!(owner = %self.owner, %month, target_revenue, target_deals, "saved monthly goal");
        self.events.dispatch(&CoachEvent::GoalSaved {
            owner: self.owner.clone(),
            month,
            target_revenue,
            target_deals,
            timestamp: now,
        });

        self.load().await;
        Ok(())
    }

    /// Record `count` more completed units of `activity` on today's plan.
    ///
    /// The view shows the increment immediately. If the store rejects it, the
    /// increment is undone and the failure lands in `EngineView::error`.
    pub async fn update_progress(&mut self, activity: ActivityType, count: u32) {
        if count == 0 {
            return;
        }
        self.view.error = None;
        let Some(plan) = self.view.plan.as_mut() else {
            tracing::warn!(owner = %self.owner, %activity, "progress ignored: no daily plan loaded");
            self.view.error = Some(GoalError::NotOnboarded.to_string());
            self.publish();
            return;
        };

        let applied = AppliedIncrement::apply(plan, activity, count);
        self.publish();

        // `&mut self` is held across the write, so the plan is still in place.
        let result = match self.view.plan.as_mut() {
            Some(plan) => self.tracker.confirm_or_rollback(plan, applied).await,
            None => Err(GoalError::NotOnboarded),
        };
        match result {
            Ok(()) => {
                self.events.dispatch(&CoachEvent::ProgressRecorded {
                    owner: self.owner.clone(),
                    plan_id: applied.plan_id(),
                    activity: applied.activity(),
                    count: applied.amount(),
                    timestamp: Utc::now(),
                });
            }
            Err(e) => {
                self.events.dispatch(&CoachEvent::ProgressRolledBack {
                    owner: self.owner.clone(),
                    plan_id: applied.plan_id(),
                    activity: applied.activity(),
                    count: applied.amount(),
                    reason: e.to_string(),
                    timestamp: Utc::now(),
                });
                self.view.error = Some(e.to_string());
            }
        }
        self.publish();
    }

    fn publish(&self) {
        self.publisher.send_replace(self.view.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;
    use pc_store::MemoryStore;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, d).unwrap()
    }

    fn solar_setup() -> ProfileSetup {
        ProfileSetup {
            industry: Some(Industry::Solar),
            product_name: "Rooftop kit".to_string(),
            commission_per_deal: 1000.0,
            sales_cycle_days: 14,
            conversion_lead_to_meeting: Some(0.2),
            conversion_meeting_to_deal: Some(0.5),
        }
    }

    fn engine_on(store: Arc<MemoryStore>, date: NaiveDate) -> (GoalEngine, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(date));
        let engine = GoalEngine::new(OwnerId::new("rep-1"), store, clock.clone());
        (engine, clock)
    }

    #[tokio::test]
    async fn fresh_owner_needs_onboarding() {
        let store = Arc::new(MemoryStore::new());
        let (mut engine, _) = engine_on(store, day(21));

        engine.load().await;
        let view = engine.view();
        assert_eq!(view.stage, OnboardingStage::NotOnboarded);
        assert!(view.needs_onboarding());
        assert!(view.profile.is_none());
        assert!(!view.loading);
        assert!(view.error.is_none());
    }

    #[tokio::test]
    async fn onboarding_walks_through_all_stages() {
        let store = Arc::new(MemoryStore::new());
        let (mut engine, _) = engine_on(store, day(21));

        engine.setup_profile(solar_setup()).await.unwrap();
        assert_eq!(engine.view().stage, OnboardingStage::NeedsGoal);
        assert!(engine.view().needs_onboarding());
        assert!(engine.view().plan.is_none());

        engine.setup_monthly_goal(10_000.0, 10).await.unwrap();
        let view = engine.view();
        assert_eq!(view.stage, OnboardingStage::Planned);
        assert!(!view.needs_onboarding());

        let req = view.requirements.as_ref().unwrap();
        assert_eq!(req.needed_deals, 10);
        assert_eq!(req.needed_contacts, 100);
        assert_eq!(req.days_remaining, 10);
        assert_eq!(req.daily_target, 10);

        let plan = view.plan.as_ref().unwrap();
        assert_eq!(plan.date, day(21));
        assert_eq!(
            (plan.target_new_contacts, plan.target_followups, plan.target_meetings),
            (3, 5, 2)
        );
    }

    #[tokio::test]
    async fn invalid_profile_is_rejected_before_the_store() {
        let store = Arc::new(MemoryStore::new());
        let (mut engine, _) = engine_on(store.clone(), day(21));

        let cases: [(&str, Box<dyn Fn(&mut ProfileSetup)>); 5] = [
            ("industry", Box::new(|s: &mut ProfileSetup| s.industry = None)),
            ("product_name", Box::new(|s: &mut ProfileSetup| s.product_name = "  ".to_string())),
            ("commission_per_deal", Box::new(|s: &mut ProfileSetup| s.commission_per_deal = 0.0)),
            ("sales_cycle_days", Box::new(|s: &mut ProfileSetup| s.sales_cycle_days = 0)),
            (
                "conversion_meeting_to_deal",
                Box::new(|s: &mut ProfileSetup| s.conversion_meeting_to_deal = Some(1.5)),
            ),
        ];
        for (expected, mutate) in cases {
            let mut setup = solar_setup();
            mutate(&mut setup);
            let err = engine.setup_profile(setup).await.unwrap_err();
            assert!(
                matches!(err, GoalError::Validation { field, .. } if field == expected),
                "expected validation error on {}, got {:?}",
                expected,
                err
            );
        }
        assert_eq!(store.write_attempts(), 0);
    }

    #[tokio::test]
    async fn invalid_goal_is_rejected_before_the_store() {
        let store = Arc::new(MemoryStore::new());
        let (mut engine, _) = engine_on(store.clone(), day(21));

        let err = engine.setup_monthly_goal(0.0, 5).await.unwrap_err();
        assert!(matches!(err, GoalError::Validation { field: "target_revenue", .. }));
        let err = engine.setup_monthly_goal(f64::NAN, 5).await.unwrap_err();
        assert!(matches!(err, GoalError::Validation { field: "target_revenue", .. }));
        let err = engine.setup_monthly_goal(5000.0, 0).await.unwrap_err();
        assert!(matches!(err, GoalError::Validation { field: "target_deals", .. }));
        assert_eq!(store.write_attempts(), 0);
    }

    #[tokio::test]
    async fn setup_write_failure_is_returned() {
        let store = Arc::new(MemoryStore::new());
        let (mut engine, _) = engine_on(store.clone(), day(21));

        store.set_fail_writes(true);
        let err = engine.setup_profile(solar_setup()).await.unwrap_err();
        assert!(matches!(err, GoalError::Persistence(_)));
        assert_eq!(engine.view().stage, OnboardingStage::NotOnboarded);
    }

    #[tokio::test]
    async fn profile_setup_fills_default_rates() {
        let store = Arc::new(MemoryStore::new());
        let (mut engine, _) = engine_on(store.clone(), day(21));

        let mut setup = solar_setup();
        setup.conversion_lead_to_meeting = None;
        setup.conversion_meeting_to_deal = None;
        engine.setup_profile(setup).await.unwrap();

        let profile = engine.view().profile.as_ref().unwrap();
        assert_eq!(profile.conversion_lead_to_meeting, Some(0.2));
        assert_eq!(profile.conversion_meeting_to_deal, Some(0.5));
    }

    #[tokio::test]
    async fn goal_setup_resets_current_progress() {
        let store = Arc::new(MemoryStore::new());
        let (mut engine, _) = engine_on(store.clone(), day(21));
        engine.setup_profile(solar_setup()).await.unwrap();
        engine.setup_monthly_goal(10_000.0, 10).await.unwrap();

        let month = MonthKey::of(day(21));
        assert!(store.record_closed_revenue(engine.owner(), month, 4_000.0, 4));
        engine.refetch().await;
        assert_eq!(engine.view().requirements.as_ref().unwrap().progress_percent, 40);

        engine.setup_monthly_goal(20_000.0, 20).await.unwrap();
        let goal = engine.view().goal.as_ref().unwrap();
        assert_eq!(goal.current_revenue, 0.0);
        assert_eq!(goal.current_deals, 0);
    }

    #[tokio::test]
    async fn plan_targets_stay_frozen_after_goal_change() {
        let store = Arc::new(MemoryStore::new());
        let (mut engine, _) = engine_on(store.clone(), day(21));
        engine.setup_profile(solar_setup()).await.unwrap();
        engine.setup_monthly_goal(10_000.0, 10).await.unwrap();
        let original = engine.view().plan.clone().unwrap();

        engine.setup_monthly_goal(50_000.0, 50).await.unwrap();
        let view = engine.view();
        // Requirements move with the goal, the plan doesn't.
        assert_eq!(view.requirements.as_ref().unwrap().daily_target, 50);
        let plan = view.plan.as_ref().unwrap();
        assert_eq!(plan.plan_id, original.plan_id);
        assert_eq!(plan.target_new_contacts, original.target_new_contacts);
        assert_eq!(plan.target_followups, original.target_followups);
        assert_eq!(plan.target_meetings, original.target_meetings);
    }

    #[tokio::test]
    async fn new_day_gets_a_new_plan() {
        let store = Arc::new(MemoryStore::new());
        let (mut engine, clock) = engine_on(store.clone(), day(21));
        engine.setup_profile(solar_setup()).await.unwrap();
        engine.setup_monthly_goal(10_000.0, 10).await.unwrap();
        let first = engine.view().plan.clone().unwrap();

        clock.set(day(22));
        engine.refetch().await;
        let second = engine.view().plan.clone().unwrap();
        assert_ne!(first.plan_id, second.plan_id);
        assert_eq!(second.date, day(22));
        assert_eq!(engine.view().requirements.as_ref().unwrap().days_remaining, 9);
    }

    #[tokio::test]
    async fn new_month_needs_a_new_goal() {
        let store = Arc::new(MemoryStore::new());
        let (mut engine, clock) = engine_on(store.clone(), day(30));
        engine.setup_profile(solar_setup()).await.unwrap();
        engine.setup_monthly_goal(10_000.0, 10).await.unwrap();
        assert_eq!(engine.view().stage, OnboardingStage::Planned);

        clock.set(NaiveDate::from_ymd_opt(2026, 10, 1).unwrap());
        engine.refetch().await;
        let view = engine.view();
        assert_eq!(view.stage, OnboardingStage::NeedsGoal);
        assert!(view.goal.is_none());
        assert!(view.plan.is_none());
    }

    #[tokio::test]
    async fn read_failure_keeps_previous_state() {
        let store = Arc::new(MemoryStore::new());
        let (mut engine, _) = engine_on(store.clone(), day(21));
        engine.setup_profile(solar_setup()).await.unwrap();
        engine.setup_monthly_goal(10_000.0, 10).await.unwrap();
        let before = engine.view().plan.clone();

        store.set_fail_reads(true);
        engine.refetch().await;
        let view = engine.view();
        assert!(view.error.is_some());
        assert!(!view.loading);
        assert_eq!(view.stage, OnboardingStage::Planned);
        assert_eq!(view.plan, before);

        store.set_fail_reads(false);
        engine.refetch().await;
        assert!(engine.view().error.is_none());
    }

    #[tokio::test]
    async fn progress_is_recorded_locally_and_remotely() {
        let store = Arc::new(MemoryStore::new());
        let (mut engine, _) = engine_on(store.clone(), day(21));
        engine.setup_profile(solar_setup()).await.unwrap();
        engine.setup_monthly_goal(10_000.0, 10).await.unwrap();

        engine.update_progress(ActivityType::Followups, 2).await;
        engine.update_progress(ActivityType::Followups, 1).await;

        assert_eq!(engine.view().plan.as_ref().unwrap().completed_followups, 3);
        let stored = store
            .get_plan(engine.owner(), day(21))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.completed_followups, 3);
        assert!(engine.view().error.is_none());
    }

    #[tokio::test]
    async fn zero_count_progress_changes_nothing() {
        let store = Arc::new(MemoryStore::new());
        let (mut engine, _) = engine_on(store.clone(), day(21));
        engine.setup_profile(solar_setup()).await.unwrap();
        engine.setup_monthly_goal(10_000.0, 10).await.unwrap();
        engine.update_progress(ActivityType::Meetings, 1).await;

        let before = engine.view().plan.clone();
        let writes_before = store.write_attempts();
        let mut updates = engine.subscribe();
        updates.borrow_and_update();

        engine.update_progress(ActivityType::Meetings, 0).await;

        assert_eq!(engine.view().plan, before);
        assert!(engine.view().error.is_none());
        assert_eq!(store.write_attempts(), writes_before);
        assert!(!updates.has_changed().unwrap());
    }

    #[tokio::test]
    async fn view_json_carries_needs_onboarding() {
        let store = Arc::new(MemoryStore::new());
        let (mut engine, _) = engine_on(store, day(21));

        engine.load().await;
        let json = serde_json::to_value(engine.view()).unwrap();
        assert_eq!(json["stage"], "not_onboarded");
        assert_eq!(json["needs_onboarding"], true);

        engine.setup_profile(solar_setup()).await.unwrap();
        engine.setup_monthly_goal(10_000.0, 10).await.unwrap();
        let json = serde_json::to_value(engine.view()).unwrap();
        assert_eq!(json["stage"], "planned");
        assert_eq!(json["needs_onboarding"], false);
        assert_eq!(json["plan"]["target_followups"], 5);
    }

    #[tokio::test]
    async fn failed_progress_write_rolls_back_and_reports() {
        let store = Arc::new(MemoryStore::new());
        let (mut engine, _) = engine_on(store.clone(), day(21));
        engine.setup_profile(solar_setup()).await.unwrap();
        engine.setup_monthly_goal(10_000.0, 10).await.unwrap();
        engine.update_progress(ActivityType::Meetings, 1).await;

        store.set_fail_writes(true);
        engine.update_progress(ActivityType::Meetings, 4).await;

        let view = engine.view();
        assert_eq!(view.plan.as_ref().unwrap().completed_meetings, 1);
        assert!(view.error.as_deref().unwrap().contains("writes disabled"));
    }

    #[tokio::test]
    async fn progress_without_plan_reports_not_onboarded() {
        let store = Arc::new(MemoryStore::new());
        let (mut engine, _) = engine_on(store.clone(), day(21));
        engine.load().await;

        engine.update_progress(ActivityType::NewContacts, 1).await;
        assert!(engine.view().error.is_some());
        assert_eq!(store.write_attempts(), 0);
    }

    #[tokio::test]
    async fn subscribers_see_the_optimistic_value() {
        let store = Arc::new(MemoryStore::new());
        let (mut engine, _) = engine_on(store.clone(), day(21));
        engine.setup_profile(solar_setup()).await.unwrap();
        engine.setup_monthly_goal(10_000.0, 10).await.unwrap();

        let rx = engine.subscribe();
        engine.update_progress(ActivityType::NewContacts, 2).await;
        let published = rx.borrow().clone();
        assert_eq!(published.plan.unwrap().completed_new_contacts, 2);
        assert!(!published.loading);
    }
}
