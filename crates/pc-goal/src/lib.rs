//! # pc-goal
//!
//! The Pipeline Coach goal engine.
//!
//! Turns a salesperson's monthly revenue goal into daily activity targets,
//! keeps one frozen plan per day, and records completed activity with an
//! optimistic local update that is rolled back if the store rejects it.
//!
//! ## Key components
//!
//! - [`compute_requirements`] — pure backward planning from goal to daily target
//! - [`DailyPlanManager`] — create-if-missing daily plans, targets frozen at creation
//! - [`ProgressTracker`] / [`AppliedIncrement`] — two-phase progress writes with rollback
//! - [`GoalEngine`] — sequences profile → goal → requirements → plan and
//!   exposes the [`EngineView`] read model plus the setup/progress commands
//! - [`CoachEvent`] / [`EventDispatcher`] — lifecycle events for notification sinks
//! - [`CommissionCalculator`] — call contract for the remote commission service

pub mod calculator;
pub mod clock;
pub mod commission;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod plan;
pub mod progress;

pub use calculator::{compute_requirements, ConversionDefaults, DailyRequirements};
pub use clock::{Clock, FixedClock, SystemClock};
pub use commission::{
    CommissionCalculator, CommissionRequest, CommissionResponse, HttpCommissionClient,
};
pub use config::CoachConfig;
pub use engine::{EngineView, GoalEngine, OnboardingStage, ProfileSetup};
pub use error::GoalError;
pub use events::{CoachEvent, EventDispatcher, LogSink, NotificationSink};
pub use plan::{split_daily_target, ActivityTargets, DailyPlanManager, EnsuredPlan};
pub use progress::{AppliedIncrement, ProgressTracker};
