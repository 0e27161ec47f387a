//! # pc-store
//!
//! Record shapes and persistence backends for Pipeline Coach.
//!
//! The goal engine talks to storage only through the [`RecordStore`] trait,
//! which exposes seven logical operations over three records. Absence is
//! reported as `Ok(None)`, never as an error.
//!
//! ## Key components
//!
//! - [`BusinessProfile`], [`MonthlyGoal`], [`DailyPlan`] — the persisted records
//! - [`RecordStore`] — async trait every backend implements
//! - [`JsonFileStore`] — one JSON file per record, atomic rename on write
//! - [`MemoryStore`] — in-process backend with failure injection for tests

pub mod error;
pub mod file;
pub mod memory;
pub mod records;
pub mod store;

pub use error::StoreError;
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use records::{
    ActivityType, BusinessProfile, DailyPlan, Industry, MonthKey, MonthlyGoal, OwnerId,
};
pub use store::RecordStore;
